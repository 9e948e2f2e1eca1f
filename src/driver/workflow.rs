//! Workflow Orchestration
//!
//! ワークフローのオーケストレーション

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::adapter::aps::client::{build_http_client, parse_base_url, ApsClient};
use crate::adapter::auth::{ApsTokenRepository, TokenProvider};
use crate::adapter::config::Config;
use crate::adapter::repositories::da_work_item_repository::DaWorkItemRepository;
use crate::adapter::repositories::file_template_repository::FileTemplateRepository;
use crate::adapter::repositories::oss_storage_repository::OssStorageRepository;
use crate::application::dto::job_request::{
    InputFile, JobRequest, JobTemplates, SCRIPT_WRAPPER_NAME, WORK_ITEM_TEMPLATE_NAME,
};
use crate::application::use_cases::await_work_item::WorkItemOrchestrator;
use crate::application::use_cases::run_job::{JobOutcome, JobRunner};
use crate::application::use_cases::stage_objects::ObjectStagingClient;
use crate::domain::repositories::template_repository::TemplateRepository;

use super::cli::Args;

/// Read the input file and return it with its bare file name
pub fn read_input(path: &str) -> Result<InputFile> {
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("Input path has no file name: {}", path))?;
    let content = fs::read(path).with_context(|| format!("Failed to read input file: {}", path))?;

    Ok(InputFile { name, content })
}

/// Load the work item template, script wrapper and selected script
pub fn load_templates(repository: &dyn TemplateRepository, script: &str) -> Result<JobTemplates> {
    Ok(JobTemplates {
        work_item: repository.load(WORK_ITEM_TEMPLATE_NAME)?,
        script_wrapper: repository.load(SCRIPT_WRAPPER_NAME)?,
        script: repository.load(script)?,
    })
}

/// Assemble a job request from CLI arguments and configuration
pub fn build_request(
    args: &Args,
    config: &Config,
    templates: &dyn TemplateRepository,
) -> Result<JobRequest> {
    Ok(JobRequest {
        bucket_name: config.bucket_name.clone(),
        activity_id: args.activity.clone(),
        input: read_input(&args.input)?,
        script_name: args.script.clone(),
        output_name: args.output.clone(),
        templates: load_templates(templates, &args.script)?,
        timeout: Duration::from_secs(args.timeout),
        url_expiry_secs: args.expires,
    })
}

/// Cancellation token that fires on Ctrl-C
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping (the remote work item keeps running)");
            signal.cancel();
        }
    });
    cancel
}

/// Design Automation Workflow
pub struct DesignAutomationWorkflow {
    config: Config,
    runner: JobRunner<OssStorageRepository, DaWorkItemRepository>,
}

impl DesignAutomationWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Result<Self> {
        let http = build_http_client(config.http_timeout()).context("Failed to create HTTP client")?;
        let base_url = parse_base_url(&config.base_url)?;

        // One token provider shared by every repository
        let token_repository = ApsTokenRepository::new(http.clone(), &base_url)?
            .with_scope(config.scope.clone());
        let tokens = Arc::new(TokenProvider::new(
            Arc::new(token_repository),
            config.credentials(),
        ));
        let client = Arc::new(
            ApsClient::new(http, base_url, tokens).with_request_timeout(config.http_timeout()),
        );

        let storage = Arc::new(OssStorageRepository::new(client.clone()));
        let work_items = Arc::new(DaWorkItemRepository::new(client, config.region.clone()));

        let runner = JobRunner::new(
            ObjectStagingClient::new(storage).with_part_size(config.part_size_bytes),
            WorkItemOrchestrator::new(work_items).with_poll_interval(config.poll_interval()),
        );

        Ok(Self { config, runner })
    }

    /// Execute the job and print the download URL
    pub async fn execute(&self, args: Args, cancel: &CancellationToken) -> Result<JobOutcome> {
        info!("Starting Design Automation job...");

        println!("Processing: {}", args.input);
        println!("Using LISP: {}", args.script);
        println!("Output: {}", args.output);

        let templates = FileTemplateRepository::new(&args.scripts_dir);
        let request = build_request(&args, &self.config, &templates)?;

        let outcome = self
            .runner
            .execute(&request, cancel)
            .await
            .context("Design Automation job failed")?;

        println!("✓ Work item {} completed", outcome.work_item_id);
        println!("Download URL: {}", outcome.download.url);
        info!(
            "Download URL expires in {}s",
            outcome.download.expires_in.as_secs()
        );

        Ok(outcome)
    }
}
