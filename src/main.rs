//! da-runner - Design Automation Job Runner
//!
//! 図面をAPS Design Automationで処理し、結果のダウンロードURLを表示

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use da_runner::adapter::config::Config;
use da_runner::driver::workflow::cancel_on_ctrl_c;
use da_runner::driver::{Args, DesignAutomationWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration (file, .env, environment)
    let config = Config::load(args.config.as_deref())?;

    // Create workflow with injected dependencies
    let workflow = DesignAutomationWorkflow::new(config)?;

    let cancel = cancel_on_ctrl_c();
    workflow.execute(args, &cancel).await?;

    Ok(())
}
