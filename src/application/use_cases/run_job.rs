//! # Run Job Use Case
//!
//! 入力のステージングからダウンロードURLの発行までを順に実行する

use log::info;
use tokio_util::sync::CancellationToken;

use crate::application::dto::job_request::{JobRequest, SCRIPT_WRAPPER_NAME};
use crate::domain::entities::download_grant::DownloadGrant;
use crate::domain::entities::object_key::ObjectKey;
use crate::domain::entities::work_item::{WorkItemDescription, WorkItemId, WorkItemResult};
use crate::domain::errors::JobResult;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::domain::repositories::work_item_repository::WorkItemRepository;
use crate::domain::services::expiry::ExpiryPolicy;
use crate::domain::services::template::TemplateService;

use super::await_work_item::WorkItemOrchestrator;
use super::stage_objects::ObjectStagingClient;

/// ジョブ実行結果
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// 入力ファイルのオブジェクトキー
    pub input_key: ObjectKey,
    /// 出力ファイルのオブジェクトキー
    pub output_key: ObjectKey,
    /// ワークアイテムID
    pub work_item_id: WorkItemId,
    /// 成功したワークアイテムの結果
    pub result: WorkItemResult,
    /// 出力ファイルのダウンロードURL
    pub download: DownloadGrant,
}

/// ジョブランナー
///
/// 各ステージの失敗はその場で実行全体を中断する（内部リトライなし、途中再開なし）
pub struct JobRunner<S: StorageRepository, W: WorkItemRepository> {
    staging: ObjectStagingClient<S>,
    orchestrator: WorkItemOrchestrator<W>,
}

impl<S: StorageRepository, W: WorkItemRepository> JobRunner<S, W> {
    /// 新しいランナーを作成
    ///
    /// # Arguments
    ///
    /// * `staging` - オブジェクトステージングクライアント
    /// * `orchestrator` - ワークアイテムオーケストレーター
    pub fn new(staging: ObjectStagingClient<S>, orchestrator: WorkItemOrchestrator<W>) -> Self {
        Self {
            staging,
            orchestrator,
        }
    }

    /// ジョブを実行する
    ///
    /// 順序: バケット確保 → 入力アップロード → テンプレート描画 →
    /// スクリプトアップロード（並行） → 投入 → ポーリング → ダウンロードURL発行
    ///
    /// # Errors
    ///
    /// いずれかのステージが失敗した場合、そのエラーをそのまま返す
    pub async fn execute(
        &self,
        request: &JobRequest,
        cancel: &CancellationToken,
    ) -> JobResult<JobOutcome> {
        // 長時間のジョブを実行してから失敗しないよう、先に検証する
        ExpiryPolicy::minutes_for(request.url_expiry_secs)?;
        let output_key = ObjectKey::output(&request.output_name)?;
        let bucket = request.bucket_name.as_str();

        self.staging.ensure_bucket(bucket).await?;

        let input_key = self
            .staging
            .upload_object(
                bucket,
                ObjectKey::input(&request.input.name)?,
                &request.input.content,
            )
            .await?;

        let bindings = request.bindings(&input_key);
        let wrapper = TemplateService::render(&request.templates.script_wrapper, &bindings);
        let description = WorkItemDescription::from_json(&TemplateService::render(
            &request.templates.work_item,
            &bindings,
        ))?;

        let assets = vec![
            (
                ObjectKey::script(&request.script_name)?,
                request.templates.script.clone().into_bytes(),
            ),
            (
                ObjectKey::script(SCRIPT_WRAPPER_NAME)?,
                wrapper.into_bytes(),
            ),
        ];
        let staged = self.staging.upload_objects(bucket, assets).await?;
        info!("Staged {} script asset(s)", staged.len());

        let work_item_id = self.orchestrator.submit(&description).await?;
        let result = self
            .orchestrator
            .await_completion(&work_item_id, request.timeout, cancel)
            .await?;

        let download = self
            .staging
            .download_url(bucket, &output_key, request.url_expiry_secs)
            .await?;

        Ok(JobOutcome {
            input_key,
            output_key,
            work_item_id,
            result,
            download,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::application::dto::job_request::{InputFile, JobTemplates};
    use crate::domain::entities::bucket::{Bucket, BucketCreation, RetentionPolicy};
    use crate::domain::entities::upload_session::UploadSession;
    use crate::domain::entities::work_item::{WorkItemSnapshot, WorkItemStatus};
    use crate::domain::errors::JobError;

    /// 呼び出し順を記録するフェイク
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
        submitted: Mutex<Vec<serde_json::Value>>,
        final_status: Mutex<Option<&'static str>>,
    }

    impl Recorder {
        fn push(&self, event: impl Into<String>) {
            self.events.lock().unwrap().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn position(&self, event: &str) -> usize {
            self.events()
                .iter()
                .position(|e| e == event)
                .unwrap_or_else(|| panic!("event {} not recorded", event))
        }
    }

    #[async_trait]
    impl StorageRepository for Recorder {
        async fn bucket_details(&self, bucket_key: &str) -> JobResult<Option<Bucket>> {
            self.push(format!("details:{}", bucket_key));
            Ok(None)
        }

        async fn create_bucket(
            &self,
            bucket_key: &str,
            _policy: RetentionPolicy,
        ) -> JobResult<BucketCreation> {
            self.push(format!("create:{}", bucket_key));
            Ok(BucketCreation::Created)
        }

        async fn request_upload(
            &self,
            _bucket_key: &str,
            object_key: &ObjectKey,
            _parts: usize,
        ) -> JobResult<UploadSession> {
            Ok(UploadSession::new(
                format!("key-{}", object_key),
                vec![format!("https://s3.example.com/{}", object_key)],
            ))
        }

        async fn put_part(&self, url: &str, content: Vec<u8>) -> JobResult<()> {
            self.push(format!("put:{}:{}", url, String::from_utf8_lossy(&content)));
            Ok(())
        }

        async fn complete_upload(
            &self,
            _bucket_key: &str,
            object_key: &ObjectKey,
            _upload_key: &str,
        ) -> JobResult<()> {
            self.push(format!("complete:{}", object_key));
            Ok(())
        }

        async fn signed_download(
            &self,
            bucket_key: &str,
            object_key: &ObjectKey,
            minutes: u32,
        ) -> JobResult<String> {
            self.push(format!("download:{}", object_key));
            Ok(format!(
                "https://s3.example.com/{}/{}?minutes={}",
                bucket_key, object_key, minutes
            ))
        }
    }

    #[async_trait]
    impl WorkItemRepository for Recorder {
        async fn submit(&self, description: &WorkItemDescription) -> JobResult<WorkItemId> {
            self.push("submit");
            self.submitted.lock().unwrap().push(description.body().clone());
            Ok(WorkItemId::new("wi-42"))
        }

        async fn status(&self, id: &WorkItemId) -> JobResult<WorkItemSnapshot> {
            self.push("status");
            let status = self.final_status.lock().unwrap().unwrap_or("success");
            Ok(WorkItemSnapshot {
                id: id.clone(),
                status: WorkItemStatus::parse(status),
                report_url: None,
                payload: json!({"id": id.as_str(), "status": status}),
            })
        }
    }

    fn request() -> JobRequest {
        JobRequest {
            bucket_name: "da-bucket".to_string(),
            activity_id: "AutoCAD.ModifyTitleBlock+prod".to_string(),
            input: InputFile {
                name: "plan.dwg".to_string(),
                content: b"DWG".to_vec(),
            },
            script_name: "modify_title.lsp".to_string(),
            output_name: "result.pdf".to_string(),
            templates: JobTemplates {
                work_item: r#"{"activityId": "{activity_id}", "arguments": {"HostDwg": {"url": "urn:adsk.objects:os.object:{bucket_name}/{input_file_key}"}, "Result": {"url": "urn:adsk.objects:os.object:{bucket_name}/output/{output_file}"}}}"#.to_string(),
                script_wrapper: "(load \"{lisp_file}\")".to_string(),
                script: "(defun c:ModifyTitle () (princ))".to_string(),
            },
            timeout: Duration::from_secs(60),
            url_expiry_secs: 3600,
        }
    }

    fn runner(recorder: &Arc<Recorder>) -> JobRunner<Recorder, Recorder> {
        JobRunner::new(
            ObjectStagingClient::new(recorder.clone()),
            WorkItemOrchestrator::new(recorder.clone()),
        )
    }

    #[tokio::test]
    async fn test_execute_runs_stages_in_order() {
        let recorder = Arc::new(Recorder::default());
        let outcome = runner(&recorder)
            .execute(&request(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.work_item_id.as_str(), "wi-42");
        assert_eq!(outcome.input_key.as_str(), "input/plan.dwg");
        assert_eq!(outcome.output_key.as_str(), "output/result.pdf");
        assert_eq!(
            outcome.download.url,
            "https://s3.example.com/da-bucket/output/result.pdf?minutes=60"
        );

        let create = recorder.position("create:da-bucket");
        let input = recorder.position("complete:input/plan.dwg");
        let script = recorder.position("complete:scripts/modify_title.lsp");
        let wrapper = recorder.position("complete:scripts/execute_script.scr");
        let submit = recorder.position("submit");
        let status = recorder.position("status");
        let download = recorder.position("download:output/result.pdf");

        assert!(create < input);
        assert!(input < script && input < wrapper);
        assert!(script < submit && wrapper < submit);
        assert!(submit < status);
        assert!(status < download);
    }

    #[tokio::test]
    async fn test_execute_renders_templates() {
        let recorder = Arc::new(Recorder::default());
        runner(&recorder)
            .execute(&request(), &CancellationToken::new())
            .await
            .unwrap();

        let submitted = recorder.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0]["activityId"], "AutoCAD.ModifyTitleBlock+prod");
        assert_eq!(
            submitted[0]["arguments"]["HostDwg"]["url"],
            "urn:adsk.objects:os.object:da-bucket/input/plan.dwg"
        );

        let events = recorder.events();
        assert!(events.contains(
            &"put:https://s3.example.com/scripts/execute_script.scr:(load \"modify_title.lsp\")"
                .to_string()
        ));
        assert!(events.contains(
            &"put:https://s3.example.com/scripts/modify_title.lsp:(defun c:ModifyTitle () (princ))"
                .to_string()
        ));
    }

    #[tokio::test]
    async fn test_execute_fails_fast_on_job_failure() {
        let recorder = Arc::new(Recorder::default());
        *recorder.final_status.lock().unwrap() = Some("failedInstructions");

        let result = runner(&recorder)
            .execute(&request(), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(JobError::JobFailed { .. })));
        assert!(!recorder
            .events()
            .iter()
            .any(|e| e.starts_with("download:")));
    }

    #[tokio::test]
    async fn test_malformed_description_aborts_before_script_staging() {
        let recorder = Arc::new(Recorder::default());
        let mut request = request();
        request.templates.work_item = "{\"activityId\": \"{activity_id}\"".to_string();

        let result = runner(&recorder)
            .execute(&request, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(JobError::Submission(_))));
        let events = recorder.events();
        assert!(!events.iter().any(|e| e.starts_with("complete:scripts/")));
        assert!(!events.iter().any(|e| e == "submit"));
    }

    #[tokio::test]
    async fn test_invalid_expiry_rejected_before_any_request() {
        let recorder = Arc::new(Recorder::default());
        let mut request = request();
        request.url_expiry_secs = 30;

        let result = runner(&recorder)
            .execute(&request, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(JobError::Staging(_))));
        assert!(recorder.events().is_empty());
    }
}
