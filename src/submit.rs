//! 申诉提交流程
//!
//! 提交分为“创建申诉”和“上传附件”两步。流程对象记录当前阶段，
//! `run` 从当前阶段继续：
//!
//! ```text
//! Draft --create--> Created --upload--> Complete
//!                      |
//!                      +--upload 失败--> AttachmentPending { error } --重试--> Complete
//! ```
//!
//! 创建请求带固定的 `Idempotency-Key`，创建失败后重试不会产生重复记录；
//! 附件上传失败后重试只会重新上传。

use crate::api::GrievanceApi;
use crate::error::ApiError;
use crate::forms::{FormError, GrievanceDraft, validate_attachment};
use crate::request::{FilePayload, HttpClient};
use grievance_shared::{Grievance, NewGrievance, UploadResult};
use uuid::Uuid;

pub const CREATE_FAILED: &str = "Failed to submit grievance. Please try again.";
pub const UPLOAD_FAILED: &str = "Failed to upload attachment";

/// 提交阶段
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionStage {
    Draft,
    Created(Grievance),
    AttachmentPending { grievance: Grievance, error: String },
    Complete { grievance: Grievance, upload: Option<UploadResult> },
}

impl SubmissionStage {
    pub fn grievance(&self) -> Option<&Grievance> {
        match self {
            Self::Draft => None,
            Self::Created(g) => Some(g),
            Self::AttachmentPending { grievance, .. } | Self::Complete { grievance, .. } => {
                Some(grievance)
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionSaga {
    idempotency_key: String,
    body: NewGrievance,
    attachment: Option<FilePayload>,
    stage: SubmissionStage,
}

impl SubmissionSaga {
    /// 校验草稿并生成新的幂等键，未通过校验时不会产生任何请求
    pub fn new(draft: &GrievanceDraft) -> Result<Self, FormError> {
        let body = draft.validate()?;
        Ok(Self {
            idempotency_key: Uuid::new_v4().to_string(),
            body,
            attachment: draft.attachment.clone(),
            stage: SubmissionStage::Draft,
        })
    }

    /// 复用上一次未完成的流程，或者为新草稿开始新流程
    ///
    /// - 申诉已创建：继续原流程，只采用草稿中当前的附件
    /// - 仍在 `Draft` 且草稿未变：沿用原幂等键
    /// - 其余情况：新流程
    pub fn prepare(previous: Option<Self>, draft: &GrievanceDraft) -> Result<Self, FormError> {
        match previous {
            Some(mut saga) if saga.stage.grievance().is_some() && !saga.stage.is_complete() => {
                if let Some(file) = &draft.attachment {
                    validate_attachment(file)?;
                }
                saga.attachment = draft.attachment.clone();
                Ok(saga)
            }
            Some(saga)
                if saga.stage == SubmissionStage::Draft
                    && draft.validate()? == saga.body
                    && draft.attachment == saga.attachment =>
            {
                Ok(saga)
            }
            _ => Self::new(draft),
        }
    }

    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }

    pub fn stage(&self) -> &SubmissionStage {
        &self.stage
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// 从当前阶段继续执行
    ///
    /// 创建失败返回错误并停留在 `Draft`；上传失败不返回错误，
    /// 而是进入 `AttachmentPending`，申诉本身已经存在。
    pub async fn run<C: HttpClient>(
        &mut self,
        api: &GrievanceApi<C>,
    ) -> Result<&SubmissionStage, ApiError> {
        if matches!(self.stage, SubmissionStage::Draft) {
            let created = api
                .grievances()
                .create_idempotent(&self.body, &self.idempotency_key)
                .await?;
            log::info!("grievance #{} created", created.id);
            self.stage = SubmissionStage::Created(created);
        }

        let grievance = match &self.stage {
            SubmissionStage::Created(g) | SubmissionStage::AttachmentPending { grievance: g, .. } => {
                g.clone()
            }
            _ => return Ok(&self.stage),
        };

        self.stage = match &self.attachment {
            None => SubmissionStage::Complete { grievance, upload: None },
            Some(file) => match api.files().upload(file, grievance.id).await {
                Ok(upload) => SubmissionStage::Complete { grievance, upload: Some(upload) },
                Err(e) => {
                    log::warn!("attachment upload for grievance #{} failed: {}", grievance.id, e);
                    SubmissionStage::AttachmentPending {
                        grievance,
                        error: e.user_message(UPLOAD_FAILED),
                    }
                }
            },
        };
        Ok(&self.stage)
    }

    /// 放弃附件，直接完成
    pub fn continue_without_attachment(&mut self) -> &SubmissionStage {
        if let SubmissionStage::AttachmentPending { grievance, .. } = &self.stage {
            log::info!("continuing without attachment for grievance #{}", grievance.id);
            self.stage = SubmissionStage::Complete {
                grievance: grievance.clone(),
                upload: None,
            };
        }
        &self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::{FormPart, HttpMethod, MockHttpClient, RecordedRequest, RequestBody};
    use grievance_shared::{Category, HEADER_IDEMPOTENCY_KEY};
    use serde_json::json;

    const CREATE_URL: &str = "http://api.test/api/v1/grievances/";
    const UPLOAD_URL: &str = "http://api.test/api/v1/files/upload";

    fn api(mock: &MockHttpClient) -> GrievanceApi<&MockHttpClient> {
        GrievanceApi::new(mock, ClientConfig::new("http://api.test"))
    }

    fn draft(with_file: bool) -> GrievanceDraft {
        GrievanceDraft {
            title: "Leaky roof".into(),
            description: "Water on the desk".into(),
            category: Category::Hostel,
            dept_id: Some(3),
            attachment: with_file
                .then(|| FilePayload::new("roof.png", "image/png", vec![1, 2, 3])),
        }
    }

    fn created() -> serde_json::Value {
        json!({ "id": 42, "title": "Leaky roof", "category": "Hostel", "status": "Open" })
    }

    fn uploaded() -> serde_json::Value {
        json!({ "id": 9, "filename": "roof.png", "file_size": 3 })
    }

    fn uploaded_filename(req: &RecordedRequest) -> Option<&str> {
        match &req.body {
            Some(RequestBody::Multipart(parts)) => parts.iter().find_map(|p| match p {
                FormPart::File { file, .. } => Some(file.filename.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    #[test]
    fn invalid_draft_never_builds_a_saga() {
        let mut d = draft(false);
        d.title.clear();
        assert_eq!(SubmissionSaga::new(&d).unwrap_err(), FormError::TitleRequired);
    }

    #[test]
    fn each_saga_gets_a_fresh_key() {
        let a = SubmissionSaga::new(&draft(false)).unwrap();
        let b = SubmissionSaga::new(&draft(false)).unwrap();
        assert_ne!(a.idempotency_key(), b.idempotency_key());
        assert!(Uuid::parse_str(a.idempotency_key()).is_ok());
    }

    #[test]
    fn prepare_reuses_unchanged_draft() {
        let first = SubmissionSaga::new(&draft(false)).unwrap();
        let key = first.idempotency_key().to_string();

        let again = SubmissionSaga::prepare(Some(first.clone()), &draft(false)).unwrap();
        assert_eq!(again.idempotency_key(), key);

        let mut edited = draft(false);
        edited.title = "Leaky roof in block B".into();
        let fresh = SubmissionSaga::prepare(Some(first), &edited).unwrap();
        assert_ne!(fresh.idempotency_key(), key);

        let mut empty = draft(false);
        empty.title.clear();
        assert!(SubmissionSaga::prepare(None, &empty).is_err());
    }

    #[tokio::test]
    async fn prepare_keeps_created_grievance() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, CREATE_URL, 201, created());
        mock.mock_unreachable(UPLOAD_URL);

        let mut saga = SubmissionSaga::new(&draft(true)).unwrap();
        saga.run(&api(&mock)).await.unwrap();

        let mut edited = draft(true);
        edited.title = "Something else".into();
        let resumed = SubmissionSaga::prepare(Some(saga), &edited).unwrap();
        assert_eq!(resumed.stage().grievance().map(|g| g.id), Some(42));
    }

    #[tokio::test]
    async fn retry_uploads_newly_selected_file() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, CREATE_URL, 201, created());
        mock.mock_response(
            HttpMethod::Post,
            UPLOAD_URL,
            400,
            json!({ "detail": "File type not allowed" }),
        );
        mock.mock_response(HttpMethod::Post, UPLOAD_URL, 201, uploaded());

        let mut first = draft(true);
        first.attachment = Some(FilePayload::new("bad.png", "application/octet-stream", vec![1]));
        let mut saga = SubmissionSaga::new(&first).unwrap();
        let key = saga.idempotency_key().to_string();
        saga.run(&api(&mock)).await.unwrap();
        assert!(matches!(saga.stage(), SubmissionStage::AttachmentPending { .. }));

        let mut second = first.clone();
        second.attachment = Some(FilePayload::new("fixed.png", "image/png", vec![1, 2]));
        let mut resumed = SubmissionSaga::prepare(Some(saga), &second).unwrap();
        assert_eq!(resumed.idempotency_key(), key);

        let stage = resumed.run(&api(&mock)).await.unwrap();
        assert!(stage.is_complete());
        assert_eq!(stage.grievance().map(|g| g.id), Some(42));

        let uploads = mock.requests_to(HttpMethod::Post, UPLOAD_URL);
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploaded_filename(&uploads[1]), Some("fixed.png"));
        assert_eq!(mock.requests_to(HttpMethod::Post, CREATE_URL).len(), 1);
    }

    #[tokio::test]
    async fn retry_rejects_invalid_replacement_file() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, CREATE_URL, 201, created());
        mock.mock_unreachable(UPLOAD_URL);

        let mut saga = SubmissionSaga::new(&draft(true)).unwrap();
        saga.run(&api(&mock)).await.unwrap();

        let mut edited = draft(true);
        edited.attachment = Some(FilePayload::new("notes.exe", "application/octet-stream", vec![1]));
        assert_eq!(
            SubmissionSaga::prepare(Some(saga), &edited).unwrap_err(),
            FormError::AttachmentType
        );
    }

    #[tokio::test]
    async fn without_attachment_completes_after_create() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, CREATE_URL, 201, created());

        let mut saga = SubmissionSaga::new(&draft(false)).unwrap();
        let stage = saga.run(&api(&mock)).await.unwrap();
        assert!(stage.is_complete());
        assert_eq!(stage.grievance().map(|g| g.id), Some(42));
        assert!(mock.requests_to(HttpMethod::Post, UPLOAD_URL).is_empty());
    }

    #[tokio::test]
    async fn create_retry_reuses_idempotency_key() {
        let mock = MockHttpClient::new();
        mock.mock_unreachable(CREATE_URL);

        let mut saga = SubmissionSaga::new(&draft(false)).unwrap();
        let err = saga.run(&api(&mock)).await.unwrap_err();
        assert_eq!(err.user_message(CREATE_FAILED), CREATE_FAILED);
        assert_eq!(saga.stage(), &SubmissionStage::Draft);

        let mock2 = MockHttpClient::new();
        mock2.mock_response(HttpMethod::Post, CREATE_URL, 201, created());
        saga.run(&api(&mock2)).await.unwrap();

        let first = mock.requests_to(HttpMethod::Post, CREATE_URL);
        let second = mock2.requests_to(HttpMethod::Post, CREATE_URL);
        assert_eq!(
            first[0].header(HEADER_IDEMPOTENCY_KEY),
            second[0].header(HEADER_IDEMPOTENCY_KEY)
        );
        assert_eq!(second[0].header(HEADER_IDEMPOTENCY_KEY), Some(saga.idempotency_key()));
    }

    #[tokio::test]
    async fn failed_upload_is_pending_and_retry_only_uploads() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, CREATE_URL, 201, created());
        mock.mock_response(HttpMethod::Post, UPLOAD_URL, 413, json!({ "detail": "File too large" }));
        mock.mock_response(HttpMethod::Post, UPLOAD_URL, 201, uploaded());

        let api = api(&mock);
        let mut saga = SubmissionSaga::new(&draft(true)).unwrap();

        let stage = saga.run(&api).await.unwrap().clone();
        match &stage {
            SubmissionStage::AttachmentPending { grievance, error } => {
                assert_eq!(grievance.id, 42);
                assert_eq!(error, "File too large");
            }
            other => panic!("expected pending attachment, got {other:?}"),
        }

        let stage = saga.run(&api).await.unwrap();
        match stage {
            SubmissionStage::Complete { grievance, upload } => {
                assert_eq!(grievance.id, 42);
                assert_eq!(upload.as_ref().map(|u| u.id), Some(9));
            }
            other => panic!("expected completion, got {other:?}"),
        }

        assert_eq!(mock.requests_to(HttpMethod::Post, CREATE_URL).len(), 1);
        assert_eq!(mock.requests_to(HttpMethod::Post, UPLOAD_URL).len(), 2);
    }

    #[tokio::test]
    async fn continue_without_attachment_completes() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, CREATE_URL, 201, created());
        mock.mock_unreachable(UPLOAD_URL);

        let mut saga = SubmissionSaga::new(&draft(true)).unwrap();
        saga.run(&api(&mock)).await.unwrap();
        assert!(matches!(saga.stage(), SubmissionStage::AttachmentPending { .. }));

        let stage = saga.continue_without_attachment();
        assert!(matches!(stage, SubmissionStage::Complete { upload: None, .. }));

        // 已完成时再次运行不会发出请求
        saga.run(&api(&mock)).await.unwrap();
        assert_eq!(mock.requests_to(HttpMethod::Post, CREATE_URL).len(), 1);
    }
}
