//! API 网关客户端
//!
//! 三组资源：`auth`、`grievances`、`files`。单次请求，不重试，不设超时。

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{FilePayload, FormPart, HttpClient, HttpMethod, HttpRequest};
use grievance_shared::protocol::{
    self, ApiRequest, CreateGrievanceRequest, DeleteFileRequest, GetGrievanceRequest,
    ListGrievancesRequest, LoginRequest, RegisterRequest, UpdateGrievanceRequest,
};
use grievance_shared::{
    Credentials, Grievance, GrievancePatch, HEADER_IDEMPOTENCY_KEY, NewGrievance, TokenResponse,
    UploadResult,
};


/// 下载得到的文件
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GrievanceApi<C> {
    client: C,
    config: ClientConfig,
}

impl<C: HttpClient> GrievanceApi<C> {
    pub fn new(client: C, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn auth(&self) -> AuthApi<'_, C> {
        AuthApi { api: self }
    }

    pub fn grievances(&self) -> GrievancesApi<'_, C> {
        GrievancesApi { api: self }
    }

    pub fn files(&self) -> FilesApi<'_, C> {
        FilesApi { api: self }
    }

    /// 构造 JSON 端点请求
    fn build<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let url = self.config.url(&req.path());
        let http = HttpRequest::new(&url, R::METHOD).with_header("Accept", "application/json");
        if R::HAS_BODY {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Encode(e.to_string()))?;
            Ok(http.with_json(body))
        } else {
            Ok(http)
        }
    }

    /// 发送请求并解析响应
    async fn dispatch<R: ApiRequest>(&self, http: HttpRequest) -> ApiResult<R::Response> {
        let method = http.method;
        let url = http.url.clone();
        let resp = self.client.send(http).await.inspect_err(|e| {
            log::warn!("{} {} failed: {}", method.as_str(), url, e);
        })?;
        let resp = resp.error_for_status().inspect_err(|e| {
            log::warn!("{} {} rejected: {}", method.as_str(), url, e);
        })?;
        resp.json::<R::Response>()
    }

    async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let http = self.build(req)?;
        self.dispatch::<R>(http).await
    }
}

// =========================================================
// auth
// =========================================================

pub struct AuthApi<'a, C> {
    api: &'a GrievanceApi<C>,
}

impl<C: HttpClient> AuthApi<'_, C> {
    /// 注册账号
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<()> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.call(&RegisterRequest(&credentials)).await?;
        log::info!("registered account {}", email);
        Ok(())
    }

    /// 登录，返回访问令牌
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenResponse> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.call(&LoginRequest(&credentials)).await
    }
}

// =========================================================
// grievances
// =========================================================

pub struct GrievancesApi<'a, C> {
    api: &'a GrievanceApi<C>,
}

impl<C: HttpClient> GrievancesApi<'_, C> {
    pub async fn create(&self, data: &NewGrievance) -> ApiResult<Grievance> {
        self.api.call(&CreateGrievanceRequest(data)).await
    }

    /// 携带幂等键创建，同一键的重复提交不会产生第二条记录
    pub async fn create_idempotent(&self, data: &NewGrievance, key: &str) -> ApiResult<Grievance> {
        let req = CreateGrievanceRequest(data);
        let http = self.api.build(&req)?.with_header(HEADER_IDEMPOTENCY_KEY, key);
        self.api.dispatch::<CreateGrievanceRequest<'_>>(http).await
    }

    pub async fn list(&self) -> ApiResult<Vec<Grievance>> {
        self.api.call(&ListGrievancesRequest).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Grievance> {
        self.api.call(&GetGrievanceRequest { id }).await
    }

    pub async fn update(&self, id: i64, patch: &GrievancePatch) -> ApiResult<Grievance> {
        self.api.call(&UpdateGrievanceRequest { id, patch }).await
    }
}

// =========================================================
// files
// =========================================================

pub struct FilesApi<'a, C> {
    api: &'a GrievanceApi<C>,
}

impl<C: HttpClient> FilesApi<'_, C> {
    /// 上传附件，`grievance_id` 为所属申诉
    pub async fn upload(&self, file: &FilePayload, grievance_id: i64) -> ApiResult<UploadResult> {
        let url = self.api.config.url(&protocol::upload_path());
        let parts = vec![
            FormPart::File {
                name: "file".to_string(),
                file: file.clone(),
            },
            FormPart::Text {
                name: "grievance_id".to_string(),
                value: grievance_id.to_string(),
            },
        ];
        let http = HttpRequest::new(&url, HttpMethod::Post)
            .with_header("Accept", "application/json")
            .with_multipart(parts);

        let resp = self.api.client.send(http).await?.error_for_status()?;
        let result: UploadResult = resp.json()?;
        log::info!(
            "uploaded {} ({} bytes) for grievance #{}",
            result.filename,
            file.size(),
            grievance_id
        );
        Ok(result)
    }

    /// 下载文件原始内容
    pub async fn download(&self, id: i64) -> ApiResult<DownloadedFile> {
        let url = self.api.config.url(&protocol::download_path(id));
        let resp = self
            .api
            .client
            .send(HttpRequest::new(&url, HttpMethod::Get))
            .await?
            .error_for_status()?;
        Ok(DownloadedFile {
            bytes: resp.body,
            content_type: resp.content_type,
        })
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.api.call(&DeleteFileRequest { id }).await?;
        Ok(())
    }
}
