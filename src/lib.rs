//! 学生申诉门户客户端核心
//!
//! 与渲染无关的部分都在这里：HTTP 抽象、API 网关、会话与认证状态、
//! 路由守卫、表单校验和提交流程。浏览器端（`grievance-frontend`）只负责
//! 提供 `HttpClient` / `KeyValueStore` 的实现并渲染界面。

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod guard;
pub mod middleware;
pub mod nav;
pub mod request;
pub mod route;
pub mod session;
pub mod submit;
pub mod token;
pub mod view_state;

// =========================================================
// 常用类型导出
// =========================================================

pub use api::{DownloadedFile, GrievanceApi};
pub use auth::{AuthPhase, AuthStore, Registration, SignInError};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, SessionError, TokenError};
pub use guard::{GuardDecision, guard};
pub use middleware::{BearerAuth, StaticToken, TokenSource};
pub use request::{FilePayload, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use session::{KeyValueStore, Session, SessionStore};
pub use submit::{SubmissionSaga, SubmissionStage};
pub use view_state::{Notice, ViewState};

pub use grievance_shared as shared;
