//! 应用级 API 客户端
//!
//! 浏览器 fetch + 读取 localStorage 令牌的 Bearer 中间件。

use crate::web::{BrowserHttpClient, BrowserStorage};
use grievance_portal::{BearerAuth, ClientConfig, GrievanceApi, SessionStore};
use leptos::prelude::*;

pub type PortalApi = GrievanceApi<BearerAuth<BrowserHttpClient, SessionStore<BrowserStorage>>>;

/// 构建时通过 `GRIEVANCE_API_URL` 覆盖服务端地址
pub fn portal_api() -> PortalApi {
    let config = ClientConfig::from_override(option_env!("GRIEVANCE_API_URL"));
    log::info!("API base url: {}", config.base_url());
    GrievanceApi::new(
        BearerAuth::new(BrowserHttpClient, SessionStore::new(BrowserStorage)),
        config,
    )
}

pub fn use_api() -> PortalApi {
    expect_context::<PortalApi>()
}
