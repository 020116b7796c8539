// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 未配置时使用的 API 地址
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// 覆盖 API 地址的环境变量
pub const API_URL_ENV: &str = "GRIEVANCE_API_URL";

/// 客户端配置
///
/// 只有一个可覆盖项：API 基础地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// 使用覆盖值，空值或缺失时回退到默认地址
    ///
    /// 前端通过 `option_env!` 在编译期注入。
    pub fn from_override(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::default(),
        }
    }

    /// 从进程环境变量读取（原生目标）
    pub fn from_env() -> Self {
        let value = std::env::var(API_URL_ENV).ok();
        Self::from_override(value.as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
