//! 视图加载状态
//!
//! 每次发起请求领取一个递增的票据，只有最新票据的结果会被写入，
//! 先发后至的旧响应直接丢弃。

use crate::error::ApiError;

/// 请求票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    latest: u64,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            latest: 0,
        }
    }
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发起新请求：进入加载状态并清空错误，已有数据保留到新结果到达
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.latest)
    }

    /// 写入结果，返回是否被采纳
    ///
    /// 失败时使用服务端消息，否则使用 `fallback`。
    pub fn finish(&mut self, ticket: Ticket, result: Result<T, ApiError>, fallback: &str) -> bool {
        if ticket.0 != self.latest {
            log::debug!("discarding stale response (ticket {} < {})", ticket.0, self.latest);
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                log::warn!("{}: {}", fallback, e);
                self.error = Some(e.user_message(fallback));
            }
        }
        true
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// 自动消失的通知
///
/// 每条通知对应一个代号，到期时只清除仍是同一代号的通知。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notice {
    current: Option<(String, bool)>,
    generation: u64,
}

impl Notice {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显示新通知，返回到期时使用的代号
    pub fn show(&mut self, message: impl Into<String>, is_error: bool) -> Ticket {
        self.generation += 1;
        self.current = Some((message.into(), is_error));
        Ticket(self.generation)
    }

    /// 到期清除，返回是否清除了通知
    pub fn expire(&mut self, ticket: Ticket) -> bool {
        if ticket.0 != self.generation || self.current.is_none() {
            return false;
        }
        self.current = None;
        true
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn success(&self) -> Option<&str> {
        self.current.as_ref().filter(|(_, is_err)| !is_err).map(|(m, _)| m.as_str())
    }

    pub fn failure(&self) -> Option<&str> {
        self.current.as_ref().filter(|(_, is_err)| *is_err).map(|(m, _)| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_notice_timer_keeps_newer_notice() {
        let mut notice = Notice::new();
        let first = notice.show("Grievance #1 is now Resolved", false);
        let second = notice.show("Failed to update status", true);

        assert!(!notice.expire(first));
        assert_eq!(notice.failure(), Some("Failed to update status"));
        assert_eq!(notice.success(), None);

        assert!(notice.expire(second));
        assert_eq!(notice.failure(), None);
    }

    #[test]
    fn dismissed_notice_stays_cleared() {
        let mut notice = Notice::new();
        let t = notice.show("Grievance #3 is now Closed", false);
        notice.dismiss();
        assert!(!notice.expire(t));
        assert_eq!(notice.success(), None);
    }

    #[test]
    fn success_clears_loading() {
        let mut state = ViewState::new();
        let t = state.begin();
        assert!(state.loading);
        assert!(state.finish(t, Ok(vec![1, 2]), "Failed to load grievances"));
        assert!(!state.loading);
        assert_eq!(state.data, Some(vec![1, 2]));
    }

    #[test]
    fn error_uses_server_detail_or_fallback() {
        let mut state: ViewState<()> = ViewState::new();
        let t = state.begin();
        state.finish(
            t,
            Err(ApiError::Server { status: 404, detail: Some("Grievance not found".into()) }),
            "Failed to load grievance",
        );
        assert_eq!(state.error.as_deref(), Some("Grievance not found"));

        let t = state.begin();
        assert!(state.error.is_none());
        state.finish(t, Err(ApiError::transport("offline")), "Failed to load grievance");
        assert_eq!(state.error.as_deref(), Some("Failed to load grievance"));

        state.dismiss_error();
        assert!(state.error.is_none());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = ViewState::new();
        let first = state.begin();
        let second = state.begin();

        assert!(state.finish(second, Ok("resolved"), "x"));
        assert!(!state.finish(first, Ok("all"), "x"));
        assert_eq!(state.data, Some("resolved"));
        assert!(!state.loading);
        assert!(!state.is_current(first));
    }

    #[test]
    fn stale_error_does_not_mask_newer_data() {
        let mut state = ViewState::new();
        let first = state.begin();
        let second = state.begin();
        state.finish(second, Ok(1), "x");
        state.finish(first, Err(ApiError::transport("late")), "x");
        assert!(state.error.is_none());
        assert_eq!(state.data, Some(1));
    }
}
