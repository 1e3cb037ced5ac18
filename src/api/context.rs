//! Per-query cancellation and deadline
//!
//! A [`QueryContext`] is threaded through every fetch. It is the external abort
//! channel (manual cancel or deadline); the sink's remaining-row budget is a
//! separate, application-level stop signal checked by the lister.

use super::{ApiError, ApiResult};
use std::time::{Duration, Instant};

/// Shared cancel signal. Clones and child tokens observe the same cancellation.
pub use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// Context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` means no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|r| r.is_zero())
    }

    /// Fail if the query was cancelled or ran out of time
    pub fn check(&self) -> ApiResult<()> {
        if self.token.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        if self.is_expired() {
            return Err(ApiError::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_context_never_fails() {
        let ctx = QueryContext::background();
        assert!(ctx.check().is_ok());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let ctx = QueryContext::background().with_token(token.clone());
        assert!(ctx.check().is_ok());

        token.cancel();
        assert!(matches!(ctx.check(), Err(ApiError::Cancelled)));
    }

    #[test]
    fn test_parent_cancel_reaches_child_context() {
        let parent = CancellationToken::new();
        let ctx = QueryContext::with_timeout(Duration::from_secs(60)).with_token(parent.child_token());

        parent.cancel();
        assert!(matches!(ctx.check(), Err(ApiError::Cancelled)));
    }

    #[test]
    fn test_child_cancel_leaves_parent_running() {
        let parent = CancellationToken::new();
        let child = QueryContext::background().with_token(parent.child_token());
        let sibling = QueryContext::background().with_token(parent.clone());

        child.token().cancel();
        assert!(matches!(child.check(), Err(ApiError::Cancelled)));
        assert!(sibling.check().is_ok());
    }

    #[test]
    fn test_past_deadline_is_expired() {
        let ctx = QueryContext::background().with_deadline(Instant::now());
        assert!(ctx.is_expired());
        assert!(matches!(ctx.check(), Err(ApiError::DeadlineExceeded)));
    }

    #[test]
    fn test_timeout_leaves_time_remaining() {
        let ctx = QueryContext::with_timeout(Duration::from_secs(60));
        assert!(ctx.remaining().unwrap() > Duration::from_secs(30));
        assert!(ctx.check().is_ok());
    }
}
