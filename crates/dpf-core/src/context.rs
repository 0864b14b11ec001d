//! Cancellation and deadline context for long-running calls
//!
//! A [`Context`] pairs a [`CancellationToken`] with an optional deadline.
//! Watchers consult it before every wait and around every request.

use crate::error::{Error, Result};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never done unless cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A context driven by an existing token
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Child context: cancelled with its parent, deadline is the earlier of
    /// the parent's and `timeout` from now
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let own = timeout.map(|timeout| Instant::now() + timeout);
        let deadline = match (self.deadline, own) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    /// Cancel this context and its children
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Deadline, if one was set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Underlying cancellation token
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// `Err` once the context is done; cancellation wins over the deadline
    pub fn err(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves with the reason once the context is done
    pub async fn done(&self) -> Error {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Error::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => Error::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                Error::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_is_not_done() {
        let ctx = Context::background();
        assert!(ctx.err().is_ok());
        assert!(ctx.deadline().is_none());
    }

    #[tokio::test]
    async fn test_cancel_reports_cancelled() {
        let ctx = Context::with_timeout(Duration::from_secs(60));
        ctx.cancel();

        assert!(matches!(ctx.err(), Err(Error::Cancelled)));
        assert!(matches!(ctx.done().await, Error::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let ctx = Context::with_timeout(Duration::from_secs(5));
        assert!(ctx.err().is_ok());

        let reason = ctx.done().await;
        assert!(matches!(reason, Error::DeadlineExceeded));
        assert!(matches!(ctx.err(), Err(Error::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_child_follows_parent() {
        let parent = Context::background();
        let child = parent.child(Some(Duration::from_secs(1)));
        assert!(child.deadline().is_some());

        parent.cancel();
        assert!(matches!(child.err(), Err(Error::Cancelled)));
    }
}
