//! Retry policies for handling `429 Too Many Requests` replies.

use std::num::NonZeroU32;
use std::ops::ControlFlow;
use std::time::Duration;

use crate::errors::InvocationError;

/// Controls how the client reacts when a correlated request fails.
pub trait RetryPolicy: Send + Sync + 'static {
    fn should_retry(&self, ctx: &RetryContext) -> ControlFlow<(), Duration>;
}

/// Context passed to [`RetryPolicy::should_retry`] on each failure.
pub struct RetryContext {
    pub fail_count:   NonZeroU32,
    pub slept_so_far: Duration,
    pub error:        InvocationError,
}

/// Never retry.
pub struct NoRetries;
impl RetryPolicy for NoRetries {
    fn should_retry(&self, _: &RetryContext) -> ControlFlow<(), Duration> {
        ControlFlow::Break(())
    }
}

/// Sleep once on a flood wait no longer than `threshold`, then retry.
pub struct AutoSleep {
    pub threshold: Duration,
}

impl Default for AutoSleep {
    fn default() -> Self {
        Self { threshold: Duration::from_secs(60) }
    }
}

impl RetryPolicy for AutoSleep {
    fn should_retry(&self, ctx: &RetryContext) -> ControlFlow<(), Duration> {
        if let Some(wait) = ctx.error.retry_after() {
            if ctx.fail_count.get() == 1 && wait <= self.threshold {
                tracing::warn!("[tdlayer] flood wait {wait:?}, sleeping before retry");
                return ControlFlow::Continue(wait);
            }
        }
        ControlFlow::Break(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TdError;

    fn ctx(fail_count: u32, code: i32, message: &str) -> RetryContext {
        RetryContext {
            fail_count:   NonZeroU32::new(fail_count).unwrap(),
            slept_so_far: Duration::ZERO,
            error:        TdError { code, message: message.into() }.into(),
        }
    }

    #[test]
    fn auto_sleep_retries_short_flood_once() {
        let p = AutoSleep::default();
        assert_eq!(
            p.should_retry(&ctx(1, 429, "Too Many Requests: retry after 3")),
            ControlFlow::Continue(Duration::from_secs(3)),
        );
        assert_eq!(p.should_retry(&ctx(2, 429, "Too Many Requests: retry after 3")), ControlFlow::Break(()));
    }

    #[test]
    fn auto_sleep_gives_up_on_long_flood_and_other_errors() {
        let p = AutoSleep { threshold: Duration::from_secs(10) };
        assert_eq!(p.should_retry(&ctx(1, 429, "Too Many Requests: retry after 3600")), ControlFlow::Break(()));
        assert_eq!(p.should_retry(&ctx(1, 400, "CHAT_NOT_FOUND")), ControlFlow::Break(()));
    }

    #[test]
    fn no_retries_never_retries() {
        assert_eq!(NoRetries.should_retry(&ctx(1, 429, "Too Many Requests: retry after 1")), ControlFlow::Break(()));
    }
}
