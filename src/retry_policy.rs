use super::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RetryPolicy {
  pub(crate) delay: Delay,
  /// Total attempts per request, `None` retries until the request succeeds.
  pub(crate) max_attempts: Option<u32>,
}

impl RetryPolicy {
  pub(crate) fn allows_retry_after(&self, attempt: u32) -> bool {
    self.max_attempts.is_none_or(|max| attempt < max)
  }
}
