use super::*;

/// A converted comment plus what is needed to walk its reply thread.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
  pub(crate) comment: Comment,
  pub(crate) replies: u64,
  pub(crate) thread: Option<String>,
}

impl Entry {
  pub(crate) fn has_replies(&self) -> bool {
    self.replies > 0
  }
}
