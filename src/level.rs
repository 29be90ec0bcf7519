#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Level {
  Reply,
  Root,
}

impl Level {
  /// Value written to the comment level column.
  pub(crate) fn column(self) -> &'static str {
    match self {
      Self::Reply => "2",
      Self::Root => "1",
    }
  }

  pub(crate) fn label(self) -> &'static str {
    match self {
      Self::Reply => "reply",
      Self::Root => "root",
    }
  }
}
