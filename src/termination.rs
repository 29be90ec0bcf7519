use super::*;

/// Why a page stream ended without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Termination {
  /// The next cursor was `0` or missing.
  Exhausted,
  /// The body could not be read as a page.
  Malformed,
  /// The API answered with `ok != 1` or without a comment list.
  NoData,
}

impl Display for Termination {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(match self {
      Self::Exhausted => "cursor exhausted",
      Self::Malformed => "unparseable response",
      Self::NoData => "no more data",
    })
  }
}
