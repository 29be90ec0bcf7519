use super::*;

/// The `(max_id, max_id_type)` pair naming the next page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Cursor {
  pub(crate) kind: i64,
  pub(crate) value: String,
}

impl Cursor {
  const END: &str = "0";

  /// Builds the cursor for the following page, or `None` when the listing
  /// is exhausted.
  pub(crate) fn next(value: Option<String>, kind: Option<i64>) -> Option<Self> {
    let value = value?;

    if value == Self::END {
      return None;
    }

    Some(Self {
      kind: kind.unwrap_or_default(),
      value,
    })
  }

  pub(crate) fn start() -> Self {
    Self {
      kind: 0,
      value: Self::END.to_string(),
    }
  }
}

impl Display for Cursor {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}/{}", self.value, self.kind)
  }
}
