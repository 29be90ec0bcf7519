use super::*;

#[derive(Debug)]
pub(crate) struct Page {
  pub(crate) entries: Vec<Entry>,
  pub(crate) next: Option<Cursor>,
}

impl Page {
  /// Converts raw comment objects one by one, skipping the ones that do not
  /// fit the expected shape.
  pub(crate) fn new(
    comments: Vec<Value>,
    level: Level,
    next: Option<Cursor>,
  ) -> Self {
    let entries = comments
      .into_iter()
      .filter_map(|value| {
        match serde_json::from_value::<RawComment>(value)
          .map_err(anyhow::Error::from)
          .and_then(|raw| raw.into_entry(level))
        {
          Ok(entry) => Some(entry),
          Err(error) => {
            warn!(level = level.label(), "skipping malformed comment: {error:#}");
            None
          }
        }
      })
      .collect();

    Self { entries, next }
  }
}
