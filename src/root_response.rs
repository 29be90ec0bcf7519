use super::*;

/// Body of the root comment listing (`comments/hotflow`).
#[derive(Debug, Deserialize)]
pub(crate) struct RootResponse {
  pub(crate) data: Option<RootData>,
  pub(crate) ok: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RootData {
  pub(crate) data: Option<Vec<Value>>,
  #[serde(default, deserialize_with = "deserialize_optional_string")]
  pub(crate) max_id: Option<String>,
  pub(crate) max_id_type: Option<i64>,
}

impl RootResponse {
  pub(crate) fn parse(body: &str) -> Outcome {
    let response = match serde_json::from_str::<Self>(body) {
      Ok(response) => response,
      Err(error) => {
        warn!("root page is not a comment listing: {error}");
        return Outcome::Done(Termination::Malformed);
      }
    };

    if response.ok.is_some_and(|ok| ok != 1) {
      return Outcome::Done(Termination::NoData);
    }

    let Some(RootData {
      data: Some(comments),
      max_id,
      max_id_type,
    }) = response.data
    else {
      return Outcome::Done(Termination::NoData);
    };

    Outcome::Page(Page::new(
      comments,
      Level::Root,
      Cursor::next(max_id, max_id_type),
    ))
  }
}
