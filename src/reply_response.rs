use super::*;

/// Body of a reply thread listing (`comments/hotFlowChild`).
#[derive(Debug, Deserialize)]
pub(crate) struct ReplyResponse {
  pub(crate) data: Option<Vec<Value>>,
  #[serde(default, deserialize_with = "deserialize_optional_string")]
  pub(crate) max_id: Option<String>,
  pub(crate) max_id_type: Option<i64>,
  pub(crate) ok: Option<i64>,
}

impl ReplyResponse {
  pub(crate) fn parse(body: &str) -> Outcome {
    let response = match serde_json::from_str::<Self>(body) {
      Ok(response) => response,
      Err(error) => {
        warn!("reply page is not a comment listing: {error}");
        return Outcome::Done(Termination::Malformed);
      }
    };

    if response.ok.is_some_and(|ok| ok != 1) {
      return Outcome::Done(Termination::NoData);
    }

    let Some(comments) = response.data else {
      return Outcome::Done(Termination::NoData);
    };

    Outcome::Page(Page::new(
      comments,
      Level::Reply,
      Cursor::next(response.max_id, response.max_id_type),
    ))
  }
}
