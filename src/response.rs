#[derive(Clone, Debug)]
pub(crate) struct Response {
  pub(crate) body: String,
  pub(crate) status: u16,
}

impl Response {
  pub(crate) fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}
