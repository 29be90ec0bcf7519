use super::*;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Request<'a> {
  pub(crate) cookie: &'a str,
  pub(crate) follow_redirects: bool,
  pub(crate) query: &'a [(&'static str, String)],
  pub(crate) timeout: Option<Duration>,
  pub(crate) url: &'a str,
}
