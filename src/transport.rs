use super::*;

/// Issues a single GET. Errors are transport failures; any status code is
/// returned as a response.
pub(crate) trait Transport {
  async fn get(&self, request: &Request<'_>) -> Result<Response>;
}
