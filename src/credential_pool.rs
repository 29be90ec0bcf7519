use super::*;

/// Cookies picked at random for every request.
#[derive(Clone, Debug)]
pub(crate) struct CredentialPool {
  credentials: Vec<String>,
}

impl CredentialPool {
  pub(crate) fn choose(&self) -> &str {
    self.choose_with(&mut rand::thread_rng())
  }

  pub(crate) fn choose_with<R: Rng>(&self, rng: &mut R) -> &str {
    &self.credentials[rng.gen_range(0..self.credentials.len())]
  }

  #[cfg(test)]
  pub(crate) fn contains(&self, credential: &str) -> bool {
    self.credentials.iter().any(|c| c == credential)
  }

  pub(crate) fn len(&self) -> usize {
    self.credentials.len()
  }

  pub(crate) fn new(credentials: Vec<String>) -> Result<Self> {
    let credentials = credentials
      .into_iter()
      .map(|credential| credential.trim().to_string())
      .filter(|credential| !credential.is_empty())
      .collect::<Vec<_>>();

    ensure!(
      !credentials.is_empty(),
      "no credentials configured, add at least one cookie to `credentials`"
    );

    Ok(Self { credentials })
  }
}
