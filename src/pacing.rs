use super::*;

/// Pauses between pages and between failed attempts, in seconds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Pacing {
  pub(crate) max_attempts: Option<u32>,
  pub(crate) reply_page: Delay,
  pub(crate) reply_retry: Delay,
  pub(crate) resolve_retry: Delay,
  pub(crate) resolve_timeout: f64,
  pub(crate) root_page: Delay,
  pub(crate) root_retry: Delay,
}

impl Default for Pacing {
  fn default() -> Self {
    Self {
      max_attempts: None,
      reply_page: Delay::between(7.0, 9.0),
      reply_retry: Delay::fixed(10.0),
      resolve_retry: Delay::fixed(8.0),
      resolve_timeout: 15.0,
      root_page: Delay::between(5.0, 10.0),
      root_retry: Delay::between(5.0, 10.0),
    }
  }
}

impl Pacing {
  #[cfg(test)]
  pub(crate) fn immediate() -> Self {
    Self {
      max_attempts: Some(3),
      reply_page: Delay::ZERO,
      reply_retry: Delay::ZERO,
      resolve_retry: Delay::ZERO,
      resolve_timeout: 1.0,
      root_page: Delay::ZERO,
      root_retry: Delay::ZERO,
    }
  }

  pub(crate) fn resolve_timeout(&self) -> Duration {
    Duration::try_from_secs_f64(self.resolve_timeout)
      .unwrap_or(Duration::from_secs(15))
  }

  pub(crate) fn validate(&self) -> Result {
    for (name, delay) in [
      ("reply_page", self.reply_page),
      ("reply_retry", self.reply_retry),
      ("resolve_retry", self.resolve_retry),
      ("root_page", self.root_page),
      ("root_retry", self.root_retry),
    ] {
      delay.validate(&format!("pacing.{name}"))?;
    }

    ensure!(
      self.resolve_timeout.is_finite() && self.resolve_timeout > 0.0,
      "`pacing.resolve_timeout` must be a positive number of seconds"
    );

    ensure!(
      self.max_attempts != Some(0),
      "`pacing.max_attempts` must be at least 1"
    );

    Ok(())
  }
}
