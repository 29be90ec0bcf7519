use super::*;

/// A pause drawn uniformly from `min..=max` seconds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Delay {
  pub(crate) max: f64,
  pub(crate) min: f64,
}

impl Delay {
  pub(crate) const ZERO: Self = Self::fixed(0.0);

  pub(crate) const fn between(min: f64, max: f64) -> Self {
    Self { max, min }
  }

  pub(crate) const fn fixed(seconds: f64) -> Self {
    Self::between(seconds, seconds)
  }

  pub(crate) fn sample(&self) -> Duration {
    self.sample_with(&mut rand::thread_rng())
  }

  pub(crate) fn sample_with<R: Rng>(&self, rng: &mut R) -> Duration {
    let seconds = if self.max > self.min {
      rng.gen_range(self.min..=self.max)
    } else {
      self.min
    };

    Duration::try_from_secs_f64(seconds).unwrap_or_default()
  }

  pub(crate) async fn sleep(&self) {
    let duration = self.sample();

    if !duration.is_zero() {
      debug!(?duration, "sleeping");
      tokio::time::sleep(duration).await;
    }
  }

  pub(crate) fn validate(&self, name: &str) -> Result {
    ensure!(
      self.min.is_finite() && self.max.is_finite(),
      "`{name}` must be a finite number of seconds"
    );

    ensure!(self.min >= 0.0, "`{name}.min` must not be negative");

    ensure!(
      self.max >= self.min,
      "`{name}.max` must not be smaller than `{name}.min`"
    );

    Ok(())
  }
}
