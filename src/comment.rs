use super::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Comment {
  pub(crate) author: String,
  pub(crate) gender: Gender,
  pub(crate) level: Level,
  pub(crate) text: String,
  pub(crate) time: String,
}

impl Comment {
  pub(crate) fn record(&self) -> [&str; 5] {
    [
      &self.author,
      self.gender.label(),
      &self.text,
      &self.time,
      self.level.column(),
    ]
  }
}

impl Display for Comment {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(
      f,
      "{} {} {} {}",
      self.author, self.gender, self.text, self.time
    )
  }
}
