use super::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
  pub(crate) replies: usize,
  pub(crate) roots: usize,
}

impl Display for Summary {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{} root comments, {} replies", self.roots, self.replies)
  }
}
