use super::*;

#[derive(Debug)]
pub(crate) enum Outcome {
  Done(Termination),
  Page(Page),
}
