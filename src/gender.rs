use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Gender {
  Female,
  Male,
}

impl Gender {
  pub(crate) fn label(self) -> &'static str {
    match self {
      Self::Female => "女",
      Self::Male => "男",
    }
  }
}

impl Display for Gender {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Gender {
  type Err = anyhow::Error;

  fn from_str(code: &str) -> Result<Self> {
    match code {
      "f" => Ok(Self::Female),
      "m" => Ok(Self::Male),
      _ => bail!("unknown gender code `{code}`"),
    }
  }
}
