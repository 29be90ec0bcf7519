use super::*;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Endpoints {
  pub(crate) reply: String,
  pub(crate) root: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) credentials: Vec<String>,
  pub(crate) endpoints: Endpoints,
  pub(crate) include_empty_threads: bool,
  pub(crate) pacing: Pacing,
  pub(crate) user_agent: String,
}

impl Default for Endpoints {
  fn default() -> Self {
    Self {
      reply: "https://m.weibo.cn/comments/hotFlowChild".into(),
      root: "https://m.weibo.cn/comments/hotflow".into(),
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      credentials: Vec::new(),
      endpoints: Endpoints::default(),
      include_empty_threads: false,
      pacing: Pacing::default(),
      user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 13_2_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.0.3 Mobile/15E148 Safari/604.1".into(),
    }
  }
}

impl Config {
  const CREDENTIALS_VAR: &str = "WEIBO_COMMENTS_CREDENTIALS";

  const PATH_VAR: &str = "WEIBO_COMMENTS_CONFIG";

  fn default_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(Self::PATH_VAR) {
      return Ok(PathBuf::from(path));
    }

    let base_dir = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
      PathBuf::from(dir)
    } else if let Ok(home) = env::var("HOME") {
      PathBuf::from(home).join(".config")
    } else {
      env::current_dir()?.join(".config")
    };

    Ok(base_dir.join("weibo-comments").join("config.toml"))
  }

  /// Reads the config file, falling back to defaults when no explicit path
  /// was given and the default location has no file.
  pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
    let mut config = match path {
      Some(path) => Self::read(path)?,
      None => {
        let path = Self::default_path()?;

        if path.exists() {
          Self::read(&path)?
        } else {
          debug!(path = %path.display(), "no config file, using defaults");
          Self::default()
        }
      }
    };

    if let Ok(credentials) = env::var(Self::CREDENTIALS_VAR) {
      config.credentials = parse_credentials(&credentials);
    }

    Ok(config)
  }

  pub(crate) fn parse(text: &str) -> Result<Self> {
    let config = toml::from_str::<Self>(text)?;

    config.pacing.validate()?;

    Ok(config)
  }

  fn read(path: &Path) -> Result<Self> {
    let text = fs::read_to_string(path).with_context(|| {
      format!("could not read config file `{}`", path.display())
    })?;

    Self::parse(&text).with_context(|| {
      format!("could not parse config file `{}`", path.display())
    })
  }
}

fn parse_credentials(value: &str) -> Vec<String> {
  value
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect()
}
