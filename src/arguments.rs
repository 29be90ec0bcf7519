use super::*;

#[derive(Debug, Parser)]
#[command(
  version,
  about = "Collect every comment and reply under a Weibo post into a spreadsheet"
)]
pub(crate) struct Arguments {
  /// Config file, defaults to `$WEIBO_COMMENTS_CONFIG` or
  /// `~/.config/weibo-comments/config.toml`
  #[arg(long, value_name = "PATH")]
  pub(crate) config: Option<PathBuf>,
  /// Also request reply threads whose root comment reports no replies
  #[arg(long)]
  pub(crate) include_empty_threads: bool,
  #[arg(long, value_name = "DIR", default_value = "./logs")]
  pub(crate) log_dir: PathBuf,
  /// Give up on a request after this many attempts
  #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
  pub(crate) max_attempts: Option<u32>,
  #[arg(long, value_name = "DIR", default_value = ".")]
  pub(crate) output_dir: PathBuf,
  /// Post detail links, e.g. https://m.weibo.cn/status/Ktsc870Sn
  #[arg(required = true, value_name = "URL")]
  pub(crate) urls: Vec<String>,
}

impl Arguments {
  pub(crate) fn apply(&self, config: &mut Config) {
    if let Some(max_attempts) = self.max_attempts {
      config.pacing.max_attempts = Some(max_attempts);
    }

    config.include_empty_threads |= self.include_empty_threads;
  }
}
