use {
  super::*,
  tracing_appender::{non_blocking::WorkerGuard, rolling},
  tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
  },
};

const LOG_FILE: &str = "weibo-comments.log";

/// Logs to stderr and to a daily rotated file in `log_dir`. The returned
/// guard flushes the file writer when dropped.
pub(crate) fn init(log_dir: &Path) -> Result<WorkerGuard> {
  fs::create_dir_all(log_dir).with_context(|| {
    format!("could not create log directory `{}`", log_dir.display())
  })?;

  let (writer, guard) =
    tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE));

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(io::stderr))
    .with(fmt::layer().with_ansi(false).with_writer(writer))
    .try_init()
    .context("could not install log subscriber")?;

  Ok(guard)
}
