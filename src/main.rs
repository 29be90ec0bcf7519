use {
  anyhow::{Context, bail, ensure},
  arguments::Arguments,
  chrono::DateTime,
  clap::Parser,
  client::Client,
  comment::Comment,
  config::Config,
  crawler::Crawler,
  credential_pool::CredentialPool,
  crossterm::style::Stylize,
  cursor::Cursor,
  delay::Delay,
  endpoint::Endpoint,
  entry::Entry,
  futures::stream::{self, Stream, StreamExt},
  gender::Gender,
  level::Level,
  outcome::Outcome,
  pacing::Pacing,
  page::Page,
  rand::Rng,
  raw_comment::RawComment,
  regex::Regex,
  reply_response::ReplyResponse,
  request::Request,
  response::Response,
  retry_policy::RetryPolicy,
  root_response::RootResponse,
  serde::{
    Deserialize, Deserializer,
    de::{self, Unexpected},
  },
  serde_json::Value,
  sheet::Sheet,
  std::{
    backtrace::BacktraceStatus,
    env,
    fmt::{self, Display, Formatter},
    fs::{self, File},
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
    pin::pin,
    process,
    str::FromStr,
    time::Duration,
  },
  summary::Summary,
  termination::Termination,
  tracing::{debug, error, info, warn},
  transport::Transport,
  utils::{
    deserialize_optional_string, extract_post_id, normalize_timestamp,
    strip_tags,
  },
};

mod arguments;
mod client;
mod comment;
mod config;
mod crawler;
mod credential_pool;
mod cursor;
mod delay;
mod endpoint;
mod entry;
mod gender;
mod level;
mod logging;
mod outcome;
mod pacing;
mod page;
mod raw_comment;
mod reply_response;
mod request;
mod response;
mod retry_policy;
mod root_response;
mod sheet;
mod summary;
mod termination;
mod transport;
mod utils;

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

/// Crawls one post into `<output_dir>/<post id>.csv`. The sheet is saved
/// whether the crawl finishes or fails, and by its drop guard when this
/// future is dropped part way.
async fn crawl_post<T: Transport>(
  crawler: &Crawler<T>,
  url: &str,
  output_dir: &Path,
) -> Result {
  let post_id = crawler.resolve_post_id(url).await?;

  let mut sheet = Sheet::new(output_dir.join(format!("{post_id}.csv")));

  let result = crawler.crawl(&post_id, &mut sheet).await;

  sheet.save()?;

  let summary = result?;

  info!(
    post_id,
    path = %sheet.path().display(),
    rows = sheet.rows().len(),
    "finished: {summary}"
  );

  Ok(())
}

async fn crawl_posts<T: Transport>(
  crawler: &Crawler<T>,
  urls: &[String],
  output_dir: &Path,
) -> Result {
  for url in urls {
    crawl_post(crawler, url, output_dir)
      .await
      .with_context(|| format!("failed to collect comments for {url}"))?;
  }

  Ok(())
}

async fn run() -> Result {
  let arguments = Arguments::parse();

  let _guard = logging::init(&arguments.log_dir)?;

  let mut config = Config::load(arguments.config.as_deref())?;

  arguments.apply(&mut config);

  config.pacing.validate()?;

  let crawler = Crawler::new(Client::new(&config.user_agent)?, &config)?;

  until_interrupted(
    crawl_posts(&crawler, &arguments.urls, &arguments.output_dir),
    tokio::signal::ctrl_c(),
  )
  .await
}

/// Runs `work` to completion unless `interrupt` resolves first, in which
/// case `work` is dropped and the run fails.
async fn until_interrupted(
  work: impl Future<Output = Result>,
  interrupt: impl Future<Output = io::Result<()>>,
) -> Result {
  tokio::select! {
    result = work => result,
    signal = interrupt => {
      signal.context("could not listen for ctrl-c")?;
      warn!("interrupted, saving collected comments");
      bail!("interrupted")
    }
  }
}

#[tokio::main]
async fn main() {
  if let Err(error) = run().await {
    let use_color = io::stderr().is_terminal();

    if use_color {
      eprintln!("{} {error}", "error:".bold().red());
    } else {
      eprintln!("error: {error}");
    }

    for (i, error) in error.chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();

        if use_color {
          eprintln!("{}", "because:".bold().red());
        } else {
          eprintln!("because:");
        }
      }

      if use_color {
        eprintln!("{} {error}", "-".bold().red());
      } else {
        eprintln!("- {error}");
      }
    }

    let backtrace = error.backtrace();

    if backtrace.status() == BacktraceStatus::Captured {
      if use_color {
        eprintln!("{}", "backtrace:".bold().red());
      } else {
        eprintln!("backtrace:");
      }

      eprintln!("{backtrace}");
    }

    process::exit(1);
  }
}
