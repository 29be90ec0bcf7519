use super::*;

/// One of the two comment listings, with the pacing used to walk it.
#[derive(Clone, Debug)]
pub(crate) struct Endpoint {
  pub(crate) level: Level,
  pub(crate) page_delay: Delay,
  pub(crate) retry: RetryPolicy,
  pub(crate) url: String,
}

impl Endpoint {
  pub(crate) fn parse(&self, body: &str) -> Outcome {
    match self.level {
      Level::Reply => ReplyResponse::parse(body),
      Level::Root => RootResponse::parse(body),
    }
  }

  /// Query for the page at `cursor`, where `target` is the post id for root
  /// listings and the thread id for reply listings.
  pub(crate) fn query(
    &self,
    target: &str,
    cursor: Option<&Cursor>,
  ) -> Vec<(&'static str, String)> {
    match self.level {
      Level::Reply => {
        let start = Cursor::start();
        let cursor = cursor.unwrap_or(&start);

        vec![
          ("cid", target.to_string()),
          ("max_id", cursor.value.clone()),
          ("max_id_type", cursor.kind.to_string()),
        ]
      }
      Level::Root => {
        let mut query = vec![("id", target.to_string()), ("mid", target.to_string())];

        if let Some(cursor) = cursor {
          query.push(("max_id", cursor.value.clone()));
        }

        query.push((
          "max_id_type",
          cursor.map_or(0, |cursor| cursor.kind).to_string(),
        ));

        query
      }
    }
  }

  pub(crate) fn reply(config: &Config) -> Self {
    Self {
      level: Level::Reply,
      page_delay: config.pacing.reply_page,
      retry: RetryPolicy {
        delay: config.pacing.reply_retry,
        max_attempts: config.pacing.max_attempts,
      },
      url: config.endpoints.reply.clone(),
    }
  }

  pub(crate) fn root(config: &Config) -> Self {
    Self {
      level: Level::Root,
      page_delay: config.pacing.root_page,
      retry: RetryPolicy {
        delay: config.pacing.root_retry,
        max_attempts: config.pacing.max_attempts,
      },
      url: config.endpoints.root.clone(),
    }
  }
}
