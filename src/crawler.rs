use super::*;

/// Where a page stream stands between two pulls.
enum Step {
  Done,
  Fetch {
    cursor: Option<Cursor>,
    pause: bool,
  },
  Finish(Termination),
}

/// Walks every root comment of a post and, under each one, its reply
/// thread, one request at a time.
pub(crate) struct Crawler<T> {
  credentials: CredentialPool,
  include_empty_threads: bool,
  reply: Endpoint,
  resolve_retry: RetryPolicy,
  resolve_timeout: Duration,
  root: Endpoint,
  transport: T,
}

impl<T: Transport> Crawler<T> {
  /// Appends every root comment and reply of `post_id` to `sheet`, replies
  /// directly after their root comment.
  pub(crate) async fn crawl(
    &self,
    post_id: &str,
    sheet: &mut Sheet,
  ) -> Result<Summary> {
    let mut summary = Summary::default();

    let mut pages = pin!(self.pages(&self.root, post_id, None));

    while let Some(outcome) = pages.next().await {
      let page = match outcome? {
        Outcome::Done(termination) => {
          info!(post_id, "root comments finished: {termination}");
          break;
        }
        Outcome::Page(page) => page,
      };

      for entry in page.entries {
        info!(">>> {}", entry.comment);

        let walk_thread = entry.has_replies() || self.include_empty_threads;

        let thread = entry.thread;

        sheet.push(entry.comment);

        summary.roots += 1;

        match thread {
          Some(thread) if walk_thread => {
            summary.replies += self.crawl_replies(&thread, sheet).await?;
          }
          _ => debug!("no replies to fetch"),
        }
      }
    }

    Ok(summary)
  }

  async fn crawl_replies(&self, thread: &str, sheet: &mut Sheet) -> Result<usize> {
    let mut count = 0;

    let mut pages = pin!(self.pages(&self.reply, thread, None));

    while let Some(outcome) = pages.next().await {
      match outcome? {
        Outcome::Done(termination) => {
          debug!(thread, "replies finished: {termination}");
        }
        Outcome::Page(page) => {
          for entry in page.entries {
            info!("\t{}", entry.comment);
            sheet.push(entry.comment);
            count += 1;
          }
        }
      }
    }

    Ok(count)
  }

  async fn fetch_page(
    &self,
    endpoint: &Endpoint,
    target: &str,
    cursor: Option<&Cursor>,
  ) -> Result<Outcome> {
    let query = endpoint.query(target, cursor);

    let response = self
      .send(
        endpoint.level.label(),
        &endpoint.url,
        &query,
        endpoint.retry,
        None,
        false,
      )
      .await?;

    Ok(endpoint.parse(&response.body))
  }

  pub(crate) fn new(transport: T, config: &Config) -> Result<Self> {
    let credentials = CredentialPool::new(config.credentials.clone())?;

    debug!(credentials = credentials.len(), "loaded credential pool");

    Ok(Self {
      credentials,
      include_empty_threads: config.include_empty_threads,
      reply: Endpoint::reply(config),
      resolve_retry: RetryPolicy {
        delay: config.pacing.resolve_retry,
        max_attempts: config.pacing.max_attempts,
      },
      resolve_timeout: config.pacing.resolve_timeout(),
      root: Endpoint::root(config),
      transport,
    })
  }

  /// Lazily fetches the pages of one listing starting at `start`. The stream
  /// yields each page followed by a final [`Outcome::Done`], or stops after
  /// the first error.
  pub(crate) fn pages<'a>(
    &'a self,
    endpoint: &'a Endpoint,
    target: &'a str,
    start: Option<Cursor>,
  ) -> impl Stream<Item = Result<Outcome>> + 'a {
    let first = Step::Fetch {
      cursor: start,
      pause: false,
    };

    stream::unfold(first, move |step| async move {
      let (cursor, pause) = match step {
        Step::Done => return None,
        Step::Fetch { cursor, pause } => (cursor, pause),
        Step::Finish(termination) => {
          return Some((Ok(Outcome::Done(termination)), Step::Done));
        }
      };

      if pause {
        endpoint.page_delay.sleep().await;
      }

      match self.fetch_page(endpoint, target, cursor.as_ref()).await {
        Ok(Outcome::Page(page)) => {
          let next = match &page.next {
            Some(cursor) => {
              debug!(level = endpoint.level.label(), %cursor, "next page");

              Step::Fetch {
                cursor: Some(cursor.clone()),
                pause: true,
              }
            }
            None => Step::Finish(Termination::Exhausted),
          };

          Some((Ok(Outcome::Page(page)), next))
        }
        Ok(done @ Outcome::Done(_)) => Some((Ok(done), Step::Done)),
        Err(error) => Some((Err(error), Step::Done)),
      }
    })
  }

  /// Fetches a post detail page and pulls the post id out of it.
  pub(crate) async fn resolve_post_id(&self, url: &str) -> Result<String> {
    let response = self
      .send(
        "detail",
        url,
        &[],
        self.resolve_retry,
        Some(self.resolve_timeout),
        true,
      )
      .await?;

    let post_id = extract_post_id(&response.body).with_context(|| {
      format!("no post id found at `{url}`, check that the link is correct")
    })?;

    info!(post_id, "resolved post id");

    Ok(post_id)
  }

  /// Sends the same request with a fresh credential until it gets a 2xx
  /// response or `retry` runs out of attempts.
  async fn send(
    &self,
    label: &str,
    url: &str,
    query: &[(&'static str, String)],
    retry: RetryPolicy,
    timeout: Option<Duration>,
    follow_redirects: bool,
  ) -> Result<Response> {
    let mut attempt = 0;

    loop {
      attempt += 1;

      let cookie = self.credentials.choose();

      let prefix = cookie.chars().take(20).collect::<String>();

      debug!(cookie = %prefix, "using credential");

      let request = Request {
        cookie,
        follow_redirects,
        query,
        timeout,
        url,
      };

      let failure = match self.transport.get(&request).await {
        Ok(response) if response.is_success() => return Ok(response),
        Ok(response) => format!("status {}", response.status),
        Err(error) => format!("{error:#}"),
      };

      if !retry.allows_retry_after(attempt) {
        bail!("{label} request to {url} failed after {attempt} attempts: {failure}");
      }

      warn!(attempt, "{label} request to {url} failed: {failure}, retrying");

      retry.delay.sleep().await;
    }
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::config::Endpoints,
    serde_json::json,
    std::{
      cell::RefCell,
      collections::{HashMap, VecDeque},
      sync::atomic::{AtomicUsize, Ordering},
    },
  };

  const DETAIL_URL: &str = "https://m.weibo.cn/status/Ktsc870Sn";

  static COUNTER: AtomicUsize = AtomicUsize::new(0);

  #[derive(Debug, Clone)]
  struct Sent {
    cookie: String,
    query: Vec<(&'static str, String)>,
    url: String,
  }

  #[derive(Default)]
  struct FakeTransport {
    responses: RefCell<HashMap<String, VecDeque<Response>>>,
    sent: RefCell<Vec<Sent>>,
  }

  impl FakeTransport {
    fn queue(self, url: &str, status: u16, body: impl Into<String>) -> Self {
      self
        .responses
        .borrow_mut()
        .entry(url.to_string())
        .or_default()
        .push_back(Response {
          body: body.into(),
          status,
        });

      self
    }

    fn sent_to(&self, url: &str) -> Vec<Sent> {
      self
        .sent
        .borrow()
        .iter()
        .filter(|sent| sent.url == url)
        .cloned()
        .collect()
    }
  }

  impl Transport for FakeTransport {
    async fn get(&self, request: &Request<'_>) -> Result<Response> {
      self.sent.borrow_mut().push(Sent {
        cookie: request.cookie.to_string(),
        query: request.query.to_vec(),
        url: request.url.to_string(),
      });

      self
        .responses
        .borrow_mut()
        .get_mut(request.url)
        .and_then(VecDeque::pop_front)
        .with_context(|| format!("no response queued for {}", request.url))
    }
  }

  fn config() -> Config {
    Config {
      credentials: vec!["SUB=one".into(), "SUB=two".into()],
      endpoints: Endpoints {
        reply: "https://test/reply".into(),
        root: "https://test/root".into(),
      },
      include_empty_threads: false,
      pacing: Pacing::immediate(),
      user_agent: "test".into(),
    }
  }

  fn crawler(transport: FakeTransport) -> Crawler<FakeTransport> {
    Crawler::new(transport, &config()).unwrap()
  }

  fn sheet() -> Sheet {
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);

    Sheet::new(env::temp_dir().join(format!(
      "weibo_comments_crawler_test_{}_{unique}.csv",
      process::id()
    )))
  }

  fn finish(mut sheet: Sheet) -> Vec<(String, Level)> {
    let rows = sheet
      .rows()
      .iter()
      .map(|comment| (comment.text.clone(), comment.level))
      .collect();

    sheet.save().unwrap();

    fs::remove_file(sheet.path()).unwrap();

    rows
  }

  fn raw_comment(text: &str, rootid: &str, replies: u64) -> Value {
    json!({
      "created_at": "Sun Aug 15 01:27:28 +0800 2021",
      "id": rootid,
      "rootid": rootid,
      "text": text,
      "total_number": replies,
      "user": { "gender": "f", "screen_name": "alice" }
    })
  }

  fn root_page(comments: Vec<Value>, max_id: Value, max_id_type: i64) -> String {
    json!({
      "ok": 1,
      "data": {
        "data": comments,
        "max_id": max_id,
        "max_id_type": max_id_type
      }
    })
    .to_string()
  }

  fn reply_page(comments: Vec<Value>, max_id: Value) -> String {
    json!({
      "ok": 1,
      "data": comments,
      "max_id": max_id,
      "max_id_type": 0
    })
    .to_string()
  }

  fn two_roots_one_reply() -> String {
    root_page(
      vec![
        raw_comment("<b>root one</b>", "111", 1),
        raw_comment("root two", "222", 0),
      ],
      json!(0),
      0,
    )
  }

  fn expected_rows() -> Vec<(String, Level)> {
    vec![
      ("root one".into(), Level::Root),
      ("reply one".into(), Level::Reply),
      ("root two".into(), Level::Root),
    ]
  }

  #[tokio::test]
  async fn replies_follow_their_root_comment() {
    let crawler = crawler(
      FakeTransport::default()
        .queue("https://test/root", 200, two_roots_one_reply())
        .queue(
          "https://test/reply",
          200,
          reply_page(vec![raw_comment("reply one", "111", 0)], json!(0)),
        ),
    );

    let mut sheet = sheet();

    let summary = crawler.crawl("4670", &mut sheet).await.unwrap();

    assert_eq!(summary, Summary { replies: 1, roots: 2 });
    assert_eq!(finish(sheet), expected_rows());

    let replies = crawler.transport.sent_to("https://test/reply");

    assert_eq!(replies.len(), 1);

    assert_eq!(
      replies[0].query,
      [
        ("cid", "111".to_string()),
        ("max_id", "0".to_string()),
        ("max_id_type", "0".to_string())
      ]
    );
  }

  #[tokio::test]
  async fn zero_cursor_stops_without_further_requests() {
    let crawler = crawler(FakeTransport::default().queue(
      "https://test/root",
      200,
      root_page(vec![raw_comment("only", "1", 0)], json!("0"), 0),
    ));

    let mut sheet = sheet();

    crawler.crawl("4670", &mut sheet).await.unwrap();

    assert_eq!(crawler.transport.sent.borrow().len(), 1);
    assert_eq!(finish(sheet).len(), 1);
  }

  #[tokio::test]
  async fn cursor_is_carried_to_next_page() {
    let crawler = crawler(
      FakeTransport::default()
        .queue(
          "https://test/root",
          200,
          root_page(vec![raw_comment("page one", "1", 0)], json!(139_012), 1),
        )
        .queue(
          "https://test/root",
          200,
          root_page(vec![raw_comment("page two", "2", 0)], json!(0), 0),
        ),
    );

    let mut sheet = sheet();

    crawler.crawl("4670", &mut sheet).await.unwrap();

    let sent = crawler.transport.sent_to("https://test/root");

    assert_eq!(sent.len(), 2);

    assert_eq!(
      sent[1].query,
      [
        ("id", "4670".to_string()),
        ("mid", "4670".to_string()),
        ("max_id", "139012".to_string()),
        ("max_id_type", "1".to_string())
      ]
    );

    assert_eq!(
      finish(sheet),
      [
        ("page one".to_string(), Level::Root),
        ("page two".to_string(), Level::Root)
      ]
    );
  }

  #[tokio::test]
  async fn reply_threads_are_paginated() {
    let crawler = crawler(
      FakeTransport::default()
        .queue(
          "https://test/root",
          200,
          root_page(vec![raw_comment("root", "111", 2)], json!(0), 0),
        )
        .queue(
          "https://test/reply",
          200,
          reply_page(vec![raw_comment("first reply", "111", 0)], json!(5_555)),
        )
        .queue(
          "https://test/reply",
          200,
          reply_page(vec![raw_comment("second reply", "111", 0)], json!(0)),
        ),
    );

    let mut sheet = sheet();

    let summary = crawler.crawl("4670", &mut sheet).await.unwrap();

    assert_eq!(summary.replies, 2);

    let sent = crawler.transport.sent_to("https://test/reply");

    assert_eq!(sent[1].query[1], ("max_id", "5555".to_string()));

    assert_eq!(finish(sheet).len(), 3);
  }

  #[tokio::test]
  async fn failed_page_is_retried_once_with_same_parameters() {
    let crawler = crawler(
      FakeTransport::default()
        .queue("https://test/root", 502, "Bad Gateway")
        .queue("https://test/root", 200, two_roots_one_reply())
        .queue(
          "https://test/reply",
          200,
          reply_page(vec![raw_comment("reply one", "111", 0)], json!(0)),
        ),
    );

    let mut sheet = sheet();

    crawler.crawl("4670", &mut sheet).await.unwrap();

    let sent = crawler.transport.sent_to("https://test/root");

    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].query, sent[1].query);
    assert_eq!(finish(sheet), expected_rows());
  }

  #[tokio::test]
  async fn invalid_json_ends_with_empty_table() {
    let crawler = crawler(FakeTransport::default().queue(
      "https://test/root",
      200,
      "<html>Sina Visitor System</html>",
    ));

    let mut sheet = sheet();

    let summary = crawler.crawl("4670", &mut sheet).await.unwrap();

    assert_eq!(summary, Summary::default());
    assert!(finish(sheet).is_empty());
  }

  #[tokio::test]
  async fn no_data_signal_ends_with_empty_table() {
    let crawler = crawler(FakeTransport::default().queue(
      "https://test/root",
      200,
      r#"{"ok": 0, "msg": "快来发表你的评论吧"}"#,
    ));

    let mut sheet = sheet();

    crawler.crawl("4670", &mut sheet).await.unwrap();

    assert!(finish(sheet).is_empty());
  }

  #[tokio::test]
  async fn retries_stop_at_ceiling() {
    let crawler = crawler(
      FakeTransport::default()
        .queue("https://test/root", 500, "")
        .queue("https://test/root", 500, "")
        .queue("https://test/root", 500, ""),
    );

    let mut sheet = sheet();

    let error = crawler.crawl("4670", &mut sheet).await.unwrap_err();

    assert!(
      error.to_string().contains("failed after 3 attempts"),
      "{error}"
    );

    assert_eq!(crawler.transport.sent_to("https://test/root").len(), 3);

    finish(sheet);
  }

  #[tokio::test]
  async fn rows_before_a_failure_are_kept() {
    let crawler = crawler(FakeTransport::default().queue(
      "https://test/root",
      200,
      root_page(vec![raw_comment("root", "111", 4)], json!(0), 0),
    ));

    let mut sheet = sheet();

    assert!(crawler.crawl("4670", &mut sheet).await.is_err());

    assert_eq!(finish(sheet), [("root".to_string(), Level::Root)]);
  }

  #[tokio::test]
  async fn every_request_uses_a_pooled_credential() {
    let crawler = crawler(
      FakeTransport::default()
        .queue("https://test/root", 503, "")
        .queue("https://test/root", 200, two_roots_one_reply())
        .queue(
          "https://test/reply",
          200,
          reply_page(vec![raw_comment("reply one", "111", 0)], json!(0)),
        ),
    );

    let mut sheet = sheet();

    crawler.crawl("4670", &mut sheet).await.unwrap();

    for sent in crawler.transport.sent.borrow().iter() {
      assert!(crawler.credentials.contains(&sent.cookie), "{sent:?}");
    }

    finish(sheet);
  }

  #[tokio::test]
  async fn empty_threads_are_walked_when_enabled() {
    let transport = FakeTransport::default()
      .queue("https://test/root", 200, two_roots_one_reply())
      .queue(
        "https://test/reply",
        200,
        reply_page(vec![raw_comment("reply one", "111", 0)], json!(0)),
      )
      .queue("https://test/reply", 200, r#"{"ok": 0}"#);

    let crawler = Crawler::new(
      transport,
      &Config {
        include_empty_threads: true,
        ..config()
      },
    )
    .unwrap();

    let mut sheet = sheet();

    crawler.crawl("4670", &mut sheet).await.unwrap();

    let sent = crawler.transport.sent_to("https://test/reply");

    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].query[0], ("cid", "222".to_string()));

    finish(sheet);
  }

  #[tokio::test]
  async fn pages_stream_reports_termination() {
    let crawler = crawler(FakeTransport::default().queue(
      "https://test/reply",
      200,
      reply_page(vec![raw_comment("reply", "1", 0)], json!(0)),
    ));

    let outcomes = crawler
      .pages(&crawler.reply, "1", None)
      .collect::<Vec<_>>()
      .await;

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0], Ok(Outcome::Page(_))));

    assert!(matches!(
      outcomes[1],
      Ok(Outcome::Done(Termination::Exhausted))
    ));
  }

  #[tokio::test]
  async fn pages_stream_restarts_from_cursor() {
    let crawler = crawler(FakeTransport::default().queue(
      "https://test/root",
      200,
      root_page(vec![], json!(0), 0),
    ));

    let start = Cursor {
      kind: 1,
      value: "777".into(),
    };

    let outcomes = crawler
      .pages(&crawler.root, "4670", Some(start))
      .collect::<Vec<_>>()
      .await;

    assert_eq!(outcomes.len(), 2);

    assert_eq!(
      crawler.transport.sent_to("https://test/root")[0].query[2],
      ("max_id", "777".to_string())
    );
  }

  #[tokio::test]
  async fn resolves_post_id_from_detail_page() {
    let crawler = crawler(
      FakeTransport::default()
        .queue(DETAIL_URL, 418, "")
        .queue(
          DETAIL_URL,
          200,
          r#"var $render_data = [{"status": {"id": "4670123456789012"}}]"#,
        ),
    );

    assert_eq!(
      crawler.resolve_post_id(DETAIL_URL).await.unwrap(),
      "4670123456789012"
    );

    assert_eq!(crawler.transport.sent_to(DETAIL_URL).len(), 2);
  }

  #[tokio::test]
  async fn missing_post_id_is_fatal() {
    let crawler = crawler(FakeTransport::default().queue(
      DETAIL_URL,
      200,
      "<html>登录</html>",
    ));

    let error = crawler.resolve_post_id(DETAIL_URL).await.unwrap_err();

    assert!(error.to_string().contains("no post id found"), "{error}");
    assert_eq!(crawler.transport.sent_to(DETAIL_URL).len(), 1);
  }

  #[test]
  fn empty_credentials_are_rejected() {
    let result = Crawler::new(
      FakeTransport::default(),
      &Config {
        credentials: Vec::new(),
        ..config()
      },
    );

    assert!(result.is_err());
  }
}
