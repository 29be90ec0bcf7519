use {super::*, reqwest::redirect::Policy};

#[derive(Clone)]
pub(crate) struct Client {
  client: reqwest::Client,
  no_redirects: reqwest::Client,
}

impl Client {
  pub(crate) fn new(user_agent: &str) -> Result<Self> {
    let build = |policy: Policy| {
      reqwest::Client::builder()
        .user_agent(user_agent)
        .redirect(policy)
        .build()
        .context("failed to build HTTP client")
    };

    Ok(Self {
      client: build(Policy::default())?,
      no_redirects: build(Policy::none())?,
    })
  }
}

impl Transport for Client {
  async fn get(&self, request: &Request<'_>) -> Result<Response> {
    let client = if request.follow_redirects {
      &self.client
    } else {
      &self.no_redirects
    };

    let mut builder = client
      .get(request.url)
      .header(reqwest::header::COOKIE, request.cookie)
      .query(request.query);

    if let Some(timeout) = request.timeout {
      builder = builder.timeout(timeout);
    }

    let response = builder.send().await?;

    let status = response.status().as_u16();

    info!(status, url = %response.url(), "GET");

    Ok(Response {
      body: response.text().await?,
      status,
    })
  }
}
