use super::*;

#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
  pub(crate) created_at: String,
  #[serde(default, deserialize_with = "deserialize_optional_string")]
  pub(crate) id: Option<String>,
  #[serde(default, deserialize_with = "deserialize_optional_string")]
  pub(crate) rootid: Option<String>,
  pub(crate) text: String,
  #[serde(default)]
  pub(crate) total_number: u64,
  pub(crate) user: RawUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
  pub(crate) gender: String,
  pub(crate) screen_name: String,
}

impl RawComment {
  pub(crate) fn into_entry(self, level: Level) -> Result<Entry> {
    let gender = self.user.gender.parse::<Gender>()?;

    let time = normalize_timestamp(&self.created_at)?;

    let thread = match level {
      Level::Reply => None,
      Level::Root => self.rootid.or(self.id),
    };

    Ok(Entry {
      comment: Comment {
        author: self.user.screen_name,
        gender,
        level,
        text: strip_tags(&self.text),
        time,
      },
      replies: self.total_number,
      thread,
    })
  }
}
