use super::*;

const SOURCE_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const SHEET_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn deserialize_optional_string<'de, D>(
  deserializer: D,
) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;

  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(Value::Bool(b)) => Err(de::Error::invalid_type(
      Unexpected::Bool(b),
      &"string or number",
    )),
    Some(Value::Array(_)) => Err(de::Error::invalid_type(
      Unexpected::Seq,
      &"string or number",
    )),
    Some(Value::Object(_)) => Err(de::Error::invalid_type(
      Unexpected::Map,
      &"string or number",
    )),
  }
}

/// Finds the numeric post id embedded in a status detail page.
pub(crate) fn extract_post_id(body: &str) -> Option<String> {
  let pattern = Regex::new(r#""id":\s"(\d+)""#).ok()?;

  pattern
    .captures(body)
    .and_then(|captures| captures.get(1))
    .map(|id| id.as_str().to_string())
}

/// Renders `Sun Aug 15 01:27:28 +0800 2021` as `2021-08-15 01:27:28`,
/// keeping the wall-clock time of the source offset.
pub(crate) fn normalize_timestamp(timestamp: &str) -> Result<String> {
  let parsed = DateTime::parse_from_str(timestamp.trim(), SOURCE_TIME_FORMAT)
    .with_context(|| format!("invalid timestamp `{timestamp}`"))?;

  Ok(parsed.naive_local().format(SHEET_TIME_FORMAT).to_string())
}

/// Removes every `<...>` span on a single line. A `<` with no closing `>`
/// before the next line break is kept as text.
pub(crate) fn strip_tags(text: &str) -> String {
  let mut stripped = String::with_capacity(text.len());
  let mut rest = text;

  while let Some(open) = rest.find('<') {
    stripped.push_str(&rest[..open]);

    let tail = &rest[open..];

    match tail.find(['>', '\n']) {
      Some(close) if tail.as_bytes()[close] == b'>' => {
        rest = &tail[close + 1..];
      }
      _ => {
        stripped.push('<');
        rest = &tail[1..];
      }
    }
  }

  stripped.push_str(rest);

  stripped
}
