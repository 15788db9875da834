use std::{collections::HashSet, fmt::Display};

use crate::error::TagError;

/// One tag: a bare name, or a machine tag carrying a value (`name:value`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Tag {
  name: String,
  value: Option<String>,
}

impl Tag {
  pub fn new(name: &str, value: Option<&str>) -> Self {
    Self {
      name: name.to_owned(),
      value: value.map(|v| v.to_owned()),
    }
  }

  pub fn parse(tag: &str) -> Self {
    let (name, value) = split(tag);
    Self { name, value }
  }

  pub fn name(&self) -> &str {
    self.name.as_str()
  }

  pub fn value(&self) -> Option<&str> {
    self.value.as_deref()
  }

  pub fn is_machine_tag(&self) -> bool {
    self.value.is_some()
  }

  /// Canonical form: `name`, or `name:value` when there is a value.
  pub fn name_and_value(&self) -> String {
    join(&self.name, self.value())
  }

  pub fn validate(&self) -> Result<(), TagError> {
    if self.name.is_empty() {
      return Err(TagError::Validation(self.name_and_value()));
    }
    Ok(())
  }
}

impl Display for Tag {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name_and_value())
  }
}

/// Splits a single tag on its first colon. Everything after it is the value,
/// so `a:b:c` is `("a", Some("b:c"))`. Empty trailing segments are dropped:
/// `a:` has no value and `a:b::` has value `b`.
pub fn split(tag: &str) -> (String, Option<String>) {
  match tag.split_once(':') {
    None => (tag.to_owned(), None),
    Some((name, rest)) => {
      let value = rest.trim_end_matches(':');
      if value.is_empty() {
        return (name.to_owned(), None);
      }
      (name.to_owned(), Some(value.to_owned()))
    }
  }
}

pub fn join(name: &str, value: Option<&str>) -> String {
  match value {
    Some(value) => format!("{}:{}", name, value),
    None => name.to_owned(),
  }
}

/// Breaks a tag string into its tokens: trimmed, split on runs of ASCII
/// whitespace (vertical tab included), repeated tokens dropped (first
/// occurrence wins).
pub fn normalize_tag_string(tag_string: &str) -> Vec<&str> {
  let mut seen = HashSet::new();
  tag_string
    .split(|c: char| c.is_ascii_whitespace() || c == '\x0b')
    .filter(|token| !token.is_empty() && seen.insert(*token))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::{join, normalize_tag_string, split, Tag};
  use crate::error::TagError;

  #[test]
  fn split_name_only() {
    assert_eq!(split("foi"), ("foi".to_owned(), None));
  }

  #[test]
  fn split_machine_tag_keeps_extra_colons_in_value() {
    assert_eq!(
      split("url:http://www.flourish.org"),
      ("url".to_owned(), Some("http://www.flourish.org".to_owned()))
    );
    assert_eq!(split("a:b:c"), ("a".to_owned(), Some("b:c".to_owned())));
    assert_eq!(split("a::b"), ("a".to_owned(), Some(":b".to_owned())));
  }

  #[test]
  fn split_drops_trailing_empty_segments() {
    assert_eq!(split("a:"), ("a".to_owned(), None));
    assert_eq!(split("a:b::"), ("a".to_owned(), Some("b".to_owned())));
    assert_eq!(split(":"), ("".to_owned(), None));
  }

  #[test]
  fn split_leading_colon_gives_empty_name() {
    assert_eq!(split(":foo"), ("".to_owned(), Some("foo".to_owned())));
  }

  #[test]
  fn join_inverts_split() {
    for tag in ["charity", "openlylocal_id:12345", "url:http://x.org:8080/a"] {
      let (name, value) = split(tag);
      assert_eq!(join(&name, value.as_deref()), tag);
    }
    assert_eq!(
      split(&join("schema", Some("a:b"))),
      ("schema".to_owned(), Some("a:b".to_owned()))
    );
  }

  #[test]
  fn tag_display_is_canonical_form() {
    assert_eq!(Tag::parse("lang:en").to_string(), "lang:en");
    assert_eq!(Tag::new("charity", None).to_string(), "charity");
    assert!(Tag::parse("lang:en").is_machine_tag());
  }

  #[test]
  fn validate_rejects_empty_name() {
    assert!(Tag::parse("ok").validate().is_ok());
    match Tag::parse(":foo").validate() {
      Err(TagError::Validation(tag)) => assert_eq!(tag, ":foo"),
      other => panic!("unexpected: {:?}", other),
    }
  }

  #[test]
  fn normalize_trims_splits_and_dedups() {
    assert_eq!(
      normalize_tag_string("  b a:1\t\n b  c a:1 "),
      vec!["b", "a:1", "c"]
    );
    assert!(normalize_tag_string("   ").is_empty());
  }

  #[test]
  fn normalize_splits_on_vertical_tab() {
    assert_eq!(normalize_tag_string("a\x0bb\x0c c"), vec!["a", "b", "c"]);
  }
}
