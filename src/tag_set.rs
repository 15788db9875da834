use std::collections::{BTreeSet, HashSet};

use log::debug;

use crate::{
  entity::EntityRef,
  error::TagError,
  record::TagRecord,
  storage::TagStore,
  tag::{normalize_tag_string, Tag},
};

/// The tags of one entity, exposed as a space separated string of
/// `name` / `name:value` tokens.
pub struct TagSet<'a> {
  store: &'a dyn TagStore,
  entity: EntityRef,
}

impl<'a> TagSet<'a> {
  pub fn new(store: &'a dyn TagStore, entity: EntityRef) -> Self {
    Self { store, entity }
  }

  pub fn entity(&self) -> EntityRef {
    self.entity
  }

  pub fn tags(&self) -> Result<Vec<TagRecord>, TagError> {
    Ok(self.store.find_by_entity(self.entity)?)
  }

  /// Replaces every tag of the entity with the ones in `tag_string`. Nothing
  /// is written if any token has an empty name. Tokens with the same
  /// canonical form (`c` and `c:`) are stored once.
  pub fn set_tag_string(&self, tag_string: &str) -> Result<(), TagError> {
    let parsed = normalize_tag_string(tag_string)
      .into_iter()
      .map(|token| TagRecord::from_string(self.entity, token))
      .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let records: Vec<TagRecord> = parsed.into_iter().filter(|r| seen.insert(r.tag())).collect();

    debug!("setting {} tags on {}", records.len(), self.entity);
    self.store.replace_all(self.entity, records)?;
    Ok(())
  }

  pub fn tag_string(&self) -> Result<String, TagError> {
    let tokens: Vec<String> = self.tags()?.iter().map(|t| t.name_and_value()).collect();
    Ok(tokens.join(" "))
  }

  /// Name/value pairs; a name can repeat with different values.
  pub fn tag_array(&self) -> Result<Vec<Tag>, TagError> {
    Ok(self.tags()?.iter().map(|t| t.tag()).collect())
  }

  /// Every string someone might search for: each name on its own and, for
  /// machine tags, the full `name:value`.
  pub fn searchable_tokens(&self) -> Result<Vec<String>, TagError> {
    let mut tokens = BTreeSet::new();
    for tag in self.tags()? {
      tokens.insert(tag.name().to_owned());
      tokens.insert(tag.name_and_value());
    }
    Ok(tokens.into_iter().collect())
  }

  pub fn has_tag(&self, name: &str) -> Result<bool, TagError> {
    Ok(self.tags()?.iter().any(|t| t.name() == name))
  }

  pub fn tag_values(&self, name: &str) -> Result<Vec<String>, TagError> {
    let matching: Vec<TagRecord> = self
      .tags()?
      .into_iter()
      .filter(|t| t.name() == name)
      .collect();

    if matching.is_empty() {
      return Err(TagError::TagNotFound(name.to_owned()));
    }

    Ok(
      matching
        .iter()
        .filter_map(|t| t.value().map(|v| v.to_owned()))
        .collect(),
    )
  }

  pub fn add_tag_if_absent(&self, tag: &str) -> Result<String, TagError> {
    if self.has_tag(Tag::parse(tag).name())? {
      return self.tag_string();
    }

    let current = self.tag_string()?;
    self.set_tag_string(&format!("{} {}", current, tag))?;
    self.tag_string()
  }

  /// Drops the tokens equal to `tag`. A bare name also drops every machine
  /// tag with that name.
  pub fn remove_tag(&self, tag: &str) -> Result<String, TagError> {
    let target = Tag::parse(tag);
    let tags = self.tags()?;

    let removes = |record: &TagRecord| {
      record.tag() == target || (!target.is_machine_tag() && record.name() == target.name())
    };
    if !tags.iter().any(|t| removes(t)) {
      return self.tag_string();
    }

    let remaining: Vec<String> = tags
      .iter()
      .filter(|t| !removes(*t))
      .map(|t| t.name_and_value())
      .collect();
    self.set_tag_string(&remaining.join(" "))?;
    self.tag_string()
  }
}

#[cfg(test)]
mod tests {
  use std::{collections::BTreeSet, sync::Arc};

  use super::TagSet;
  use crate::{
    entity::{EntityKind, EntityRef},
    error::TagError,
    storage::{MemoryStorage, TagStore},
    tag::{split, Tag},
  };

  fn body(id: u64) -> EntityRef {
    EntityRef::new(EntityKind::PublicBody, id)
  }

  fn pairs(tag_string: &str) -> BTreeSet<(String, Option<String>)> {
    tag_string.split(' ').filter(|t| !t.is_empty()).map(split).collect()
  }

  #[test]
  fn set_then_read_back() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("a:b c").unwrap();

    assert_eq!(
      pairs(&tags.tag_string().unwrap()),
      pairs("c a:b"),
    );
    assert_eq!(
      tags.tag_array().unwrap(),
      vec![Tag::new("a", Some("b")), Tag::new("c", None)]
    );
  }

  #[test]
  fn set_dedups_and_trims() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("  x  y x\n").unwrap();
    assert_eq!(tags.tag_string().unwrap(), "x y");

    tags.set_tag_string("").unwrap();
    assert_eq!(tags.tag_string().unwrap(), "");
  }

  #[test]
  fn set_is_idempotent() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("url:http://x.org:80 a:1 a:2 b").unwrap();
    let before = tags.tag_array().unwrap();

    tags.set_tag_string(&tags.tag_string().unwrap()).unwrap();
    assert_eq!(tags.tag_array().unwrap(), before);
  }

  #[test]
  fn set_keeps_one_tag_per_canonical_form() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("a:b a:b: c c: a:b::").unwrap();
    assert_eq!(tags.tag_string().unwrap(), "a:b c");

    let before = tags.tag_array().unwrap();
    tags.set_tag_string(&tags.tag_string().unwrap()).unwrap();
    assert_eq!(tags.tag_array().unwrap(), before);
  }

  #[test]
  fn invalid_tag_leaves_previous_set() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("keep me").unwrap();

    assert!(matches!(
      tags.set_tag_string("fine :broken"),
      Err(TagError::Validation(tag)) if tag == ":broken"
    ));
    assert_eq!(tags.tag_string().unwrap(), "keep me");
  }

  #[test]
  fn tags_are_per_entity() {
    let storage = MemoryStorage::new();
    TagSet::new(&storage, body(1)).set_tag_string("a").unwrap();
    TagSet::new(&storage, body(2)).set_tag_string("b").unwrap();
    let request = EntityRef::new(EntityKind::InfoRequest, 1);
    TagSet::new(&storage, request).set_tag_string("c").unwrap();

    TagSet::new(&storage, body(1)).set_tag_string("d").unwrap();
    assert_eq!(TagSet::new(&storage, body(2)).tag_string().unwrap(), "b");
    assert_eq!(TagSet::new(&storage, request).tag_string().unwrap(), "c");
  }

  #[test]
  fn searchable_tokens_include_names_and_pairs() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("openlylocal_id:12345 charity openlylocal_id:9").unwrap();

    assert_eq!(
      tags.searchable_tokens().unwrap(),
      vec![
        "charity",
        "openlylocal_id",
        "openlylocal_id:12345",
        "openlylocal_id:9"
      ]
    );
  }

  #[test]
  fn tag_values_supports_multiple_values() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("a:1 a:2 b").unwrap();

    assert_eq!(tags.tag_values("a").unwrap(), vec!["1", "2"]);
    assert!(tags.tag_values("b").unwrap().is_empty());
    assert!(matches!(
      tags.tag_values("zzz"),
      Err(TagError::TagNotFound(name)) if name == "zzz"
    ));
  }

  #[test]
  fn has_tag_ignores_value() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("a:1").unwrap();

    assert!(tags.has_tag("a").unwrap());
    assert!(!tags.has_tag("a:1").unwrap());
    tags.remove_tag("a:1").unwrap();
    assert!(!tags.has_tag("a").unwrap());
  }

  #[test]
  fn add_tag_if_absent() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("a:1").unwrap();

    assert_eq!(tags.add_tag_if_absent("a:2").unwrap(), "a:1");
    assert_eq!(tags.add_tag_if_absent("a").unwrap(), "a:1");
    assert_eq!(tags.add_tag_if_absent("b:3").unwrap(), "a:1 b:3");
  }

  #[test]
  fn add_tag_to_empty_set() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    assert_eq!(tags.add_tag_if_absent("first").unwrap(), "first");
  }

  #[test]
  fn remove_tag() {
    let storage = MemoryStorage::new();
    let tags = TagSet::new(&storage, body(1));
    tags.set_tag_string("ab a:1 a:2 b").unwrap();

    assert_eq!(tags.remove_tag("zzz").unwrap(), "ab a:1 a:2 b");
    assert_eq!(tags.remove_tag("a:2").unwrap(), "ab a:1 b");
    assert_eq!(tags.remove_tag("a").unwrap(), "ab b");
  }

  #[test]
  fn concurrent_sets_never_merge() {
    let storage: Arc<dyn TagStore> = Arc::new(MemoryStorage::new());
    TagSet::new(storage.as_ref(), body(1)).set_tag_string("start").unwrap();

    let inputs = ["x:1 y", "z w:2"];
    let writers: Vec<_> = inputs
      .iter()
      .map(|input| {
        let storage = Arc::clone(&storage);
        let input = input.to_string();
        std::thread::spawn(move || {
          for _ in 0..200 {
            TagSet::new(storage.as_ref(), body(1)).set_tag_string(&input).unwrap();
          }
        })
      })
      .collect();

    for _ in 0..200 {
      let seen = TagSet::new(storage.as_ref(), body(1)).tag_string().unwrap();
      assert!(
        seen == "start" || inputs.contains(&seen.as_str()),
        "observed partial set: {}",
        seen
      );
    }
    for writer in writers {
      writer.join().unwrap();
    }

    let last = TagSet::new(storage.as_ref(), body(1)).tag_string().unwrap();
    assert!(inputs.contains(&last.as_str()));
  }
}
