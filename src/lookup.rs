use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{
  entity::{Entity, EntityRef, EntityType},
  error::TagError,
  record::TagRecord,
  search::apply_filter,
  storage::{TagPredicate, TagScope, TagStore},
  tag::Tag,
};

/// Entities of `entity_type` carrying a tag named `tag` (values are not
/// compared), each listed once, ordered by display name.
pub fn find_entities_by_tag(
  store: &dyn TagStore,
  entity_type: &EntityType,
  locale: &str,
  tag: &str,
) -> Result<Vec<Entity>, TagError> {
  let ordering = entity_type.name_ordering(locale);
  let records = store.find_by_name(entity_type.kind(), tag, &ordering)?;
  let mut entities: HashMap<EntityRef, Entity> = store
    .entities(entity_type.kind())?
    .into_iter()
    .map(|e| (e.entity_ref(), e))
    .collect();

  let mut found = Vec::new();
  for record in records {
    if let Some(entity) = entities.remove(&record.entity()) {
      found.push(entity);
    }
  }
  Ok(found)
}

/// Entities carrying `tag` (its name, and its value when it has one) that
/// also own at least one tag matching `query`. Ordered by entity id.
pub fn tagged_with(
  store: &dyn TagStore,
  entity_type: &EntityType,
  tag: &str,
  query: Option<&str>,
) -> Result<Vec<Entity>, TagError> {
  let tag = Tag::parse(tag);
  let mut scope = TagScope::new(entity_type.kind())
    .filter(TagPredicate::NameEquals(tag.name().to_owned()));
  if let Some(value) = tag.value() {
    scope = scope.filter(TagPredicate::ValueEquals(value.to_owned()));
  }

  let tagged: BTreeSet<EntityRef> = owners(store.select(&scope)?);
  let filtered: HashSet<EntityRef> = owners(
    store.select(&apply_filter(TagScope::new(entity_type.kind()), query))?,
  );

  let mut found = Vec::new();
  for entity in tagged.into_iter().filter(|e| filtered.contains(e)) {
    if let Some(entity) = store.entity(entity)? {
      found.push(entity);
    }
  }
  Ok(found)
}

/// The entity a record tags.
pub fn tagged_entity(store: &dyn TagStore, record: &TagRecord) -> Result<Entity, TagError> {
  store
    .entity(record.entity())?
    .ok_or(TagError::EntityNotFound(record.entity()))
}

fn owners<C: FromIterator<EntityRef>>(records: Vec<TagRecord>) -> C {
  records.iter().map(|r| r.entity()).collect()
}
