//! Table operations shared by the storage backends. Each one works on a
//! snapshot of the rows and returns the rows to keep or report, so backends
//! only have to deal with locking and persistence.

use std::{
  cmp::Ordering,
  collections::{BTreeSet, HashMap},
};

use crate::{
  entity::{Entity, EntityKind, EntityRef, NameOrdering},
  error::StorageError,
  record::TagRecord,
};

use super::scope::{TagField, TagPredicate, TagScope, TagTuple};

pub(super) fn check_owner(entity: EntityRef, records: &[TagRecord]) -> Result<(), StorageError> {
  match records.iter().find(|r| r.entity() != entity) {
    Some(foreign) => Err(StorageError::OwnerMismatch {
      expected: entity,
      found: foreign.entity(),
    }),
    None => Ok(()),
  }
}

pub(super) fn replaced(
  current: &[TagRecord],
  entity: EntityRef,
  records: Vec<TagRecord>,
) -> Vec<TagRecord> {
  let mut next: Vec<TagRecord> = current
    .iter()
    .filter(|r| r.entity() != entity)
    .cloned()
    .collect();
  next.extend(records);
  next
}

pub(super) fn without_entity(current: &[TagRecord], entity: EntityRef) -> (Vec<TagRecord>, usize) {
  let next = replaced(current, entity, Vec::new());
  let removed = current.len() - next.len();
  (next, removed)
}

pub(super) fn by_entity(records: &[TagRecord], entity: EntityRef) -> Vec<TagRecord> {
  records
    .iter()
    .filter(|r| r.entity() == entity)
    .cloned()
    .collect()
}

pub(super) fn select(records: &[TagRecord], scope: &TagScope) -> Vec<TagRecord> {
  records
    .iter()
    .filter(|r| scope.matches(r))
    .cloned()
    .collect()
}

pub(super) fn distinct(records: &[TagRecord], scope: &TagScope, fields: &[TagField]) -> Vec<TagTuple> {
  let tuples: BTreeSet<TagTuple> = records
    .iter()
    .filter(|r| scope.matches(r))
    .map(|r| fields.iter().map(|field| field.extract(r)).collect())
    .collect();
  tuples.into_iter().collect()
}

/// Records of `kind` named `name`, joined with their entity rows and sorted
/// by the entity display name. Records whose entity row is missing are
/// skipped.
pub(super) fn by_name(
  records: &[TagRecord],
  entities: &[Entity],
  kind: EntityKind,
  name: &str,
  ordering: &NameOrdering,
) -> Vec<TagRecord> {
  let entities: HashMap<EntityRef, &Entity> = entities
    .iter()
    .filter(|e| e.entity_ref().kind() == kind)
    .map(|e| (e.entity_ref(), e))
    .collect();

  let scope = TagScope::new(kind).filter(TagPredicate::NameEquals(name.to_owned()));
  let mut joined: Vec<(&Entity, TagRecord)> = records
    .iter()
    .filter(|r| scope.matches(r))
    .filter_map(|r| entities.get(&r.entity()).map(|e| (*e, r.clone())))
    .collect();

  joined.sort_by(|(a, _), (b, _)| compare_entities(a, b, ordering));
  joined.into_iter().map(|(_, record)| record).collect()
}

pub(super) fn compare_entities(a: &Entity, b: &Entity, ordering: &NameOrdering) -> Ordering {
  a.display_name(ordering)
    .cmp(b.display_name(ordering))
    .then_with(|| a.entity_ref().cmp(&b.entity_ref()))
}

pub(super) fn upserted(current: &[Entity], entity: Entity) -> Vec<Entity> {
  let mut next = current.to_vec();
  match next.iter().position(|e| e.entity_ref() == entity.entity_ref()) {
    Some(position) => next[position] = entity,
    None => next.push(entity),
  }
  next
}

pub(super) fn entities_of(entities: &[Entity], kind: EntityKind) -> Vec<Entity> {
  entities
    .iter()
    .filter(|e| e.entity_ref().kind() == kind)
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::{by_name, check_owner, distinct, replaced, upserted};
  use crate::{
    entity::{Entity, EntityKind, EntityRef, NameOrdering},
    error::StorageError,
    record::TagRecord,
    storage::{TagField, TagScope},
  };

  fn body(id: u64) -> EntityRef {
    EntityRef::new(EntityKind::PublicBody, id)
  }

  fn records(entity: EntityRef, tags: &[&str]) -> Vec<TagRecord> {
    tags
      .iter()
      .map(|t| TagRecord::from_string(entity, t).unwrap())
      .collect()
  }

  #[test]
  fn replaced_only_touches_owner() {
    let mut current = records(body(1), &["a", "b"]);
    current.extend(records(body(2), &["c"]));

    let next = replaced(&current, body(1), records(body(1), &["d"]));
    let names: Vec<&str> = next.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["c", "d"]);
  }

  #[test]
  fn foreign_records_are_rejected() {
    let result = check_owner(body(1), &records(body(2), &["a"]));
    assert!(matches!(result, Err(StorageError::OwnerMismatch { .. })));
  }

  #[test]
  fn distinct_sorts_with_missing_values_first() {
    let mut current = records(body(1), &["b:2", "a", "b:1"]);
    current.extend(records(body(2), &["a", "b:1"]));

    let tuples = distinct(
      &current,
      &TagScope::new(EntityKind::PublicBody),
      &[TagField::Name, TagField::Value],
    );
    assert_eq!(
      tuples,
      vec![
        vec![Some("a".to_owned()), None],
        vec![Some("b".to_owned()), Some("1".to_owned())],
        vec![Some("b".to_owned()), Some("2".to_owned())],
      ]
    );
  }

  #[test]
  fn by_name_orders_by_display_name_and_skips_orphans() {
    let entities = vec![
      Entity::new(body(1), "Zebra Council").with_translation("cy", "Aberystwyth Council"),
      Entity::new(body(2), "Bryn Trust"),
    ];
    let mut current = records(body(1), &["charity"]);
    current.extend(records(body(2), &["charity"]));
    current.extend(records(body(3), &["charity"]));

    let plain = by_name(&current, &entities, EntityKind::PublicBody, "charity", &NameOrdering::Name);
    let owners: Vec<u64> = plain.iter().map(|r| r.entity().id()).collect();
    assert_eq!(owners, vec![2, 1]);

    let welsh = by_name(
      &current,
      &entities,
      EntityKind::PublicBody,
      "charity",
      &NameOrdering::Translated("cy".to_owned()),
    );
    let owners: Vec<u64> = welsh.iter().map(|r| r.entity().id()).collect();
    assert_eq!(owners, vec![1, 2]);
  }

  #[test]
  fn upsert_replaces_existing_entity() {
    let current = vec![Entity::new(body(1), "Old")];
    let next = upserted(&current, Entity::new(body(1), "New"));
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].name(), "New");
  }
}
