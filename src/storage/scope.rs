use crate::{entity::EntityKind, record::TagRecord};

/// Projection of the requested fields of one record, in request order.
pub type TagTuple = Vec<Option<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
  EntityType,
  Name,
  Value,
}

impl TagField {
  pub fn extract(&self, record: &TagRecord) -> Option<String> {
    match self {
      TagField::EntityType => Some(record.entity().kind().discriminator().to_owned()),
      TagField::Name => Some(record.name().to_owned()),
      TagField::Value => record.value().map(|v| v.to_owned()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPredicate {
  NameEquals(String),
  ValueEquals(String),
  /// Records without a value never match.
  ValueStartsWith(String),
  NameOrValueContains(String),
}

impl TagPredicate {
  pub fn matches(&self, record: &TagRecord) -> bool {
    match self {
      TagPredicate::NameEquals(name) => record.name() == name,
      TagPredicate::ValueEquals(value) => record.value() == Some(value.as_str()),
      TagPredicate::ValueStartsWith(prefix) => record
        .value()
        .map_or(false, |v| v.starts_with(prefix.as_str())),
      TagPredicate::NameOrValueContains(needle) => {
        record.name().contains(needle.as_str())
          || record
            .value()
            .map_or(false, |v| v.contains(needle.as_str()))
      }
    }
  }
}

/// A conjunction of predicates over the tags of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagScope {
  kind: EntityKind,
  predicates: Vec<TagPredicate>,
}

impl TagScope {
  pub fn new(kind: EntityKind) -> Self {
    Self {
      kind,
      predicates: Vec::new(),
    }
  }

  pub fn filter(mut self, predicate: TagPredicate) -> Self {
    self.predicates.push(predicate);
    self
  }

  pub fn kind(&self) -> EntityKind {
    self.kind
  }

  pub fn predicates(&self) -> &[TagPredicate] {
    &self.predicates
  }

  pub fn matches(&self, record: &TagRecord) -> bool {
    record.entity().kind() == self.kind && self.predicates.iter().all(|p| p.matches(record))
  }
}
