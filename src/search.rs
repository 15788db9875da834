use crate::{
  storage::{TagPredicate, TagScope},
  tag::split,
};

/// Narrows `scope` by a free-text query. `name:prefix` matches the name
/// exactly and the value by prefix (either half may be left empty to skip
/// it); a bare word matches anywhere in the name or the value.
pub fn apply_filter(scope: TagScope, query: Option<&str>) -> TagScope {
  let query = match query {
    Some(query) if !query.trim().is_empty() => query,
    _ => return scope,
  };

  let (name, value) = split(query);

  if query.contains(':') {
    let mut scope = scope;
    if !name.trim().is_empty() {
      scope = scope.filter(TagPredicate::NameEquals(name));
    }
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
      scope = scope.filter(TagPredicate::ValueStartsWith(value));
    }
    return scope;
  }

  scope.filter(TagPredicate::NameOrValueContains(name))
}
