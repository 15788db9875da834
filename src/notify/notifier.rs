use crate::entity::EntityRef;

/// Told whenever the tags of an entity change, so search indexes can be
/// refreshed. Implementations must not block on the refresh itself.
pub trait Notifier: Send {
  fn notify(&mut self, entity: &EntityRef) -> std::io::Result<String>;
}
