use crate::entity::EntityRef;

use super::notifier::Notifier;

pub struct EmptyNotifier {}

impl EmptyNotifier {
  pub fn new() -> Self {
    return Self {};
  }
}

impl Notifier for EmptyNotifier {
  fn notify(&mut self, entity: &EntityRef) -> std::io::Result<String> {
    return std::io::Result::Ok(format!("cmd: 'notify', entity: {entity}"));
  }
}

#[cfg(test)]
mod tests {
  use super::EmptyNotifier;
  use crate::{
    entity::{EntityKind, EntityRef},
    notify::Notifier,
  };

  #[test]
  fn empty_notifier_always_succeeds() {
    let mut notifier = EmptyNotifier::new();
    let message = notifier
      .notify(&EntityRef::new(EntityKind::User, 5))
      .unwrap();
    assert_eq!(message, "cmd: 'notify', entity: User#5");
  }
}
