mod config;
mod notifier;
mod notifier_command;
mod notifier_empty;

pub use config::NotifierConfig;
pub use notifier::Notifier;
pub use notifier_command::CommandNotifier;
pub use notifier_empty::EmptyNotifier;
