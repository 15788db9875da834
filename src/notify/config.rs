#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum NotifierConfig {
  #[default]
  Empty,
  /// Runs `program args... <entity type> <entity id>` after every change.
  Command {
    program: String,
    #[serde(default)]
    args: Vec<String>,
  },
}
