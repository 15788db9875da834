use log::{debug, warn};

use crate::entity::EntityRef;

use super::notifier::Notifier;

pub struct CommandNotifier {
  program: String,
  args: Vec<String>,
}

impl CommandNotifier {
  pub fn new(program: String, args: Vec<String>) -> Self {
    Self { program, args }
  }

  fn command_args(&self, entity: &EntityRef) -> Vec<String> {
    let mut args = self.args.clone();
    args.push(entity.kind().discriminator().to_owned());
    args.push(entity.id().to_string());
    return args;
  }
}

impl Notifier for CommandNotifier {
  fn notify(&mut self, entity: &EntityRef) -> std::io::Result<String> {
    let child = std::process::Command::new(&self.program)
      .args(self.command_args(entity))
      .stdout(std::process::Stdio::piped())
      .stderr(std::process::Stdio::piped())
      .spawn()?;

    std::thread::spawn(move || {
      process_child(child);
    });

    return Ok(format!("cmd: '{}', entity: {}", self.program, entity));
  }
}

fn process_child(child: std::process::Child) {
  let output = match child.wait_with_output() {
    Ok(output) => output,
    Err(err) => {
      warn!("notifier wait err: {}", err);
      return;
    }
  };

  if !output.status.success() {
    warn!(
      "notifier with err: {} status: {}",
      String::from_utf8(output.stderr).unwrap_or_default(),
      output.status
    );
    return;
  }

  debug!(
    "notifier with output: {:?} status: {}",
    String::from_utf8(output.stdout).unwrap_or_default(),
    output.status
  );
}
