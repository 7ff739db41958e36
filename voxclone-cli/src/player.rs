//! Playback through an external player program

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use anyhow::{bail, Context, Result};
use tokio::process::{Child, Command};

/// Start `command` with the audio path appended as its last argument.
pub fn spawn(command: &[String], audio: &Path) -> Result<Child> {
    let Some((program, args)) = command.split_first() else {
        bail!("No player command configured");
    };

    Command::new(program)
        .args(args)
        .arg(audio)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start player {program:?}"))
}

pub async fn wait(mut child: Child) -> Result<ExitStatus> {
    child.wait().await.context("Failed to wait for player")
}
