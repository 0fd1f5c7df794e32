use std::io::Write;
use std::process::{Child, Command, Stdio};

use super::{HostError, SpeechSynth};

/// Speech through the platform's command-line synthesizer.
///
/// Text goes to the child's stdin so long documents never hit argument
/// length limits. Only one child is alive at a time.
#[derive(Debug, Default)]
pub struct CommandSpeech {
    child: Option<Child>,
}

impl CommandSpeech {
    pub const fn new() -> Self {
        Self { child: None }
    }

    fn spawn(text: &str) -> Result<Child, HostError> {
        let mut last_err = None;
        for mut command in candidate_commands() {
            command
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            match command.spawn() {
                Ok(mut child) => {
                    if let Some(mut stdin) = child.stdin.take() {
                        let text = text.to_string();
                        std::thread::spawn(move || {
                            let _ = stdin.write_all(text.as_bytes());
                        });
                    }
                    return Ok(child);
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(HostError::Speech(last_err.map_or_else(
            || "no speech command for this platform".to_string(),
            |err| err.to_string(),
        )))
    }
}

fn candidate_commands() -> Vec<Command> {
    #[cfg(target_os = "macos")]
    {
        let mut say = Command::new("say");
        say.args(["-f", "-"]);
        vec![say]
    }
    #[cfg(target_os = "windows")]
    {
        let mut ps = Command::new("powershell");
        ps.args([
            "-NoProfile",
            "-Command",
            "Add-Type -AssemblyName System.Speech; \
             (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak([Console]::In.ReadToEnd())",
        ]);
        vec![ps]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut espeak_ng = Command::new("espeak-ng");
        espeak_ng.arg("--stdin");
        let mut espeak = Command::new("espeak");
        espeak.arg("--stdin");
        vec![espeak_ng, espeak]
    }
}

impl SpeechSynth for CommandSpeech {
    fn speak(&mut self, text: &str) -> Result<(), HostError> {
        self.cancel();
        let child = Self::spawn(text)?;
        tracing::info!(chars = text.chars().count(), "speech started");
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::info!("speech cancelled");
        }
    }

    fn is_speaking(&mut self) -> bool {
        let finished = match self.child.as_mut() {
            None => return false,
            Some(child) => !matches!(child.try_wait(), Ok(None)),
        };
        if finished {
            self.child = None;
            tracing::debug!("speech finished");
        }
        !finished
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_speech_reports_not_speaking() {
        let mut speech = CommandSpeech::new();
        assert!(!speech.is_speaking());
        speech.cancel();
        assert!(!speech.is_speaking());
    }

    #[test]
    fn test_candidates_exist_for_platform() {
        assert!(!candidate_commands().is_empty());
    }
}
