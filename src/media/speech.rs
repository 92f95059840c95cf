//! Speech output collaborator.
//!
//! Speaks a card's text through an external synthesizer. The call is
//! fire-and-forget: the child process is spawned and no completion is
//! consumed, matching the way speech synthesis behaves in the browser
//! original.

use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{render_template, MediaError};
use crate::config::Config;

/// Synthesizer command templates probed in order when no template is
/// configured.
const SYNTHESIZERS: &[&str] = &[
    "espeak-ng -v {locale} {text}",
    "espeak -v {locale} {text}",
    "say {text}",
    "spd-say -l {locale} {text}",
];

/// Text-to-speech frontend over an external synthesizer command.
pub struct Speaker {
    template: Option<String>,
    locale: String,
}

impl Speaker {
    /// Builds a speaker from the configured template and locale.
    pub fn from_config(config: &Config) -> Self {
        Self {
            template: config.speech_command.clone(),
            locale: config.locale.clone(),
        }
    }

    /// Speaks the given text, fire-and-forget.
    ///
    /// With a configured template, only that command is used. Otherwise
    /// the platform synthesizers are probed in order and the first one
    /// that spawns wins.
    pub fn speak(&self, text: &str) -> Result<(), MediaError> {
        let substitutions = [("{text}", text), ("{locale}", self.locale.as_str())];

        if let Some(template) = &self.template {
            let argv = render_template(template, &substitutions);
            return spawn_detached(&argv)
                .map_err(|e| MediaError::NoSynthesizer(format!("{template}: {e}")));
        }

        for candidate in SYNTHESIZERS {
            let argv = render_template(candidate, &substitutions);
            if spawn_detached(&argv).is_ok() {
                debug!("speaking via '{}'", argv[0]);
                return Ok(());
            }
        }

        let tried: Vec<&str> = SYNTHESIZERS
            .iter()
            .filter_map(|t| t.split_whitespace().next())
            .collect();
        Err(MediaError::NoSynthesizer(tried.join(", ")))
    }
}

/// Spawns the command without waiting for it.
///
/// The child is intentionally not reaped; the process outlives this
/// short-lived CLI invocation and finishes speaking on its own.
fn spawn_detached(argv: &[String]) -> io::Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty speech command"))?;

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
