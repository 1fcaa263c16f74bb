//! espeak-ng text-to-speech engine.
//!
//! Drives the system `espeak-ng` executable to synthesize text into a WAV
//! file. The binary is resolved from PATH once, when the engine is
//! constructed.
//!
//! # System Requirements
//!
//! **espeak-ng** must be installed:
//! - **Linux**: `sudo apt-get install espeak-ng`
//! - **macOS**: `brew install espeak-ng`
//! - **Windows**: Download installer from <https://espeak-ng.org/download>
//!
//! # Voice Selection
//!
//! Voices are matched by display name: the first voice in the engine's
//! listing whose name contains the selector as a case-insensitive
//! substring wins. A selector that matches nothing is not an error; the
//! engine default voice is used instead.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use derive_builder::Builder;

use crate::exec::find_in_path;

/// Spoken in place of documents that produced no extractable text, so the
/// engine always receives non-empty input.
pub const PLACEHOLDER_TEXT: &str = "No readable content.";

/// Default speech rate in words per minute.
pub const DEFAULT_RATE: u32 = 175;

#[derive(thiserror::Error, Debug)]
pub enum SpeechError {
    #[error(
        "espeak-ng not found. Install: Linux: `sudo apt-get install espeak-ng`, \
         macOS: `brew install espeak-ng`, Windows: https://espeak-ng.org/download"
    )]
    EngineNotFound,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("espeak-ng exited with code {code:?}: {stderr}")]
    EngineFailed { code: Option<i32>, stderr: String },
}

/// One entry from the engine's voice inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Display name (e.g. `English_(Great_Britain)`).
    pub name: String,
    /// Identifier accepted by the engine's `-v` switch.
    pub id: String,
}

/// Parameters for one synthesis call.
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct SynthesisOptions {
    /// Speech rate in words per minute. Passed to the engine only when
    /// nonzero.
    pub rate: u32,
    /// Voice selector, matched as a case-insensitive substring of voice
    /// display names. First match wins; no match keeps the default voice.
    pub voice: Option<String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            voice: None,
        }
    }
}

/// Offline synthesis engine backed by the espeak-ng executable.
///
/// # Quick Start
///
/// ```no_run
/// use std::path::Path;
/// use readaloud::engines::espeak::{EspeakEngine, SynthesisOptions};
///
/// let engine = EspeakEngine::discover()?;
/// engine.synthesize_to_file("Hello, world!", Path::new("out.wav"), &SynthesisOptions::default())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EspeakEngine {
    bin: PathBuf,
}

impl EspeakEngine {
    /// Resolve the engine binary from PATH (`espeak-ng`, falling back to
    /// `espeak`).
    pub fn discover() -> Result<Self, SpeechError> {
        find_in_path("espeak-ng")
            .or_else(|| find_in_path("espeak"))
            .map(|bin| Self { bin })
            .ok_or(SpeechError::EngineNotFound)
    }

    /// List the engine's voices in its own listing order.
    pub fn list_voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let output = Command::new(&self.bin).arg("--voices").output()?;
        if !output.status.success() {
            return Err(engine_failed(&output));
        }
        Ok(parse_voice_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Synthesize `text` into a WAV file at `wav_path`, blocking until the
    /// engine finishes.
    ///
    /// Empty input is substituted with [`PLACEHOLDER_TEXT`]. Engine
    /// failures are fatal; there is no retry.
    pub fn synthesize_to_file(
        &self,
        text: &str,
        wav_path: &Path,
        options: &SynthesisOptions,
    ) -> Result<(), SpeechError> {
        let spoken = effective_text(text);
        let voice_id = match options.voice.as_deref() {
            Some(selector) => self.resolve_voice(selector)?,
            None => None,
        };

        let mut cmd = Command::new(&self.bin);
        cmd.arg("--stdin").arg("-w").arg(wav_path);
        if options.rate != 0 {
            cmd.arg("-s").arg(options.rate.to_string());
        }
        if let Some(id) = &voice_id {
            cmd.arg("-v").arg(id);
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        log::debug!("running {cmd:?}");
        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::EngineNotFound
            } else {
                SpeechError::Io(e)
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            // espeak-ng treats stdin as line-oriented input; without a final
            // line terminator the last token can be under-processed.
            let payload = newline_terminated(spoken);
            stdin.write_all(payload.as_bytes()).map_err(SpeechError::Io)?;
        }

        let output = child.wait_with_output().map_err(SpeechError::Io)?;
        if !output.status.success() {
            return Err(engine_failed(&output));
        }
        Ok(())
    }

    /// Find the first voice whose name contains `selector`
    /// (case-insensitive). No match is not an error.
    fn resolve_voice(&self, selector: &str) -> Result<Option<String>, SpeechError> {
        let voices = self.list_voices()?;
        match match_voice(&voices, selector) {
            Some(voice) => {
                log::debug!("voice selector {selector:?} matched {} ({})", voice.name, voice.id);
                Ok(Some(voice.id.clone()))
            }
            None => {
                log::warn!("no voice name contains {selector:?}; using the engine default voice");
                Ok(None)
            }
        }
    }
}

fn engine_failed(output: &std::process::Output) -> SpeechError {
    SpeechError::EngineFailed {
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

fn effective_text(text: &str) -> &str {
    if text.trim().is_empty() {
        PLACEHOLDER_TEXT
    } else {
        text
    }
}

fn newline_terminated(text: &str) -> Cow<'_, str> {
    if text.ends_with('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{text}\n"))
    }
}

/// Parse the tabular output of `espeak-ng --voices`.
///
/// The listing starts with a header row; each following row carries at
/// least `Pty Language Age/Gender VoiceName File`. The language code is
/// what `-v` accepts, the voice name is what selectors match against.
pub fn parse_voice_listing(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            Some(Voice {
                name: fields[3].to_string(),
                id: fields[1].to_string(),
            })
        })
        .collect()
}

/// First voice whose display name contains `selector`, case-insensitive.
pub fn match_voice<'a>(voices: &'a [Voice], selector: &str) -> Option<&'a Voice> {
    let needle = selector.to_lowercase();
    voices.iter().find(|v| v.name.to_lowercase().contains(&needle))
}
