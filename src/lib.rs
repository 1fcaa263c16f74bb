//! # readaloud
//!
//! Convert a PDF or plain-text document into a spoken-word audio file.
//!
//! The pipeline is a thin orchestration layer over three external
//! capabilities:
//!
//! - **PDF text extraction** via `lopdf` (behind the default-on `pdf`
//!   feature)
//! - **Speech synthesis** via the system `espeak-ng` executable
//! - **WAV → MP3 transcoding** via `ffmpeg`, best-effort only
//!
//! The mandatory output is always a WAV file; MP3 is an optional
//! enhancement on top of it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use readaloud::document::resolve_input;
//! use readaloud::engines::espeak::{EspeakEngine, SynthesisOptions};
//!
//! let input = resolve_input(Path::new("lecture.pdf"))?;
//! let text = input.read_text()?;
//!
//! let engine = EspeakEngine::discover()?;
//! engine.synthesize_to_file(&text, Path::new("lecture.wav"), &SynthesisOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
pub mod engines;
pub mod exec;
pub mod transcode;

use std::path::{Path, PathBuf};

/// Derive the intermediate WAV path from the requested output path.
///
/// Synthesis always writes WAV first. A request that already ends in `.wav`
/// (case-insensitive) is used verbatim; anything else has its extension
/// replaced by `.wav`. This means a request for e.g. `talk.ogg` yields a
/// file named `talk.wav` — the non-mp3 extension only survives when it is
/// already `.wav`.
pub fn intermediate_wav_path(output: &Path) -> PathBuf {
    if has_extension(output, "wav") {
        output.to_path_buf()
    } else {
        output.with_extension("wav")
    }
}

/// Whether the requested output path asks for MP3 transcoding.
pub fn requests_mp3(output: &Path) -> bool {
    has_extension(output, "mp3")
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(wanted))
}
