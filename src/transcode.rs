//! Best-effort WAV → MP3 transcoding via ffmpeg.
//!
//! MP3 output is an optional enhancement over the mandatory WAV, so this
//! module never fails the run: a missing or failing encoder is reported as
//! an outcome value and the caller keeps the WAV.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::exec::find_in_path;

/// Result of a transcode attempt. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// The MP3 was written at the destination path.
    Converted,
    /// No encoder binary is installed.
    Unavailable,
    /// The encoder ran but failed; the diagnostic is informational only.
    Failed(String),
}

impl TranscodeOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, TranscodeOutcome::Converted)
    }
}

/// WAV → MP3 transcoder backed by the ffmpeg executable.
///
/// The binary is resolved once at construction; an absent binary is a
/// degraded state, not an error.
pub struct Transcoder {
    ffmpeg: Option<PathBuf>,
}

impl Transcoder {
    /// Resolve ffmpeg from PATH. Always succeeds; availability is checked
    /// per call.
    pub fn discover() -> Self {
        let ffmpeg = find_in_path("ffmpeg");
        match &ffmpeg {
            Some(bin) => log::debug!("detected ffmpeg at {}", bin.display()),
            None => log::debug!("ffmpeg not found on PATH; MP3 output disabled"),
        }
        Self { ffmpeg }
    }

    #[cfg(test)]
    fn with_binary(ffmpeg: Option<PathBuf>) -> Self {
        Self { ffmpeg }
    }

    pub fn is_available(&self) -> bool {
        self.ffmpeg.is_some()
    }

    /// Encode `wav_path` as MP3 at `mp3_path`.
    pub fn wav_to_mp3(&self, wav_path: &Path, mp3_path: &Path) -> TranscodeOutcome {
        let Some(ffmpeg) = &self.ffmpeg else {
            return TranscodeOutcome::Unavailable;
        };

        let mut cmd = Command::new(ffmpeg);
        cmd.arg("-i")
            .arg(wav_path)
            .arg("-c:a")
            .arg("libmp3lame")
            .arg("-q:a")
            .arg("4")
            .arg("-y")
            .arg(mp3_path);

        log::debug!("running {cmd:?}");
        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => return TranscodeOutcome::Failed(format!("failed to run ffmpeg: {e}")),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return TranscodeOutcome::Failed(format!(
                "ffmpeg exited with code {:?}: {}",
                output.status.code(),
                stderr.trim()
            ));
        }

        TranscodeOutcome::Converted
    }
}

#[cfg(test)]
mod tests {
    use super::{Transcoder, TranscodeOutcome};
    use std::path::Path;

    fn write_tone_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for n in 0..2205 {
            let t = n as f32 / 22050.0;
            let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
            writer.write_sample((sample * i16::MAX as f32 * 0.5) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn missing_encoder_reports_unavailable() {
        let transcoder = Transcoder::with_binary(None);
        assert!(!transcoder.is_available());
        let outcome = transcoder.wav_to_mp3(Path::new("in.wav"), Path::new("out.mp3"));
        assert_eq!(outcome, TranscodeOutcome::Unavailable);
    }

    #[test]
    fn unreadable_source_reports_failed() {
        let transcoder = Transcoder::discover();
        if !transcoder.is_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let outcome = transcoder.wav_to_mp3(
            &dir.path().join("missing.wav"),
            &dir.path().join("out.mp3"),
        );
        assert!(matches!(outcome, TranscodeOutcome::Failed(_)));
    }

    #[test]
    fn converts_wav_when_ffmpeg_is_installed() {
        let transcoder = Transcoder::discover();
        if !transcoder.is_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("tone.wav");
        let mp3 = dir.path().join("tone.mp3");
        write_tone_wav(&wav);

        let outcome = transcoder.wav_to_mp3(&wav, &mp3);
        assert!(outcome.is_converted(), "unexpected outcome: {outcome:?}");
        assert!(mp3.exists());
        // The source WAV is left alone; cleanup is the caller's decision.
        assert!(wav.exists());
    }
}
