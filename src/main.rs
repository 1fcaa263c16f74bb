//! Command-line driver: document in, spoken audio out.
//!
//! The pipeline is strictly linear: parse arguments, validate the input
//! path, extract text, synthesize a WAV, optionally transcode to MP3,
//! report the final artifact.
//!
//! Exit codes: 0 success, 1 missing/invalid arguments, 2 input file not
//! found. Synthesis and extraction failures exit with the generic failure
//! status.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use readaloud::document::{resolve_input, ExtractError, InputDocument};
use readaloud::engines::espeak::{
    EspeakEngine, SpeechError, SynthesisOptions, DEFAULT_RATE,
};
use readaloud::transcode::{TranscodeOutcome, Transcoder};
use readaloud::{intermediate_wav_path, requests_mp3};

#[derive(Parser, Debug)]
#[command(name = "readaloud")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert a PDF or plain-text document to spoken audio (WAV or MP3)")]
#[command(after_help = "Examples:\n  \
    readaloud lecture.pdf lecture.wav 175\n  \
    readaloud summary.txt summary.mp3 170 brazil")]
struct Cli {
    /// Input document: a .pdf file, or any text file
    #[arg(required_unless_present = "list_voices")]
    input: Option<PathBuf>,

    /// Output audio path ending in .wav or .mp3
    #[arg(required_unless_present = "list_voices")]
    output: Option<PathBuf>,

    /// Speech rate in words per minute (digits only; anything else falls
    /// back to the default of 175)
    rate: Option<String>,

    /// Voice selector, matched as a case-insensitive substring of the
    /// engine's voice names; first match wins
    voice: Option<String>,

    /// List the engine's voices (name and id) and exit
    #[arg(long)]
    list_voices: bool,
}

fn main() -> ExitCode {
    // Degradation warnings should be visible without RUST_LOG being set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    if cli.list_voices {
        return match print_voices() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    // Both are guaranteed present by required_unless_present.
    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        return ExitCode::from(1);
    };

    let document = match resolve_input(&input) {
        Ok(document) => document,
        Err(e @ ExtractError::InputNotFound(_)) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = SynthesisOptions {
        rate: parse_rate(cli.rate.as_deref()),
        voice: cli.voice,
    };

    match run(&document, &output, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Speech(#[from] SpeechError),
}

fn run(document: &InputDocument, output: &Path, options: &SynthesisOptions) -> Result<(), RunError> {
    let text = document.read_text()?;

    let wav_path = intermediate_wav_path(output);
    println!(
        "Synthesizing speech -> {} (rate={}, voice={})",
        wav_path.display(),
        options.rate,
        options.voice.as_deref().unwrap_or("default")
    );

    let engine = EspeakEngine::discover()?;
    engine.synthesize_to_file(&text, &wav_path, options)?;
    report_duration(&wav_path);

    let final_path = if requests_mp3(output) {
        println!("Converting WAV -> MP3...");
        match Transcoder::discover().wav_to_mp3(&wav_path, output) {
            TranscodeOutcome::Converted => {
                if wav_path.as_path() != output {
                    // The MP3 is already authoritative; a leftover WAV is
                    // tolerable.
                    let _ = std::fs::remove_file(&wav_path);
                }
                output.to_path_buf()
            }
            TranscodeOutcome::Unavailable => {
                println!("ffmpeg is not installed; keeping the WAV.");
                wav_path
            }
            TranscodeOutcome::Failed(reason) => {
                println!("MP3 conversion failed; keeping the WAV.");
                log::info!("{reason}");
                wav_path
            }
        }
    } else {
        wav_path
    };

    println!("Final output: {}", final_path.display());
    Ok(())
}

/// Accept the rate argument only when it is a literal digit string that
/// fits the rate type; anything else falls back to the default (with a
/// warning, so the fallback is at least visible).
fn parse_rate(arg: Option<&str>) -> u32 {
    let Some(arg) = arg else {
        return DEFAULT_RATE;
    };

    let all_digits = !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit());
    match all_digits.then(|| arg.parse().ok()).flatten() {
        Some(rate) => rate,
        None => {
            log::warn!("ignoring invalid rate {arg:?}; using default {DEFAULT_RATE}");
            DEFAULT_RATE
        }
    }
}

fn report_duration(wav_path: &Path) {
    match hound::WavReader::open(wav_path) {
        Ok(reader) => {
            let secs = reader.duration() as f64 / reader.spec().sample_rate as f64;
            println!("Synthesized {secs:.1}s of audio");
        }
        Err(e) => log::debug!("could not read back {}: {e}", wav_path.display()),
    }
}

fn print_voices() -> Result<(), SpeechError> {
    let engine = EspeakEngine::discover()?;
    for voice in engine.list_voices()? {
        println!("{}\t{}", voice.name, voice.id);
    }
    Ok(())
}
