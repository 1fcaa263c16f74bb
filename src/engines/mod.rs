//! Speech synthesis engines.
//!
//! This module contains the text-to-speech engine used by the pipeline.
//! Synthesis is delegated to an external offline engine; nothing here
//! produces audio samples itself.

pub mod espeak;
