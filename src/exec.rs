//! Discovery of external executables.
//!
//! Every external capability (speech synthesis, transcoding) is backed by a
//! system binary. Each one is resolved against `PATH` exactly once at
//! startup and held as an `Option<PathBuf>`; call sites check availability
//! explicitly instead of catching spawn failures.

use std::path::PathBuf;

/// Locate `bin` on `PATH`, portably.
///
/// A path-like argument (containing a separator) is checked directly
/// instead of searched.
pub fn find_in_path(bin: &str) -> Option<PathBuf> {
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return if p.exists() { Some(p) } else { None };
    }

    let paths_os = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths_os) {
        let candidate = dir.join(bin);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
