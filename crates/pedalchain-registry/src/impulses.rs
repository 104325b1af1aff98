//! Impulse-response directory discovery.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Extensions the decoder understands, lowercase.
pub const IMPULSE_EXTENSIONS: [&str; 5] = ["wav", "flac", "mp3", "ogg", "m4a"];

/// Returns whether `name` carries a decodable audio extension.
pub fn is_impulse_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMPULSE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Lists audio files directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list. Entries that cannot be read or
/// whose names are not valid UTF-8 are skipped.
pub fn scan_impulse_dir(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), %err, "impulse directory unavailable");
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "skipping unreadable impulse entry");
                continue;
            }
        };
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "skipping non-UTF-8 impulse file name");
            continue;
        };
        if is_impulse_file_name(&name) {
            names.push(name);
        }
    }
    names.sort();
    debug!(dir = %dir.display(), count = names.len(), "scanned impulse directory");
    names
}
