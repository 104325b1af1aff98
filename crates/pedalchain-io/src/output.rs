//! Crash-safe output publishing.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::Result;

/// Writes `bytes` to `path` so that `path` either does not exist or holds the
/// complete contents.
///
/// Data goes to a temporary file in the destination directory, which is then
/// renamed over `path`. Missing parent directories are created. If the writer
/// is interrupted, only an anonymous temporary file is left behind, and it is
/// removed when dropped.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.wav");
        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"second");
        // Only the published file remains.
        let entries = std::fs::read_dir(target.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
