// src/cache/atomic.rs
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `bytes` next to `target` in a temp file and force it to disk.
/// The temp file lives in the target's directory so the later rename never
/// crosses a filesystem.
pub fn stage(target: &Path, bytes: &[u8]) -> io::Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Rename a staged file over `target` in one step.
pub fn commit(staged: NamedTempFile, target: &Path) -> io::Result<()> {
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Readers of `target` see either the previous file or all of `bytes`.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let staged = stage(target, bytes)?;
    commit(staged, target)
}
