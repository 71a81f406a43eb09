//! Overwrite-safe file moves.

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// One planned or completed file move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl Relocation {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Result of [`move_and_overwrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The source was moved into place.
    Moved,
    /// There was no source; the destination was left untouched.
    SourceMissing,
}

/// Move `src` to `dst`, deleting anything already at `dst`.
///
/// A missing `src` is not an error and leaves `dst` as it was.
pub fn move_and_overwrite(src: &Path, dst: &Path) -> io::Result<MoveOutcome> {
    match fs::symlink_metadata(src) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(src = %src.display(), "source does not exist, not moving");
            return Ok(MoveOutcome::SourceMissing);
        }
        Err(e) => return Err(e),
    }

    if remove_file_if_exists(dst)? {
        debug!(dst = %dst.display(), "deleted existing destination");
    }

    fs::rename(src, dst)?;
    debug!(src = %src.display(), dst = %dst.display(), "moved");
    Ok(MoveOutcome::Moved)
}

/// Delete the file at `path`, returning whether there was one.
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
