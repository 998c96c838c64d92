//! Destination path resolution for uploaded files.
//!
//! Filenames come straight from the multipart part headers, so they are
//! untrusted. A filename is accepted only if it is exactly one normal path
//! component; anything that could address a location outside the downloads
//! folder is rejected rather than rewritten.

use std::path::{Component, Path, PathBuf};

use super::errors::UploadError;

/// Join `folder` and `filename`, rejecting names that escape `folder`.
///
/// Rejected: empty names, `.` and `..`, absolute paths, names containing a
/// `/` or `\` separator, and names containing NUL.
pub fn resolve_destination(folder: &Path, filename: &str) -> Result<PathBuf, UploadError> {
    if filename.is_empty() {
        return Err(UploadError::invalid_filename(filename, "filename is empty"));
    }
    if filename.contains('\0') {
        return Err(UploadError::invalid_filename(filename, "filename contains NUL"));
    }
    // Checked explicitly so Windows-style separators are refused on every platform.
    if filename.contains('/') || filename.contains('\\') {
        return Err(UploadError::invalid_filename(
            filename,
            "filename contains a path separator",
        ));
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(folder.join(filename)),
        _ => Err(UploadError::invalid_filename(
            filename,
            "filename must be a single path component",
        )),
    }
}
