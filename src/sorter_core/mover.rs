use crate::sorter_core::error::{Result, SorterError};
use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// How a file reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    Link,
    CopyDelete,
}

/// Move `source` into `dest_dir`, keeping its file name.
///
/// Never overwrites: an existing file of the same name is a
/// `DestinationConflict`, even one that appears after the check. The file is
/// hard-linked into place and then unlinked from the source; when linking is
/// not possible (another filesystem, or one without hard links) it falls back
/// to a verified copy followed by deleting the source.
pub fn move_into(source: &Path, dest_dir: &Path) -> Result<(PathBuf, MoveMethod)> {
    let file_name = source
        .file_name()
        .ok_or_else(|| SorterError::Argument(format!("{} has no file name", source.display())))?;
    let destination = dest_dir.join(file_name);

    if !source.exists() {
        return Err(SorterError::FileMissing(source.to_path_buf()));
    }
    if destination.exists() {
        return Err(SorterError::DestinationConflict(destination));
    }

    fs::create_dir_all(dest_dir).map_err(|e| move_failed(source, &destination, e))?;

    match link_then_unlink(source, &destination) {
        Ok(()) => Ok((destination, MoveMethod::Link)),
        Err(LinkError::Fatal(e)) => Err(e),
        Err(LinkError::Unsupported(e)) => {
            log::debug!(
                "Cannot link {} ({}), copying instead",
                destination.display(),
                e
            );
            copy_then_delete(source, &destination)?;
            Ok((destination, MoveMethod::CopyDelete))
        }
    }
}

/// Why linking did not move the file.
#[derive(Debug)]
pub enum LinkError {
    /// Linking is not possible here; a copy may still work.
    Unsupported(io::Error),
    Fatal(SorterError),
}

/// Hard-link `source` at `destination`, then remove `source`.
///
/// `hard_link` fails with `AlreadyExists` instead of replacing a file, which
/// is what makes the move safe against a destination created concurrently.
pub fn link_then_unlink(source: &Path, destination: &Path) -> std::result::Result<(), LinkError> {
    if let Err(e) = fs::hard_link(source, destination) {
        return Err(match e.kind() {
            io::ErrorKind::AlreadyExists => {
                LinkError::Fatal(SorterError::DestinationConflict(destination.to_path_buf()))
            }
            io::ErrorKind::NotFound if !source.exists() => {
                LinkError::Fatal(SorterError::FileMissing(source.to_path_buf()))
            }
            _ => LinkError::Unsupported(e),
        });
    }

    if let Err(e) = fs::remove_file(source) {
        // Undo the link so the file exists exactly once, at the source.
        discard_partial(destination);
        return Err(LinkError::Fatal(move_failed(source, destination, e)));
    }

    log::debug!("Linked {} -> {}", source.display(), destination.display());
    Ok(())
}

/// Copy `source` to `destination` and delete `source` once the copy is on
/// disk and its hash matches. On any failure the partial copy is removed and
/// the source is left alone.
pub fn copy_then_delete(source: &Path, destination: &Path) -> Result<()> {
    let mut output = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(SorterError::DestinationConflict(destination.to_path_buf()));
        }
        Err(e) => return Err(move_failed(source, destination, e)),
    };

    let copied = fs::File::open(source)
        .and_then(|mut input| io::copy(&mut input, &mut output))
        .and_then(|_| output.sync_all());
    drop(output);

    if let Err(e) = copied {
        discard_partial(destination);
        return Err(move_failed(source, destination, e));
    }

    let source_hash = hash_file(source).map_err(|e| move_failed(source, destination, e));
    let copy_hash = hash_file(destination).map_err(|e| move_failed(source, destination, e));
    match (source_hash, copy_hash) {
        (Ok(a), Ok(b)) if a == b => {}
        (Ok(_), Ok(_)) => {
            discard_partial(destination);
            return Err(SorterError::MoveFailed {
                from: source.to_path_buf(),
                to: destination.to_path_buf(),
                reason: "copy does not match the original".to_string(),
            });
        }
        (Err(e), _) | (_, Err(e)) => {
            discard_partial(destination);
            return Err(e);
        }
    }

    // The copy is verified; a failure here leaves two identical files behind.
    fs::remove_file(source).map_err(|e| move_failed(source, destination, e))?;
    log::debug!("Copied {} -> {}", source.display(), destination.display());
    Ok(())
}

/// Calculate the SHA256 hash of a file, returned as base64.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(general_purpose::STANDARD.encode(hasher.finalize()))
}

fn discard_partial(destination: &Path) {
    if let Err(e) = fs::remove_file(destination) {
        log::warn!(
            "Could not remove partial copy {}: {}",
            destination.display(),
            e
        );
    }
}

fn move_failed(source: &Path, destination: &Path, error: io::Error) -> SorterError {
    SorterError::MoveFailed {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        reason: error.to_string(),
    }
}
