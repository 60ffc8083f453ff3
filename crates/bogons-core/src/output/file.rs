// # Atomic File Output
//
// Replaces a file so that readers see either the old or the new content.
//
// ## Procedure
//
// 1. Copy the contents into `.<name>.<pid>.tmp` in the target's directory
//    (same filesystem, so the final rename is atomic)
// 2. Flush and `fsync` the staging file
// 3. Carry over the permissions of an existing target
// 4. Rename the staging file over the target
//
// Any failure before or during the rename removes the staging file and
// leaves the target as it was.
//
// A destination that is a symlink is resolved first, so the file it points
// to is replaced and the link itself stays in place.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::{Error, Result};

/// Atomically replace `path` with `contents`
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut reader = contents;
    stage_and_commit(path, &mut reader).await
}

/// Stage everything `contents` yields, then rename it over `path`
pub(crate) async fn stage_and_commit<R>(path: &Path, contents: &mut R) -> Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let resolved = resolve_target(path).await?;
    let path = resolved.as_path();
    let temp_path = staging_path(path)?;

    let result = async {
        write_staged(path, &temp_path, contents).await?;

        fs::rename(&temp_path, path).await.map_err(|e| {
            write_error(
                path,
                format!("Failed to rename {} into place: {}", temp_path.display(), e),
            )
        })
    }
    .await;

    if result.is_err() {
        discard(&temp_path).await;
    } else {
        tracing::trace!("Replaced {}", path.display());
    }

    result
}

async fn write_staged<R>(path: &Path, temp_path: &Path, contents: &mut R) -> Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut file = fs::File::create(temp_path).await.map_err(|e| {
        write_error(
            path,
            format!("Failed to create staging file {}: {}", temp_path.display(), e),
        )
    })?;

    tokio::io::copy(contents, &mut file).await.map_err(|e| {
        write_error(
            path,
            format!("Failed to write staging file {}: {}", temp_path.display(), e),
        )
    })?;

    file.flush().await.map_err(|e| {
        write_error(
            path,
            format!("Failed to flush staging file {}: {}", temp_path.display(), e),
        )
    })?;

    file.sync_all().await.map_err(|e| {
        write_error(
            path,
            format!("Failed to sync staging file {}: {}", temp_path.display(), e),
        )
    })?;

    if let Ok(metadata) = fs::metadata(path).await {
        fs::set_permissions(temp_path, metadata.permissions())
            .await
            .map_err(|e| write_error(path, format!("Failed to copy permissions: {}", e)))?;
    }

    Ok(())
}

/// Follow a symlinked destination to the file it points to
async fn resolve_target(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            let target = fs::canonicalize(path)
                .await
                .map_err(|e| write_error(path, format!("Failed to resolve symlink: {}", e)))?;
            tracing::debug!("{} resolves to {}", path.display(), target.display());
            Ok(target)
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Remove a staging file left behind by a failed write
async fn discard(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                "Failed to remove staging file {}: {}",
                temp_path.display(),
                e
            );
        }
    }
}

/// Get path of the staging file for `path`
fn staging_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| write_error(path, "Destination has no file name"))?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(parent.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    )))
}

fn write_error(path: &Path, message: impl Into<String>) -> Error {
    Error::write(path.display().to_string(), message)
}
