//! Output directory preparation and atomic file writes.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

use crate::error::PersistError;

/// Ensure `dir` exists as a directory.
///
/// Safe to call repeatedly and concurrently. When `marker` is given, an empty
/// file of that name is created inside `dir` unless one already exists.
///
/// # Errors
///
/// Returns [`PersistError::NotADirectory`] if `dir` exists but is not a
/// directory, or [`PersistError::Io`] if it cannot be created.
pub async fn ensure_output_dir(dir: &Path, marker: Option<&str>) -> Result<(), PersistError> {
    match fs::metadata(dir).await {
        Ok(meta) if !meta.is_dir() => return Err(PersistError::NotADirectory(dir.to_path_buf())),
        Ok(_) => {}
        Err(_) => fs::create_dir_all(dir).await.map_err(PersistError::io(dir))?,
    }

    // A concurrent caller may have raced us; confirm the end state
    let meta = fs::metadata(dir).await.map_err(PersistError::io(dir))?;
    if !meta.is_dir() {
        return Err(PersistError::NotADirectory(dir.to_path_buf()));
    }

    if let Some(marker) = marker {
        let path = dir.join(marker);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => debug!(path = %path.display(), "Created output marker"),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(PersistError::io(&path)(e)),
        }
    }
    Ok(())
}

/// Replace `target` with `contents` atomically.
///
/// The content goes to a temp file next to `target`, is synced, and is then
/// renamed over it. Readers see either the old file or the new one. A new
/// file gets the same mode a plain create would; an existing target keeps
/// its mode.
///
/// # Errors
///
/// Returns [`PersistError`] if the temp file cannot be written or renamed.
pub async fn write_atomic(target: &Path, contents: String) -> Result<(), PersistError> {
    write_atomic_until(target, contents, None).await
}

/// Like [`write_atomic`], but gives up before the rename once `deadline`
/// has passed, leaving `target` untouched.
pub(crate) async fn write_atomic_until(
    target: &Path,
    contents: String,
    deadline: Option<Instant>,
) -> Result<(), PersistError> {
    let target = target.to_path_buf();
    tokio::task::spawn_blocking(move || {
        write_atomic_blocking(&target, contents.as_bytes(), deadline)
    })
    .await?
}

fn write_atomic_blocking(
    target: &Path,
    contents: &[u8],
    deadline: Option<Instant>,
) -> Result<(), PersistError> {
    let dir = target
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let mut tmp = temp_file_in(&dir).map_err(PersistError::io(&dir))?;
    if let Ok(meta) = std::fs::metadata(target) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(PersistError::io(tmp.path()))?;
    }
    tmp.write_all(contents).map_err(PersistError::io(tmp.path()))?;
    tmp.as_file_mut()
        .sync_all()
        .map_err(PersistError::io(tmp.path()))?;

    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
        return Err(PersistError::DeadlineExceeded(target.to_path_buf()));
    }
    tmp.persist(target)
        .map_err(|e| PersistError::io(target)(e.error))?;
    Ok(())
}

fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".quill-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        // Narrowed by the umask, like File::create
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_missing_output_dir() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("dist").join("nested");

        ensure_output_dir(&dir, None).await.unwrap();

        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_output_dir_twice() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("dist");

        ensure_output_dir(&dir, Some(".gitkeep")).await.unwrap();
        std::fs::write(dir.join(".gitkeep"), "keep").unwrap();
        ensure_output_dir(&dir, Some(".gitkeep")).await.unwrap();

        assert!(dir.is_dir());
        // Existing marker is left alone
        assert_eq!(std::fs::read_to_string(dir.join(".gitkeep")).unwrap(), "keep");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_ensure_output_dir_concurrent() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("dist");

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let dir = dir.clone();
            tasks.spawn(async move { ensure_output_dir(&dir, Some(".gitkeep")).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        assert!(dir.is_dir());
        assert!(dir.join(".gitkeep").is_file());
    }

    #[tokio::test]
    async fn test_ensure_output_dir_rejects_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("dist");
        std::fs::write(&file, "x").unwrap();

        let err = ensure_output_dir(&file, None).await.unwrap_err();

        assert!(matches!(err, PersistError::NotADirectory(_)));
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_existing() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("post.html");

        write_atomic(&target, "<p>one</p>".to_owned()).await.unwrap();
        write_atomic(&target, "<p>two</p>".to_owned()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "<p>two</p>");
        let entries = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(entries, 1, "temp files must not be left behind");
    }

    #[tokio::test]
    async fn test_write_atomic_missing_dir_leaves_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("missing").join("post.html");

        let result = write_atomic(&target, "<p>x</p>".to_owned()).await;

        assert!(matches!(result, Err(PersistError::Io { .. })));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_atomic_uses_default_file_mode() {
        use std::os::unix::fs::PermissionsExt as _;

        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("post.html");
        let plain = temp.path().join("plain.html");

        write_atomic(&target, "<p>x</p>".to_owned()).await.unwrap();
        std::fs::write(&plain, "x").unwrap();

        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&target), mode(&plain));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_atomic_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt as _;

        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("post.html");
        std::fs::write(&target, "old").unwrap();
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&target, "<p>new</p>".to_owned()).await.unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[tokio::test]
    async fn test_write_past_deadline_leaves_target() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("post.html");
        std::fs::write(&target, "old").unwrap();

        let result = write_atomic_until(&target, "<p>new</p>".to_owned(), Some(Instant::now())).await;

        assert!(matches!(result, Err(PersistError::DeadlineExceeded(_))));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
        let entries = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
