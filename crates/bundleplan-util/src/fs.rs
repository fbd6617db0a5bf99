use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Read an optional text file.
///
/// Returns `Ok(None)` when the file does not exist. Invalid UTF-8 is replaced
/// with the replacement character rather than failing the read.
///
/// # Errors
/// Returns an error for any failure other than the file being absent.
pub fn read_optional_lossy(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Make `path` absolute by joining it onto the current directory.
///
/// Purely lexical: symlinks are not resolved and the path need not exist.
///
/// # Errors
/// Returns an error if `path` is relative and the current directory cannot
/// be determined.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// Missing parent directories are created. Readers of `path` observe either
/// the previous contents or the new contents in full.
///
/// # Errors
/// Returns an error if the directory, temp file or rename fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let temp_path = parent.join(format!(
        ".{}.partial.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("plan"),
        std::process::id()
    ));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        // Windows refuses to rename over an existing file.
        if cfg!(windows) {
            fs::copy(&temp_path, path)?;
            let _ = fs::remove_file(&temp_path);
            return Ok(());
        }
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_optional_missing_is_none() {
        let dir = tempdir().unwrap();
        let got = read_optional_lossy(&dir.path().join(".env")).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn test_read_optional_replaces_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, [b'P', b'O', b'R', b'T', 0xff]).unwrap();

        let got = read_optional_lossy(&path).unwrap().unwrap();
        assert!(got.starts_with("PORT"));
        assert!(got.contains('\u{FFFD}'));
    }

    #[test]
    fn test_absolute_joins_relative_onto_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let got = absolute(Path::new("proj/src")).unwrap();
        assert!(got.is_absolute());
        assert_eq!(got, cwd.join("proj/src"));

        let already = absolute(Path::new("/srv/app")).unwrap();
        assert_eq!(already, PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_write_atomic_creates_parents_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("plan.json");

        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        write_atomic(&path, b"{\"a\":1}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_write_atomic_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.json");
        write_atomic(&path, b"{}").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["plan.json".to_string()]);
    }
}
