use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::Builder;

const STAGING_PREFIX: &str = ".savefix-";
const STAGING_SUFFIX: &str = ".partial";

/// Stages `bytes` next to `path` and renames the staged file over it. The
/// destination is never removed first, so a reader sees either the old save
/// or the complete new one. A staged file left by a failed write is deleted.
pub(crate) fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)?;

    let mut staged = Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(directory)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|error| error.error)?;
    Ok(())
}

/// Absolute, symlink-free form of `path`, which need not exist yet.
/// Missing trailing components are applied lexically on top of the deepest
/// existing ancestor; they cannot be symlinks.
pub(crate) fn resolve_destination(path: &Path) -> io::Result<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Ok(resolved);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut pending = Vec::new();
    let mut resolved = loop {
        match fs::canonicalize(existing) {
            Ok(base) => break base,
            Err(error) => {
                let last = existing.components().next_back();
                let (Some(parent), Some(last)) = (existing.parent(), last) else {
                    return Err(error);
                };
                pending.push(last);
                existing = parent;
            }
        }
    };

    for component in pending.into_iter().rev() {
        match component {
            Component::Normal(name) => resolved.push(name),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    // The lexical result can land on an existing file, possibly a symlink.
    Ok(fs::canonicalize(&resolved).unwrap_or(resolved))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn staged_leftovers(directory: &Path) -> Vec<PathBuf> {
        fs::read_dir(directory)
            .expect("read dir")
            .map(|entry| entry.expect("entry").path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(STAGING_PREFIX))
            })
            .collect()
    }

    #[test]
    fn writes_into_missing_directories_and_replaces_existing_save() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("slot_fixed.sav");

        write_bytes_atomic(&path, b"first").expect("first write");
        write_bytes_atomic(&path, b"second").expect("second write");

        assert_eq!(fs::read(&path).expect("read"), b"second");
        assert!(staged_leftovers(path.parent().expect("parent")).is_empty());
    }

    #[test]
    fn failed_rename_keeps_destination_and_cleans_staging() {
        let temp = TempDir::new().expect("tempdir");
        let occupied = temp.path().join("slot_fixed.sav");
        fs::create_dir(&occupied).expect("dir in the way");
        fs::write(occupied.join("keep.txt"), b"keep").expect("marker");

        write_bytes_atomic(&occupied, b"{}").expect_err("rename over a directory");

        assert!(occupied.is_dir());
        assert_eq!(fs::read(occupied.join("keep.txt")).expect("marker"), b"keep");
        assert!(staged_leftovers(temp.path()).is_empty());
    }

    #[test]
    fn destination_resolution_sees_through_dot_dot_without_creating_dirs() {
        let temp = TempDir::new().expect("tempdir");
        let input = temp.path().join("slot.sav");
        fs::write(&input, b"{}").expect("write input");

        let alias = temp.path().join("sub").join("..").join("slot.sav");
        assert_eq!(
            resolve_destination(&alias).expect("resolve"),
            fs::canonicalize(&input).expect("canonical input")
        );
        assert!(!temp.path().join("sub").exists());

        let fresh = temp.path().join("a").join("b").join("..").join("out.sav");
        assert_eq!(
            resolve_destination(&fresh).expect("resolve"),
            fs::canonicalize(temp.path())
                .expect("canonical temp")
                .join("a")
                .join("out.sav")
        );
    }
}
