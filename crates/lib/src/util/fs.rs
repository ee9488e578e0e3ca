//! Directory helpers.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum FsError {
  #[error("failed to {action} {path}: {source}")]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to walk {path}: {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

pub type Result<T> = std::result::Result<T, FsError>;

fn io_err<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> FsError + 'a {
  move |source| FsError::Io {
    action,
    path: path.to_path_buf(),
    source,
  }
}

/// Make `dir` an empty directory, removing whatever was there.
pub fn reset_dir(dir: &Path) -> Result<()> {
  if dir.exists() {
    fs::remove_dir_all(dir).map_err(io_err("remove", dir))?;
  }
  fs::create_dir_all(dir).map_err(io_err("create", dir))
}

/// Remove `path` if it is a file. Returns whether something was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
  match fs::remove_file(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(io_err("remove", path)(e)),
  }
}

/// Copy every file below `src` into `dest`, creating directories as needed and
/// overwriting files that already exist. Returns the copied files relative to `src`.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<BTreeSet<PathBuf>> {
  let mut copied = BTreeSet::new();

  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|source| FsError::Walk {
      path: src.to_path_buf(),
      source,
    })?;
    let Ok(relative) = entry.path().strip_prefix(src) else {
      continue;
    };
    let target = dest.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(io_err("create", &target))?;
    } else if entry.file_type().is_file() {
      fs::copy(entry.path(), &target).map_err(io_err("copy", &target))?;
      copied.insert(relative.to_path_buf());
    }
  }

  Ok(copied)
}
