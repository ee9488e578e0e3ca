//! Zip packing and unpacking.
//!
//! Entries are stored relative to the packed directory, so
//! `pack(dir)` followed by `unpack(dest)` reproduces `dir`'s contents in `dest`.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("IO error: {0}")]
  Io(#[from] io::Error),

  #[error("failed to walk {0}")]
  Walk(#[from] walkdir::Error),

  #[error("failed to open zip {path}: {source}")]
  Open {
    path: PathBuf,
    #[source]
    source: ZipError,
  },

  #[error("failed to read zip entry in {path}: {source}")]
  Entry {
    path: PathBuf,
    #[source]
    source: ZipError,
  },

  #[error("failed to write zip {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: ZipError,
  },

  #[error("zip entry has an unsafe name: {0}")]
  UnsafeEntry(String),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Unpack `archive_path` into `dest`, creating `dest` if needed.
pub fn unpack(archive_path: &Path, dest: &Path) -> Result<()> {
  let file = File::open(archive_path)?;
  let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Open {
    path: archive_path.to_path_buf(),
    source,
  })?;

  fs::create_dir_all(dest)?;

  for i in 0..archive.len() {
    let mut entry = archive.by_index(i).map_err(|source| ArchiveError::Entry {
      path: archive_path.to_path_buf(),
      source,
    })?;

    let relative = entry
      .enclosed_name()
      .ok_or_else(|| ArchiveError::UnsafeEntry(entry.name().to_string()))?;
    let dest_path = dest.join(relative);

    if entry.is_dir() {
      fs::create_dir_all(&dest_path)?;
      continue;
    }

    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent)?;
    }
    let mut outfile = File::create(&dest_path)?;
    io::copy(&mut entry, &mut outfile)?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = entry.unix_mode() {
        fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode))?;
      }
    }
  }

  debug!(archive = %archive_path.display(), dest = %dest.display(), "unpacked");
  Ok(())
}

/// Pack the contents of `dir` (not `dir` itself) into a new zip at `archive_path`.
pub fn pack(dir: &Path, archive_path: &Path) -> Result<()> {
  if let Some(parent) = archive_path.parent() {
    fs::create_dir_all(parent)?;
  }

  let file = File::create(archive_path)?;
  let mut writer = ZipWriter::new(BufWriter::new(file));
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
  let write_err = |source| ArchiveError::Write {
    path: archive_path.to_path_buf(),
    source,
  };

  for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    let name = entry_name(dir, entry.path())?;

    if entry.file_type().is_dir() {
      writer.add_directory(name, options).map_err(write_err)?;
    } else if entry.file_type().is_file() {
      writer.start_file(name, options).map_err(write_err)?;
      let mut input = File::open(entry.path())?;
      io::copy(&mut input, &mut writer)?;
    }
  }

  let mut inner = writer.finish().map_err(write_err)?;
  inner.flush()?;

  debug!(dir = %dir.display(), archive = %archive_path.display(), "packed");
  Ok(())
}

/// Zip entry name for `path`: its components below `base`, joined with `/`.
fn entry_name(base: &Path, path: &Path) -> Result<String> {
  let unsafe_entry = || ArchiveError::UnsafeEntry(path.display().to_string());
  let relative = path.strip_prefix(base).map_err(|_| unsafe_entry())?;

  let segments = relative
    .components()
    .map(|component| match component {
      Component::Normal(segment) => segment.to_str(),
      _ => None,
    })
    .collect::<Option<Vec<_>>>()
    .ok_or_else(unsafe_entry)?;

  Ok(segments.join("/"))
}
