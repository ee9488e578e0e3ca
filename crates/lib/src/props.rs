//! `artifact-versions.properties` reading and writing.
//!
//! The format is a minimal subset of Java properties: one `key=value` per line,
//! split at the first `=`, no escaping. Blank lines and lines starting with `#`
//! are skipped when reading and never produced when writing.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Coordinate key -> coordinate value, as stored in a feature-pack.
pub type VersionMap = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum PropertiesError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse property '{line}' from {path} (line {line_number}): missing '='")]
  MissingSeparator {
    path: PathBuf,
    line_number: usize,
    line: String,
  },
}

pub type Result<T> = std::result::Result<T, PropertiesError>;

/// Parse properties content. `origin` is only used in error messages.
pub fn parse_versions(content: &str, origin: &Path) -> Result<VersionMap> {
  let mut versions = VersionMap::new();

  for (idx, raw) in content.lines().enumerate() {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    let (key, value) = line.split_once('=').ok_or_else(|| PropertiesError::MissingSeparator {
      path: origin.to_path_buf(),
      line_number: idx + 1,
      line: line.to_string(),
    })?;
    versions.insert(key.to_string(), value.to_string());
  }

  Ok(versions)
}

pub fn read_versions(path: &Path) -> Result<VersionMap> {
  let content = fs::read_to_string(path).map_err(|source| PropertiesError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  parse_versions(&content, path)
}

/// Render a version map, one `key=value` line per entry in key order.
pub fn render_versions(versions: &VersionMap) -> String {
  let mut out = String::new();
  for (key, value) in versions {
    out.push_str(key);
    out.push('=');
    out.push_str(value);
    out.push('\n');
  }
  out
}

pub fn write_versions(versions: &VersionMap, path: &Path) -> Result<()> {
  fs::write(path, render_versions(versions)).map_err(|source| PropertiesError::Write {
    path: path.to_path_buf(),
    source,
  })
}
