//! Coordinate codec.
//!
//! Maps between a file's location inside a Maven repository and the coordinate
//! strings used by feature-pack version maps:
//!
//! ```text
//! org/foo/bar/art1/1.0/art1-1.0-class.jar
//!   key   = org.foo.bar:art1::class
//!   value = org.foo.bar:art1:1.0:class:jar
//! ```
//!
//! The classifier is whatever sits between the first occurrence of the version
//! in the file name and the extension, minus one leading separator. An artifact
//! id that itself contains the version text shifts that boundary; this is kept
//! as is so that keys match the ones already recorded in existing feature-packs.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while decoding or encoding coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
  #[error("expected {expected} ':'-separated fields in '{value}', found {found}")]
  FieldCount {
    value: String,
    expected: usize,
    found: usize,
  },

  #[error("empty {field} in '{value}'")]
  EmptyField { value: String, field: &'static str },

  #[error("path is too shallow to hold group/artifact/version/file: {0}")]
  TooShallow(PathBuf),

  #[error("path is not a plain relative UTF-8 path: {0}")]
  InvalidPath(PathBuf),

  #[error("file name has no extension: {0}")]
  MissingExtension(String),

  #[error("version '{version}' does not appear in file name '{file_name}'")]
  VersionNotInFileName { version: String, file_name: String },

  #[error("file name '{0}' has its extension inside the version")]
  MalformedFileName(String),
}

pub type Result<T> = std::result::Result<T, CoordinateError>;

/// One file in a Maven repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
  pub group: String,
  pub artifact: String,
  pub version: String,
  pub classifier: Option<String>,
  pub extension: String,
}

impl Coordinate {
  /// Version-independent key: `group:artifact` or `group:artifact::classifier`.
  pub fn key(&self) -> String {
    match &self.classifier {
      Some(classifier) => format!("{}:{}::{}", self.group, self.artifact, classifier),
      None => format!("{}:{}", self.group, self.artifact),
    }
  }

  /// Full value: `group:artifact:version:classifier:extension`.
  pub fn value(&self) -> String {
    format!(
      "{}:{}:{}:{}:{}",
      self.group,
      self.artifact,
      self.version,
      self.classifier.as_deref().unwrap_or(""),
      self.extension
    )
  }

  /// `artifact-version[-classifier].extension`
  pub fn file_name(&self) -> String {
    let mut name = format!("{}-{}", self.artifact, self.version);
    if let Some(classifier) = &self.classifier {
      name.push('-');
      name.push_str(classifier);
    }
    name.push('.');
    name.push_str(&self.extension);
    name
  }

  /// Relative location of this file inside a repository.
  pub fn location(&self) -> PathBuf {
    let mut path: PathBuf = self.group.split('.').collect();
    path.push(&self.artifact);
    path.push(&self.version);
    path.push(self.file_name());
    path
  }

  /// Parse a full value string (exactly five fields).
  pub fn from_value(value: &str) -> Result<Self> {
    let fields: Vec<&str> = value.split(':').collect();
    if fields.len() != 5 {
      return Err(CoordinateError::FieldCount {
        value: value.to_string(),
        expected: 5,
        found: fields.len(),
      });
    }

    for (field, name) in fields.iter().zip(["group", "artifact", "version"]) {
      if field.is_empty() {
        return Err(CoordinateError::EmptyField {
          value: value.to_string(),
          field: name,
        });
      }
    }
    if fields[4].is_empty() {
      return Err(CoordinateError::EmptyField {
        value: value.to_string(),
        field: "extension",
      });
    }

    Ok(Self {
      group: fields[0].to_string(),
      artifact: fields[1].to_string(),
      version: fields[2].to_string(),
      classifier: (!fields[3].is_empty()).then(|| fields[3].to_string()),
      extension: fields[4].to_string(),
    })
  }

  /// Decode a location relative to the repository root.
  pub fn from_location(path: &Path) -> Result<Self> {
    let segments = path_segments(path)?;
    let [group @ .., artifact, version, file_name] = segments.as_slice() else {
      return Err(CoordinateError::TooShallow(path.to_path_buf()));
    };
    if group.is_empty() {
      return Err(CoordinateError::TooShallow(path.to_path_buf()));
    }

    let ext_idx = file_name
      .rfind('.')
      .ok_or_else(|| CoordinateError::MissingExtension(file_name.to_string()))?;
    let version_idx = file_name
      .find(version)
      .ok_or_else(|| CoordinateError::VersionNotInFileName {
        version: version.to_string(),
        file_name: file_name.to_string(),
      })?;
    let boundary = version_idx + version.len();
    if boundary > ext_idx {
      return Err(CoordinateError::MalformedFileName(file_name.to_string()));
    }

    let mut rest = file_name[boundary..ext_idx].chars();
    rest.next();
    let classifier = rest.as_str();

    Ok(Self {
      group: group.join("."),
      artifact: artifact.to_string(),
      version: version.to_string(),
      classifier: (!classifier.is_empty()).then(|| classifier.to_string()),
      extension: file_name[ext_idx + 1..].to_string(),
    })
  }
}

impl fmt::Display for Coordinate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.value())
  }
}

impl FromStr for Coordinate {
  type Err = CoordinateError;

  fn from_str(s: &str) -> Result<Self> {
    Self::from_value(s)
  }
}

/// Decode a repository-relative path into its `(key, value)` version map entry.
pub fn decode(path: &Path) -> Result<(String, String)> {
  let coordinate = Coordinate::from_location(path)?;
  Ok((coordinate.key(), coordinate.value()))
}

/// Encode a full value string back into its repository-relative path.
pub fn encode(value: &str) -> Result<PathBuf> {
  Ok(Coordinate::from_value(value)?.location())
}

fn path_segments(path: &Path) -> Result<Vec<&str>> {
  path
    .components()
    .map(|component| match component {
      Component::Normal(segment) => segment.to_str(),
      _ => None,
    })
    .collect::<Option<Vec<_>>>()
    .ok_or_else(|| CoordinateError::InvalidPath(path.to_path_buf()))
}

/// Identity of a feature-pack: `group:artifact:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(into = "String")]
pub struct PackageId {
  pub group: String,
  pub artifact: String,
  pub version: String,
}

impl PackageId {
  /// Build an id from a repository-relative package path (`org/foo/bar/artifact`) and a version.
  pub fn from_package_path(package_path: &Path, version: &str) -> Result<Self> {
    let segments = path_segments(package_path)?;
    let [group @ .., artifact] = segments.as_slice() else {
      return Err(CoordinateError::TooShallow(package_path.to_path_buf()));
    };
    if group.is_empty() {
      return Err(CoordinateError::TooShallow(package_path.to_path_buf()));
    }

    Ok(Self {
      group: group.join("."),
      artifact: artifact.to_string(),
      version: version.to_string(),
    })
  }
}

impl fmt::Display for PackageId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
  }
}

impl FromStr for PackageId {
  type Err = CoordinateError;

  fn from_str(s: &str) -> Result<Self> {
    let fields: Vec<&str> = s.split(':').collect();
    let [group, artifact, version] = fields.as_slice() else {
      return Err(CoordinateError::FieldCount {
        value: s.to_string(),
        expected: 3,
        found: fields.len(),
      });
    };
    if let Some(field) = [("group", group), ("artifact", artifact), ("version", version)]
      .into_iter()
      .find_map(|(name, field)| field.is_empty().then_some(name))
    {
      return Err(CoordinateError::EmptyField {
        value: s.to_string(),
        field,
      });
    }

    Ok(Self {
      group: group.to_string(),
      artifact: artifact.to_string(),
      version: version.to_string(),
    })
  }
}

impl From<PackageId> for String {
  fn from(id: PackageId) -> Self {
    id.to_string()
  }
}
