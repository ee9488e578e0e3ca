//! `patches.xml`: the list of patch feature-packs created by a run.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <patches>
//!   <patch id="org.foo.bar:fp-prod1:1.0-patch-redhat-00001"/>
//! </patches>
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use thiserror::Error;
use tracing::info;

use crate::consts::MANIFEST_FILE;
use crate::coord::{CoordinateError, PackageId};
use crate::descriptor::{attribute, write_events};

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed patch manifest: {0}")]
  Xml(String),

  #[error("failed to serialize patch manifest: {0}")]
  Serialize(#[from] quick_xml::Error),

  #[error("patch element without an id")]
  MissingId,

  #[error("invalid patch id: {0}")]
  InvalidId(#[from] CoordinateError),
}

pub type Result<T> = std::result::Result<T, ManifestError>;

/// Patches in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchManifest {
  pub patches: Vec<PackageId>,
}

impl PatchManifest {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, id: PackageId) {
    self.patches.push(id);
  }

  pub fn is_empty(&self) -> bool {
    self.patches.is_empty()
  }

  pub fn len(&self) -> usize {
    self.patches.len()
  }

  pub fn render(&self) -> Result<String> {
    let ids: Vec<String> = self.patches.iter().map(PackageId::to_string).collect();

    let mut events = vec![
      Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
      Event::Start(BytesStart::new("patches")),
    ];
    for id in &ids {
      let mut patch = BytesStart::new("patch");
      patch.push_attribute(("id", id.as_str()));
      events.push(Event::Empty(patch));
    }
    events.push(Event::End(BytesEnd::new("patches")));

    Ok(write_events(events)?)
  }

  /// Write `patches.xml` into `dir`, returning its path and content.
  pub fn write(&self, dir: &Path) -> Result<(PathBuf, String)> {
    let path = dir.join(MANIFEST_FILE);
    let content = self.render()?;
    fs::write(&path, &content).map_err(|source| ManifestError::Write {
      path: path.clone(),
      source,
    })?;
    info!(path = %path.display(), patches = self.patches.len(), "wrote patch manifest");
    Ok((path, content))
  }

  pub fn read(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&content)
  }

  pub fn parse(xml: &str) -> Result<Self> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut manifest = Self::new();
    loop {
      match reader.read_event() {
        Ok(Event::Start(element)) | Ok(Event::Empty(element)) if element.local_name().as_ref() == b"patch" => {
          let id = attribute(&element, b"id")
            .map_err(ManifestError::Xml)?
            .ok_or(ManifestError::MissingId)?;
          manifest.push(id.parse()?);
        }
        Ok(Event::Eof) => break,
        Ok(_) => {}
        Err(e) => return Err(ManifestError::Xml(e.to_string())),
      }
    }

    Ok(manifest)
  }
}
