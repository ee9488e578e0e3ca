//! `feature-pack.xml` reading and writing.
//!
//! Only the parts of the galleon descriptor the patcher needs are modelled: the
//! feature-pack's own location and, for patches, the location it patches.
//!
//! ```xml
//! <feature-pack xmlns="urn:jboss:galleon:feature-pack:2.0" location="org.foo:fp:1.0-patch-redhat-00001">
//!   <patch for="org.foo:fp:1.0-redhat-00001"/>
//! </feature-pack>
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::coord::{CoordinateError, PackageId};

pub const FEATURE_PACK_NS: &str = "urn:jboss:galleon:feature-pack:2.0";

#[derive(Debug, Error)]
pub enum DescriptorError {
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

  #[error("malformed descriptor {path}: {message}")]
  Xml { path: PathBuf, message: String },

  #[error("failed to serialize descriptor: {0}")]
  Serialize(#[from] quick_xml::Error),

  #[error("descriptor {0} has no feature-pack location")]
  MissingLocation(PathBuf),

  #[error("invalid feature-pack id in {path}: {source}")]
  InvalidId {
    path: PathBuf,
    #[source]
    source: CoordinateError,
  },
}

pub type Result<T> = std::result::Result<T, DescriptorError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePackDescriptor {
  pub location: PackageId,
  pub patch_for: Option<PackageId>,
}

pub fn read_descriptor(path: &Path) -> Result<FeaturePackDescriptor> {
  let content = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  parse_descriptor(&content, path)
}

/// Parse descriptor XML. `origin` is only used in error messages.
pub fn parse_descriptor(xml: &str, origin: &Path) -> Result<FeaturePackDescriptor> {
  let xml_err = |message: String| DescriptorError::Xml {
    path: origin.to_path_buf(),
    message,
  };

  let mut reader = Reader::from_str(xml);
  reader.trim_text(true);

  let mut location = None;
  let mut patch_for = None;

  loop {
    match reader.read_event() {
      Ok(Event::Start(element)) | Ok(Event::Empty(element)) => match element.local_name().as_ref() {
        b"feature-pack" => location = attribute(&element, b"location").map_err(xml_err)?,
        b"patch" => patch_for = attribute(&element, b"for").map_err(xml_err)?,
        _ => {}
      },
      Ok(Event::Eof) => break,
      Ok(_) => {}
      Err(e) => return Err(xml_err(e.to_string())),
    }
  }

  let parse_id = |value: String| {
    value.parse::<PackageId>().map_err(|source| DescriptorError::InvalidId {
      path: origin.to_path_buf(),
      source,
    })
  };

  let location = location.ok_or_else(|| DescriptorError::MissingLocation(origin.to_path_buf()))?;
  Ok(FeaturePackDescriptor {
    location: parse_id(location)?,
    patch_for: patch_for.map(parse_id).transpose()?,
  })
}

/// Render a descriptor for `location`, optionally marking it as a patch for `patch_for`.
pub fn render_descriptor(location: &PackageId, patch_for: Option<&PackageId>) -> Result<String> {
  let location = location.to_string();
  let mut root = BytesStart::new("feature-pack");
  root.push_attribute(("xmlns", FEATURE_PACK_NS));
  root.push_attribute(("location", location.as_str()));

  let mut events = vec![Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))];
  let source = patch_for.map(PackageId::to_string);
  match &source {
    Some(source) => {
      let mut patch = BytesStart::new("patch");
      patch.push_attribute(("for", source.as_str()));
      events.push(Event::Start(root));
      events.push(Event::Empty(patch));
      events.push(Event::End(BytesEnd::new("feature-pack")));
    }
    None => events.push(Event::Empty(root)),
  }

  Ok(write_events(events)?)
}

pub fn write_descriptor(location: &PackageId, patch_for: Option<&PackageId>, path: &Path) -> Result<()> {
  fs::write(path, render_descriptor(location, patch_for)?).map_err(|source| DescriptorError::Write {
    path: path.to_path_buf(),
    source,
  })
}

/// Serialize events into an indented document.
pub(crate) fn write_events(events: Vec<Event<'_>>) -> std::result::Result<String, quick_xml::Error> {
  let bytes = write_events_into(Vec::new(), events)?;
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_events_into<W: io::Write>(sink: W, events: Vec<Event<'_>>) -> std::result::Result<W, quick_xml::Error> {
  let mut writer = Writer::new_with_indent(sink, b' ', 2);
  for event in events {
    writer.write_event(event)?;
  }
  Ok(writer.into_inner())
}

/// Value of attribute `name` on `element`, unescaped.
pub(crate) fn attribute(element: &BytesStart<'_>, name: &[u8]) -> std::result::Result<Option<String>, String> {
  for attr in element.attributes() {
    let attr = attr.map_err(|e| e.to_string())?;
    if attr.key.as_ref() == name {
      let value = attr.unescape_value().map_err(|e| e.to_string())?;
      return Ok(Some(value.into_owned()));
    }
  }
  Ok(None)
}
