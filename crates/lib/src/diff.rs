//! Diff computation between a feature-pack's version map and the patched artifacts.
//!
//! This module decides which entries of a feature-pack's version map are
//! superseded by artifacts from the repository patch, and which files of the
//! original repository those entries pointed at.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::coord::{self, decode, encode};
use crate::props::VersionMap;

/// Result of matching one feature-pack against the patched artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDiff {
  /// The full version map with superseded entries replaced.
  pub updated: VersionMap,

  /// Repository-relative locations of the superseded artifacts.
  pub to_remove: BTreeSet<PathBuf>,

  /// Superseded entries: key -> old value.
  pub replaced: BTreeMap<String, String>,
}

impl VersionDiff {
  /// True when the feature-pack references none of the patched artifacts.
  pub fn is_empty(&self) -> bool {
    self.replaced.is_empty()
  }
}

/// Build the key -> value pool of patched artifacts from their repository locations.
pub fn coordinate_pool<'a>(locations: impl IntoIterator<Item = &'a PathBuf>) -> coord::Result<VersionMap> {
  locations.into_iter().map(|location| decode(location)).collect()
}

/// Compute the diff of `versions` against `new_coordinates`.
///
/// For every key present in both maps, the entry in `versions` is replaced by
/// the new value, the old value is kept in `replaced`, and the old value's
/// location goes to `to_remove`. Keys only in one of the maps are left alone.
pub fn compute_diff(versions: VersionMap, new_coordinates: &VersionMap) -> coord::Result<VersionDiff> {
  let mut diff = VersionDiff {
    updated: versions,
    ..Default::default()
  };

  for (key, new_value) in new_coordinates {
    let Some(slot) = diff.updated.get_mut(key) else {
      continue;
    };

    let old_value = std::mem::replace(slot, new_value.clone());
    diff.to_remove.insert(encode(&old_value)?);
    diff.replaced.insert(key.clone(), old_value);
  }

  Ok(diff)
}
