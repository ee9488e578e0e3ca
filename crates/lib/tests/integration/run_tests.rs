//! Successful runs.

use std::fs;
use std::path::PathBuf;

use repatch_lib::archive;
use repatch_lib::consts::{DESCRIPTOR_FILE, MANIFEST_FILE};
use repatch_lib::coord::PackageId;
use repatch_lib::descriptor::read_descriptor;
use repatch_lib::manifest::PatchManifest;
use repatch_lib::props::VersionMap;
use repatch_lib::run::run;

use super::common::{FP_VERSION, Fixture, PATCH_FP_VERSION, feature_pack_versions};

fn patch_archive(producer: &str) -> PathBuf {
  PathBuf::from("org/foo/bar")
    .join(producer)
    .join(PATCH_FP_VERSION)
    .join(format!("{producer}-{PATCH_FP_VERSION}.zip"))
}

#[test]
fn patches_three_feature_packs() {
  let fixture = Fixture::new();

  let untouched1 = fixture.artifact("org.foo.bar.no.patch", "art1", "1.0", None, "jar");
  let untouched2 = fixture.artifact("org.foo.bar.no.patch", "art2", "2.0", Some("lib"), "so");
  let untouched3 = fixture.artifact("org.foo.bar.no.patch", "art3", "3.0", None, "jar");
  // Shares a version directory with a patched artifact but is not patched itself.
  let classified = fixture.artifact("org.foo.bar", "art1", "1.0", Some("lib"), "so");

  let art1 = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let art2 = fixture.patched_artifact("org.foo.bar", "art2", "2.0", None, "jar");
  let art2_lib = fixture.patched_artifact("org.foo.bar", "art2", "2.0", Some("lib"), "so");
  let art3_lib = fixture.patched_artifact("org.foo.bar", "art3", "3.0", Some("lib"), "so");

  let fp1 = fixture.feature_pack("fp-prod1", FP_VERSION, &[&untouched1, &classified, &art1]);
  let fp2 = fixture.feature_pack("fp-prod2", FP_VERSION, &[&untouched2, &untouched3, &art2, &art2_lib]);
  let fp3 = fixture.feature_pack("fp-prod3", FP_VERSION, &[&art3_lib]);

  let config = fixture.config(&[
    fp1.to_str().unwrap(),
    fp2.to_str().unwrap(),
    fp3.to_str().unwrap(),
  ]);
  let summary = run(&config).unwrap();
  let output = fixture.unpack_output(&config);
  let repo = output.join("maven-repository");

  let expected_ids: Vec<PackageId> = ["fp-prod1", "fp-prod2", "fp-prod3"]
    .iter()
    .map(|producer| format!("org.foo.bar:{producer}:{PATCH_FP_VERSION}").parse().unwrap())
    .collect();
  let manifest = PatchManifest::read(&output.join(MANIFEST_FILE)).unwrap();
  assert_eq!(manifest.patches, expected_ids);
  assert_eq!(summary.manifest, fs::read_to_string(output.join(MANIFEST_FILE)).unwrap());

  let all = [
    &untouched1,
    &untouched2,
    &untouched3,
    &classified,
    &art1,
    &art2,
    &art2_lib,
    &art3_lib,
  ];
  for artifact in all {
    match &artifact.patched {
      Some(patched) => {
        assert!(!repo.join(&artifact.path).exists(), "{} should be removed", artifact.path.display());
        assert!(repo.join(&patched.path).exists(), "{} should be added", patched.path.display());
      }
      None => assert!(repo.join(&artifact.path).exists(), "{} should be kept", artifact.path.display()),
    }
  }

  // Directories left without artifacts go away entirely.
  assert!(!repo.join("org/foo/bar/art2/2.0").exists());
  assert!(!repo.join("org/foo/bar/art3/3.0").exists());
  // The pom of a removed artifact goes with it, the classified sibling stays.
  assert!(!repo.join("org/foo/bar/art1/1.0/art1-1.0.pom").exists());
  assert!(!repo.join("org/foo/bar/art1/1.0/art1-1.0.jar.sha1").exists());
  assert!(repo.join("org/foo/bar/art1/1.0/art1-1.0-lib.so").exists());

  let mut versions = VersionMap::new();
  for producer in ["fp-prod1", "fp-prod2", "fp-prod3"] {
    let archive = repo.join(patch_archive(producer));
    assert!(archive.exists(), "{} should be installed", archive.display());
    assert!(
      repo
        .join(format!("org/foo/bar/{producer}/{FP_VERSION}/{producer}-{FP_VERSION}.zip"))
        .exists()
    );
    versions.extend(feature_pack_versions(&archive));
  }
  assert_eq!(versions.len(), all.len());
  for artifact in all {
    let expected = artifact
      .patched
      .as_ref()
      .map_or(&artifact.value, |patched| &patched.value);
    assert_eq!(versions.get(&artifact.key), Some(expected), "entry for {}", artifact.key);
  }

  assert_eq!(summary.patches.len(), 3);
  assert_eq!(summary.replacement_count(), 4);
  assert_eq!(
    summary.deleted.dirs_removed,
    vec![PathBuf::from("org/foo/bar/art2/2.0"), PathBuf::from("org/foo/bar/art3/3.0")]
  );
  assert_eq!(summary.added.len(), 3);
}

#[test]
fn patch_descriptor_references_source() {
  let fixture = Fixture::new();
  let art = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let fp = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);

  let config = fixture.config(&[fp.to_str().unwrap()]);
  let summary = run(&config).unwrap();
  let repo = fixture.unpack_output(&config).join("maven-repository");

  let unpacked = fixture.temp.path().join("patch-fp");
  archive::unpack(&repo.join(patch_archive("fp-prod1")), &unpacked).unwrap();
  let descriptor = read_descriptor(&unpacked.join(DESCRIPTOR_FILE)).unwrap();

  let source: PackageId = format!("org.foo.bar:fp-prod1:{FP_VERSION}").parse().unwrap();
  assert_eq!(descriptor.location.to_string(), format!("org.foo.bar:fp-prod1:{PATCH_FP_VERSION}"));
  assert_eq!(descriptor.patch_for, Some(source.clone()));

  let record = &summary.patches[0];
  assert_eq!(record.patch_for, source);
  assert_eq!(record.source_archive, format!("fp-prod1-{FP_VERSION}.zip"));
  assert_eq!(record.installed, patch_archive("fp-prod1"));
  assert_eq!(record.replacements[0].old, art.value);
  assert_eq!(record.replacements[0].new, art.patched.as_ref().unwrap().value);
}

#[test]
fn unaffected_feature_pack_gets_no_patch() {
  let fixture = Fixture::new();
  let art = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let other = fixture.artifact("org.foo.other", "lib", "4.2", None, "jar");
  let fp1 = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);
  let fp2 = fixture.feature_pack("fp-prod2", FP_VERSION, &[&other]);

  let config = fixture.config(&[fp1.to_str().unwrap(), fp2.to_str().unwrap()]);
  let summary = run(&config).unwrap();
  let repo = fixture.unpack_output(&config).join("maven-repository");

  assert_eq!(summary.patches.len(), 1);
  assert!(!repo.join("org/foo/bar/fp-prod2").join(PATCH_FP_VERSION).exists());
  assert!(repo.join(&other.path).exists());
}

#[test]
fn missing_package_paths_are_skipped() {
  let fixture = Fixture::new();
  let art = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let fp = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);

  let config = fixture.config(&["org/foo/bar/not-installed", fp.to_str().unwrap()]);
  let summary = run(&config).unwrap();

  assert_eq!(summary.patches.len(), 1);
}

#[test]
fn artifact_claimed_by_first_feature_pack_only() {
  let fixture = Fixture::new();
  let art = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let fp1 = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);
  let fp2 = fixture.feature_pack("fp-prod2", FP_VERSION, &[&art]);

  let config = fixture.config(&[fp1.to_str().unwrap(), fp2.to_str().unwrap()]);
  let summary = run(&config).unwrap();

  assert_eq!(summary.patches.len(), 1);
  assert_eq!(summary.patches[0].id.artifact, "fp-prod1");
}

#[test]
fn previous_output_is_replaced() {
  let fixture = Fixture::new();
  let art = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let fp = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);

  let config = fixture.config(&[fp.to_str().unwrap()]);
  fs::create_dir_all(config.output.parent().unwrap()).unwrap();
  fs::write(&config.output, b"stale").unwrap();
  fs::create_dir_all(config.work_dir.join("leftover")).unwrap();

  run(&config).unwrap();

  assert!(!config.work_dir.join("leftover").exists());
  let repo = fixture.unpack_output(&config).join("maven-repository");
  assert!(repo.join(&art.patched.as_ref().unwrap().path).exists());
}
