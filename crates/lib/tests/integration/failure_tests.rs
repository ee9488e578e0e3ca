//! Runs that must abort without producing an output archive.

use std::fs;

use repatch_lib::patch::PatchError;
use repatch_lib::run::{ErrorKind, RunError, run};

use super::common::{FP_VERSION, Fixture};

#[test]
fn unmatched_patch_artifact_fails() {
  let fixture = Fixture::new();
  let art = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  fixture.new_artifact("org.foo.unknown", "stray", "9.9", None, "jar");
  let fp = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);

  let config = fixture.config(&[fp.to_str().unwrap()]);
  let err = run(&config).unwrap_err();

  assert!(
    matches!(&err, RunError::ReconciliationIncomplete(keys) if keys == &vec!["org.foo.unknown:stray".to_string()]),
    "unexpected error: {err}"
  );
  assert!(!config.output.exists());
}

#[test]
fn empty_patch_fails() {
  let fixture = Fixture::new();
  let art = fixture.artifact("org.foo.bar.no.patch", "art1", "1.0", None, "jar");
  let fp = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);

  let config = fixture.config(&[fp.to_str().unwrap()]);
  let err = run(&config).unwrap_err();

  assert_eq!(err.kind(), ErrorKind::EmptyPatchInput);
  assert!(err.to_string().contains("no artifacts found in the repository patch"));
  assert!(!config.output.exists());
}

#[test]
fn no_matching_feature_pack_fails() {
  let fixture = Fixture::new();
  let art = fixture.artifact("org.foo.bar", "art1", "1.0", None, "jar");
  fixture.new_artifact("org.foo.unknown", "stray", "9.9", None, "jar");
  let fp = fixture.feature_pack("fp-prod1", FP_VERSION, &[&art]);

  let config = fixture.config(&[fp.to_str().unwrap()]);
  let err = run(&config).unwrap_err();

  // Reported ahead of the unmatched artifact.
  assert!(matches!(err, RunError::NoPatchesProduced));
  assert!(!config.output.exists());
}

#[test]
fn no_known_feature_pack_installed_fails() {
  let fixture = Fixture::new();
  fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");

  let config = fixture.config(&["org/wildfly/core/wildfly-core-galleon-pack"]);
  assert!(matches!(run(&config), Err(RunError::NoPatchesProduced)));
}

#[test]
fn missing_repository_root_fails() {
  let fixture = Fixture::new();
  fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let mut config = fixture.config(&[]);

  let bare = fixture.temp.path().join("bare");
  fs::create_dir_all(bare.join("builder-image/repository")).unwrap();
  fs::write(bare.join("builder-image/repository/readme.txt"), b"").unwrap();
  config.original = fixture.temp.path().join("bare.zip");
  repatch_lib::archive::pack(&bare, &config.original).unwrap();

  let err = run(&config).unwrap_err();
  assert!(matches!(err, RunError::MissingRepositoryRoot(_)));
  assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn feature_pack_without_version_dir_fails() {
  let fixture = Fixture::new();
  fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  fs::create_dir_all(fixture.original_root.join("org/foo/bar/fp-empty")).unwrap();
  fs::write(fixture.original_root.join("org/foo/bar/fp-empty/maven-metadata.xml"), b"").unwrap();

  let config = fixture.config(&["org/foo/bar/fp-empty"]);
  assert!(matches!(run(&config), Err(RunError::NoVersionDir(_))));
}

#[test]
fn version_without_delimiter_fails() {
  let fixture = Fixture::new();
  let art = fixture.patched_artifact("org.foo.bar", "art1", "1.0", None, "jar");
  let fp = fixture.feature_pack("fp-prod1", "1.0.Final", &[&art]);

  let config = fixture.config(&[fp.to_str().unwrap()]);
  let err = run(&config).unwrap_err();

  assert!(matches!(err, RunError::Patch(PatchError::MissingDelimiter { .. })));
  assert!(!config.output.exists());
}

#[test]
fn missing_patch_input_fails() {
  let fixture = Fixture::new();
  let mut config = fixture.config(&[]);
  config.patch = fixture.temp.path().join("does-not-exist.zip");

  let err = run(&config).unwrap_err();
  assert!(matches!(&err, RunError::InputMissing(path) if path == &config.patch));
}

#[test]
fn missing_input_still_removes_previous_output() {
  let fixture = Fixture::new();
  let mut config = fixture.config(&[]);
  config.patch = fixture.temp.path().join("does-not-exist.zip");
  fs::create_dir_all(config.output.parent().unwrap()).unwrap();
  fs::write(&config.output, b"stale").unwrap();

  let err = run(&config).unwrap_err();

  assert_eq!(err.kind(), ErrorKind::Input);
  assert!(!config.output.exists());
}
