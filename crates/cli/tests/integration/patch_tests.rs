//! End-to-end patch runs through the binary.

use predicates::prelude::*;

use repatch_lib::consts::{MANIFEST_FILE, PACKAGE_PATHS_ENV};
use repatch_lib::manifest::PatchManifest;

use super::common::{FP_PATH, TestEnv};

#[test]
fn patch_prints_summary() {
  let env = TestEnv::single_patch();

  env
    .repatch_cmd()
    .args(["--packages", FP_PATH])
    .assert()
    .success()
    .stdout(predicate::str::contains("Created patches:"))
    .stdout(predicate::str::contains(
      "patch org.foo.bar:fp-prod1:1.0-patch-redhat-00001 for fp-prod1-1.0-redhat-00001.zip",
    ))
    .stdout(predicate::str::contains(
      "org.foo.bar:art1:1.0::jar → org.foo.bar:art1:1.0.patch::jar",
    ))
    .stdout(predicate::str::contains("Added artifacts:"))
    .stdout(predicate::str::contains("org/foo/bar/art1/1.0.patch/*"))
    .stdout(predicate::str::contains("Deleted artifacts:"))
    .stdout(predicate::str::contains("org/foo/bar/art1/1.0/*"))
    .stdout(predicate::str::contains("Content of patches.xml:"))
    .stdout(predicate::str::contains("Patches created: 1"))
    .stdout(predicate::str::contains("Artifacts replaced: 1"))
    .stdout(predicate::str::contains("Duration:"))
    .stdout(predicate::str::contains("Archive size").not());

  let repo = env.unpack_output();
  let manifest = PatchManifest::read(&repo.join(MANIFEST_FILE)).unwrap();
  assert_eq!(manifest.patches.len(), 1);
  assert!(!repo.join("maven-repository/org/foo/bar/art1/1.0").exists());
  assert!(repo.join("maven-repository/org/foo/bar/art1/1.0.patch/art1-1.0.patch.jar").exists());
  assert!(repo.join("maven-repository/org/foo/bar/art2/2.0/art2-2.0.jar").exists());
  assert!(
    repo
      .join("maven-repository")
      .join(FP_PATH)
      .join("1.0-patch-redhat-00001/fp-prod1-1.0-patch-redhat-00001.zip")
      .exists()
  );
}

#[test]
fn packages_from_environment() {
  let env = TestEnv::single_patch();

  env
    .repatch_cmd()
    .env(PACKAGE_PATHS_ENV, format!(" {FP_PATH} ,"))
    .assert()
    .success();

  assert!(env.output_path().exists());
}

#[test]
fn default_work_dir_is_created_in_current_directory() {
  let env = TestEnv::single_patch();

  env.repatch_cmd().args(["--packages", FP_PATH]).assert().success();

  assert!(env.temp.path().join("tool-work-dir/maven-repo").is_dir());
}

#[test]
fn custom_work_dir() {
  let env = TestEnv::single_patch();

  env
    .repatch_cmd()
    .args(["--packages", FP_PATH, "--work-dir", "scratch"])
    .assert()
    .success();

  assert!(env.temp.path().join("scratch/repo-patch").is_dir());
  assert!(!env.temp.path().join("tool-work-dir").exists());
}

#[test]
fn json_output() {
  let env = TestEnv::single_patch();

  let assert = env
    .repatch_cmd()
    .args(["--packages", FP_PATH, "--output", "json"])
    .assert()
    .success();

  let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
  let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
  assert_eq!(summary["patches"][0]["id"], "org.foo.bar:fp-prod1:1.0-patch-redhat-00001");
  assert_eq!(summary["patches"][0]["source_archive"], "fp-prod1-1.0-redhat-00001.zip");
  assert_eq!(summary["deleted"]["dirs_removed"][0], "org/foo/bar/art1/1.0");
}

#[test]
fn default_packages_do_not_match_fails() {
  let env = TestEnv::single_patch();

  env
    .repatch_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("no patches produced"));

  assert!(!env.output_path().exists());
}

#[test]
fn unmatched_artifact_fails() {
  let env = TestEnv::single_patch();
  env.patch_file("org/other/stray/3.0/stray-3.0.jar");
  env.zip_inputs();

  env
    .repatch_cmd()
    .args(["--packages", FP_PATH])
    .assert()
    .failure()
    .stderr(predicate::str::contains("reconciliation incomplete"))
    .stderr(predicate::str::contains("org.other:stray"));

  assert!(!env.output_path().exists());
}

#[test]
fn empty_patch_fails() {
  let env = TestEnv::empty();
  env.original_file("org/foo/bar/art1/1.0/art1-1.0.jar");
  env.feature_pack(&[("org.foo.bar:art1", "org.foo.bar:art1:1.0::jar")]);
  env.zip_inputs();

  env
    .repatch_cmd()
    .args(["--packages", FP_PATH])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no artifacts found in the repository patch"));
}

#[test]
fn stale_output_is_removed_on_failure() {
  let env = TestEnv::empty();
  env.zip_inputs();
  std::fs::write(env.output_path(), b"stale").unwrap();

  env.repatch_cmd().assert().failure();

  assert!(!env.output_path().exists());
}
