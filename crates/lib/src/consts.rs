pub const APP_NAME: &str = "repatch";

/// Name of the directory that marks the root of a Maven repository inside an archive.
pub const REPO_MARKER_DIR: &str = "maven-repository";

/// Extensions of the files that count as artifacts (compiled libraries and native objects).
pub const ARTIFACT_EXTENSIONS: [&str; 2] = ["jar", "so"];

/// Extension of packaged feature-packs.
pub const PACKAGE_EXTENSION: &str = "zip";

/// Token inserted into a feature-pack version to form its patch version.
pub const PATCH_MARKER: &str = "-patch";

/// Substring of a feature-pack version before which [`PATCH_MARKER`] is inserted.
pub const VERSION_DELIMITER: &str = "-redhat-";

/// Descriptor file at the root of a feature-pack.
pub const DESCRIPTOR_FILE: &str = "feature-pack.xml";

/// Version map resource inside a feature-pack, relative to its root.
pub const VERSIONS_RESOURCE: [&str; 3] = ["resources", "wildfly", "artifact-versions.properties"];

/// Manifest listing the patches created by a run.
pub const MANIFEST_FILE: &str = "patches.xml";

/// Default scratch directory, relative to the current directory.
pub const DEFAULT_WORK_DIR: &str = "tool-work-dir";

/// Environment variable overriding the known feature-pack paths.
pub const PACKAGE_PATHS_ENV: &str = "REPATCH_PACKAGE_PATHS";

/// Feature-packs inspected when no override is configured.
pub const DEFAULT_PACKAGE_PATHS: [&str; 4] = [
  "org/wildfly/core/wildfly-core-galleon-pack",
  "org/jboss/eap/wildfly-servlet-galleon-pack",
  "org/jboss/eap/wildfly-ee-galleon-pack",
  "org/jboss/eap/wildfly-galleon-pack",
];
