//! Constants used throughout pom-editor.
//!
//! Element names follow the Maven POM 4.0.0 model.

/// Literal suffix appended to a target path to name its backup file.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Target file used when none is given.
pub const DEFAULT_POM_FILE: &str = "pom.xml";

/// Indentation used for inserted elements when none can be detected.
pub const DEFAULT_INDENT: &str = "    ";

pub const PROJECT: &str = "project";
pub const PROPERTIES: &str = "properties";
pub const DEPENDENCIES: &str = "dependencies";
pub const DEPENDENCY: &str = "dependency";
pub const DEPENDENCY_MANAGEMENT: &str = "dependencyManagement";
pub const PROFILES: &str = "profiles";
pub const PROFILE: &str = "profile";
pub const ID: &str = "id";

pub const GROUP_ID: &str = "groupId";
pub const ARTIFACT_ID: &str = "artifactId";
pub const VERSION: &str = "version";
pub const TYPE: &str = "type";
pub const CLASSIFIER: &str = "classifier";
pub const SCOPE: &str = "scope";
