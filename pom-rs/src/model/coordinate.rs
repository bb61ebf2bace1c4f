//! Dependency coordinates.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::constants::{CLASSIFIER, SCOPE, TYPE, VERSION};
use crate::error::{Error, Result};

/// A dependency declaration: identity plus optional attributes.
///
/// Identity is `groupId` + `artifactId`; equality and hashing look at
/// nothing else. Each attribute left as `None` means "leave whatever the
/// document has".
#[derive(Debug, Clone)]
pub struct Coordinate {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
    packaging: Option<String>,
    classifier: Option<String>,
    scope: Option<String>,
}

impl Coordinate {
    /// Creates a coordinate, rejecting a blank group or artifact.
    ///
    /// Both are trimmed, since documents are matched on trimmed text.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Result<Self> {
        let group_id = group_id.into().trim().to_string();
        let artifact_id = artifact_id.into().trim().to_string();
        if group_id.is_empty() {
            return Err(Error::validation("groupId must be provided"));
        }
        if artifact_id.is_empty() {
            return Err(Error::validation("artifactId must be provided"));
        }
        Ok(Coordinate {
            group_id,
            artifact_id,
            version: None,
            packaging: None,
            classifier: None,
            scope: None,
        })
    }

    /// Parses `groupId:artifactId[:version]`.
    ///
    /// Segments are trimmed and blank ones skipped, so `"g: :a"` names
    /// `g:a`. Segments past the third are ignored.
    pub fn parse_gav(gav: &str) -> Result<Self> {
        let mut segments = gav.split(':').map(str::trim).filter(|s| !s.is_empty());
        let group_id = segments.next().unwrap_or_default();
        let artifact_id = segments.next().unwrap_or_default();
        let version = segments.next().map(str::to_string);
        Ok(Coordinate::new(group_id, artifact_id)?.with_version(version))
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = non_blank(version);
        self
    }

    pub fn with_type(mut self, packaging: Option<String>) -> Self {
        self.packaging = non_blank(packaging);
        self
    }

    pub fn with_classifier(mut self, classifier: Option<String>) -> Self {
        self.classifier = non_blank(classifier);
        self
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = non_blank(scope);
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The `type` attribute (packaging of the dependency).
    pub fn packaging(&self) -> Option<&str> {
        self.packaging.as_deref()
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns true when `group_id:artifact_id` is this coordinate's identity.
    pub fn same_identity(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }

    /// Attribute element names paired with their requested values, in
    /// document order.
    pub fn attributes(&self) -> [(&'static str, Option<&str>); 4] {
        [
            (VERSION, self.version()),
            (TYPE, self.packaging()),
            (CLASSIFIER, self.classifier()),
            (SCOPE, self.scope()),
        ]
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(&other.group_id, &other.artifact_id)
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.artifact_id.hash(state);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{groupId='{}', artifactId='{}'",
            self.group_id, self.artifact_id
        )?;
        for (name, value) in self.attributes() {
            if let Some(value) = value {
                write!(f, ", {}='{}'", name, value)?;
            }
        }
        write!(f, "}}")
    }
}
