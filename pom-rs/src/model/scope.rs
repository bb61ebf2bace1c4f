//! Document scopes: where in the POM a declaration lives.

use std::fmt;

use crate::error::{Error, Result};

/// Whether a missing profile may be created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProfileMode {
    /// Only touch a profile that already exists.
    #[default]
    Update,
    /// Create the profile when it is missing.
    UpdateOrAdd,
}

impl ProfileMode {
    /// Maps a "force add" flag onto a mode.
    pub fn from_add_flag(add: bool) -> Self {
        if add {
            ProfileMode::UpdateOrAdd
        } else {
            ProfileMode::Update
        }
    }

    pub fn should_add(self) -> bool {
        self == ProfileMode::UpdateOrAdd
    }
}

/// A profile, identified by its `<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileRef {
    id: String,
    mode: ProfileMode,
}

impl ProfileRef {
    /// Creates a profile reference, rejecting a blank id. The id is trimmed.
    pub fn new(id: impl Into<String>, mode: ProfileMode) -> Result<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(Error::validation("profile id must be provided"));
        }
        Ok(ProfileRef { id, mode })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> ProfileMode {
        self.mode
    }
}

/// A location in the document that hosts declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The `<project>` element itself.
    Root,
    /// A `<profiles>/<profile>` element.
    Profile(ProfileRef),
    /// The `<dependencyManagement>` block of the enclosing scope.
    DependencyManagement(Box<Scope>),
}

impl Scope {
    /// Scope of a profile.
    pub fn profile(id: impl Into<String>, mode: ProfileMode) -> Result<Self> {
        Ok(Scope::Profile(ProfileRef::new(id, mode)?))
    }

    /// The dependency-management block nested in this scope.
    ///
    /// Dependency-management blocks do not nest.
    pub fn managed(self) -> Result<Self> {
        if self.is_managed() {
            return Err(Error::validation(
                "dependencyManagement cannot be nested in dependencyManagement",
            ));
        }
        Ok(Scope::DependencyManagement(Box::new(self)))
    }

    /// Returns true for dependency-management scopes.
    pub fn is_managed(&self) -> bool {
        matches!(self, Scope::DependencyManagement(_))
    }

    /// Returns the profile this scope lives in, if any.
    pub fn profile_ref(&self) -> Option<&ProfileRef> {
        match self {
            Scope::Root => None,
            Scope::Profile(profile) => Some(profile),
            Scope::DependencyManagement(parent) => parent.profile_ref(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Root => write!(f, "project"),
            Scope::Profile(profile) => write!(f, "profile '{}'", profile.id),
            Scope::DependencyManagement(parent) => write!(f, "dependencyManagement of {}", parent),
        }
    }
}
