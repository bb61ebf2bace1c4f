//! Descriptor model: immutable, validated values describing what to change.

mod coordinate;
mod property;
mod scope;

pub use coordinate::Coordinate;
pub use property::Property;
pub use scope::{ProfileMode, ProfileRef, Scope};

use std::fmt;

/// One declaration to merge into a POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Insert or update a dependency in the dependency list of `scope`.
    Dependency {
        /// Where the dependency list lives.
        scope: Scope,
        /// The declaration to merge.
        coordinate: Coordinate,
    },
    /// Set or remove a project property.
    Property(Property),
    /// Make sure a profile exists (created only in `UpdateOrAdd` mode).
    Profile(ProfileRef),
}

impl Change {
    /// A dependency in the project's own dependency list.
    pub fn dependency(coordinate: Coordinate) -> Self {
        Change::Dependency {
            scope: Scope::Root,
            coordinate,
        }
    }

    /// A dependency in the project's `<dependencyManagement>`.
    pub fn managed_dependency(coordinate: Coordinate) -> Self {
        Change::Dependency {
            scope: Scope::DependencyManagement(Box::new(Scope::Root)),
            coordinate,
        }
    }

    /// A dependency in an arbitrary scope.
    pub fn scoped_dependency(scope: Scope, coordinate: Coordinate) -> Self {
        Change::Dependency { scope, coordinate }
    }

    /// A property change.
    pub fn property(property: Property) -> Self {
        Change::Property(property)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Dependency { scope, coordinate } => {
                write!(f, "dependency {} in {}", coordinate, scope)
            }
            Change::Property(property) => write!(f, "property {}", property),
            Change::Profile(profile) => write!(f, "profile '{}'", profile.id()),
        }
    }
}
