//! Dependency merge rule.
//!
//! A dependency is matched by `groupId` + `artifactId`. Every matching
//! declaration in the list is updated; when there is none, a new one is
//! inserted in front of the first declaration it sorts before.

use std::cmp::Ordering;

use tracing::debug;

use super::{EditLog, MergeOutcome};
use crate::constants::{ARTIFACT_ID, CLASSIFIER, DEPENDENCY, GROUP_ID, SCOPE, TYPE, VERSION};
use crate::model::{Coordinate, Scope};
use crate::resolver::resolve_dependencies;
use crate::xml::{XmlElement, XmlFormat};

/// Sort key of a dependency declaration, as read from the document or
/// built from a [`Coordinate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyKey {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
}

impl DependencyKey {
    /// Reads the key of a `<dependency>` element.
    pub fn from_element(element: &XmlElement) -> Self {
        let text = |name: &str| element.child_text(name).filter(|t| !t.is_empty());
        DependencyKey {
            group_id: text(GROUP_ID).unwrap_or_default(),
            artifact_id: text(ARTIFACT_ID).unwrap_or_default(),
            version: text(VERSION),
            packaging: text(TYPE),
            classifier: text(CLASSIFIER),
            scope: text(SCOPE),
        }
    }

    pub fn from_coordinate(coordinate: &Coordinate) -> Self {
        let owned = |value: Option<&str>| value.map(str::to_string);
        DependencyKey {
            group_id: coordinate.group_id().to_string(),
            artifact_id: coordinate.artifact_id().to_string(),
            version: owned(coordinate.version()),
            packaging: owned(coordinate.packaging()),
            classifier: owned(coordinate.classifier()),
            scope: owned(coordinate.scope()),
        }
    }
}

/// Orders dependencies by scope, then type, then the remaining fields.
///
/// Scopes rank `compile` (or unset), `provided`, `system`, `runtime`,
/// `test`, `import`, then any other scope alphabetically. Types rank `jar`
/// (or unset) first, then alphabetically.
pub fn scope_and_type_first(a: &DependencyKey, b: &DependencyKey) -> Ordering {
    scope_rank(a.scope.as_deref())
        .cmp(&scope_rank(b.scope.as_deref()))
        .then_with(|| type_rank(a.packaging.as_deref()).cmp(&type_rank(b.packaging.as_deref())))
        .then_with(|| a.group_id.cmp(&b.group_id))
        .then_with(|| a.artifact_id.cmp(&b.artifact_id))
        .then_with(|| a.version.cmp(&b.version))
        .then_with(|| a.classifier.cmp(&b.classifier))
}

fn scope_rank(scope: Option<&str>) -> (u8, &str) {
    match scope {
        None | Some("compile") => (0, ""),
        Some("provided") => (1, ""),
        Some("system") => (2, ""),
        Some("runtime") => (3, ""),
        Some("test") => (4, ""),
        Some("import") => (5, ""),
        Some(other) => (6, other),
    }
}

fn type_rank(packaging: Option<&str>) -> (u8, &str) {
    match packaging {
        None | Some("jar") => (0, ""),
        Some(other) => (1, other),
    }
}

/// Merges `coordinate` into the dependency list of `scope`.
pub fn merge_dependency(
    project: &mut XmlElement,
    scope: &Scope,
    coordinate: &Coordinate,
    format: &XmlFormat,
    log: &mut EditLog,
) -> MergeOutcome {
    let Some(list) = resolve_dependencies(project, scope, format, log) else {
        debug!(%scope, "scope absent, dependency not merged");
        return MergeOutcome::ScopeAbsent;
    };

    let matches: Vec<usize> = list
        .element
        .child_elements()
        .filter(|e| e.name() == DEPENDENCY)
        .enumerate()
        .filter(|(_, dep)| {
            dep.child_text(GROUP_ID).as_deref() == Some(coordinate.group_id())
                && dep.child_text(ARTIFACT_ID).as_deref() == Some(coordinate.artifact_id())
        })
        .map(|(i, _)| i)
        .collect();

    if matches.is_empty() {
        insert_dependency(list.element, &list.path, coordinate, format, log);
        return MergeOutcome::Inserted;
    }

    let mut changed = false;
    for &ordinal in &matches {
        let path = format!("{}/{}[{}]", list.path, DEPENDENCY, ordinal);
        let Some(dependency) = list
            .element
            .child_elements_mut()
            .filter(|e| e.name() == DEPENDENCY)
            .nth(ordinal)
        else {
            continue;
        };
        changed |= update_attributes(dependency, &path, coordinate, format, log);
    }

    if changed {
        MergeOutcome::Updated {
            matches: matches.len(),
        }
    } else {
        MergeOutcome::Unchanged
    }
}

/// Applies each requested attribute to an existing declaration. Unset
/// attributes are left alone.
fn update_attributes(
    dependency: &mut XmlElement,
    path: &str,
    coordinate: &Coordinate,
    format: &XmlFormat,
    log: &mut EditLog,
) -> bool {
    let mut changed = false;
    for (name, value) in coordinate.attributes() {
        let Some(value) = value else { continue };
        let child_path = format!("{}/{}", path, name);
        match dependency.find_child_mut(name) {
            Some(child) => {
                if child.set_text(value) {
                    log.update(child_path);
                    changed = true;
                }
            }
            None => {
                dependency.add_text_element(name, value, format);
                log.insert(child_path);
                changed = true;
            }
        }
    }
    changed
}

fn insert_dependency(
    list: &mut XmlElement,
    list_path: &str,
    coordinate: &Coordinate,
    format: &XmlFormat,
    log: &mut EditLog,
) {
    let key = DependencyKey::from_coordinate(coordinate);

    // Position counts every child element, ordinal only the declarations.
    let mut position = None;
    let mut ordinal = 0;
    for (index, element) in list.child_elements().enumerate() {
        if element.name() != DEPENDENCY {
            continue;
        }
        let existing = DependencyKey::from_element(element);
        if scope_and_type_first(&key, &existing) == Ordering::Less {
            position = Some(index);
            break;
        }
        ordinal += 1;
    }

    let dependency = match position {
        Some(index) => list.insert_child_element(index, DEPENDENCY, format),
        None => list.add_child_element(DEPENDENCY, format),
    };
    dependency.add_text_element(GROUP_ID, coordinate.group_id(), format);
    dependency.add_text_element(ARTIFACT_ID, coordinate.artifact_id(), format);
    for (name, value) in coordinate.attributes() {
        if let Some(value) = value {
            dependency.add_text_element(name, value, format);
        }
    }

    log.insert(format!("{}/{}[{}]", list_path, DEPENDENCY, ordinal));
    debug!(dependency = %coordinate, "dependency inserted");
}
