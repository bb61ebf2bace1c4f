//! Scope resolution.
//!
//! Maps a [`Scope`] onto the element that hosts its declarations, creating
//! containers on the way where that is allowed. A missing profile is only
//! created in [`ProfileMode::UpdateOrAdd`](crate::model::ProfileMode); in
//! every other case resolution simply finds nothing.

use tracing::debug;

use crate::constants::{DEPENDENCIES, DEPENDENCY_MANAGEMENT, ID, PROFILE, PROFILES};
use crate::merge::EditLog;
use crate::model::{ProfileRef, Scope};
use crate::xml::{XmlElement, XmlFormat};

/// An element resolved for a scope, with its path for the edit log.
#[derive(Debug)]
pub struct ResolvedScope<'a> {
    pub element: &'a mut XmlElement,
    pub path: String,
}

/// Resolves `scope` inside `project`.
///
/// Returns `None` when the scope names a profile that does not exist and
/// may not be added. Containers created along the way are recorded in `log`.
pub fn resolve<'a>(
    project: &'a mut XmlElement,
    scope: &Scope,
    format: &XmlFormat,
    log: &mut EditLog,
) -> Option<ResolvedScope<'a>> {
    match scope {
        Scope::Root => {
            let path = format!("/{}", project.name());
            Some(ResolvedScope {
                element: project,
                path,
            })
        }
        Scope::Profile(profile) => resolve_profile(project, profile, format, log),
        Scope::DependencyManagement(parent) => {
            let parent = resolve(project, parent, format, log)?;
            let path = format!("{}/{}", parent.path, DEPENDENCY_MANAGEMENT);
            let element = get_or_add(parent.element, DEPENDENCY_MANAGEMENT, &path, format, log);
            Some(ResolvedScope { element, path })
        }
    }
}

/// Resolves the dependency list of `scope`, creating `<dependencies>` when
/// the scope exists but has none.
pub fn resolve_dependencies<'a>(
    project: &'a mut XmlElement,
    scope: &Scope,
    format: &XmlFormat,
    log: &mut EditLog,
) -> Option<ResolvedScope<'a>> {
    let host = resolve(project, scope, format, log)?;
    let path = format!("{}/{}", host.path, DEPENDENCIES);
    let element = get_or_add(host.element, DEPENDENCIES, &path, format, log);
    Some(ResolvedScope { element, path })
}

/// Position of the profile with `id` among the `<profile>` children of
/// `<profiles>`.
pub fn find_profile(project: &XmlElement, id: &str) -> Option<usize> {
    project
        .find_child(PROFILES)?
        .child_elements()
        .filter(|e| e.name() == PROFILE)
        .position(|p| p.child_text(ID).as_deref() == Some(id))
}

fn resolve_profile<'a>(
    project: &'a mut XmlElement,
    profile: &ProfileRef,
    format: &XmlFormat,
    log: &mut EditLog,
) -> Option<ResolvedScope<'a>> {
    let profiles_path = format!("/{}/{}", project.name(), PROFILES);

    if let Some(position) = find_profile(project, profile.id()) {
        let element = project
            .find_child_mut(PROFILES)?
            .child_elements_mut()
            .filter(|e| e.name() == PROFILE)
            .nth(position)?;
        return Some(ResolvedScope {
            element,
            path: format!("{}/{}[{}]", profiles_path, PROFILE, position),
        });
    }

    if !profile.mode().should_add() {
        debug!(profile = profile.id(), "profile not found, nothing to update");
        return None;
    }

    let profiles = get_or_add(project, PROFILES, &profiles_path, format, log);
    let position = profiles
        .child_elements()
        .filter(|e| e.name() == PROFILE)
        .count();
    let path = format!("{}/{}[{}]", profiles_path, PROFILE, position);
    let element = profiles.add_child_element(PROFILE, format);
    element.add_text_element(ID, profile.id(), format);
    log.insert(path.as_str());
    debug!(profile = profile.id(), "profile added");
    Some(ResolvedScope { element, path })
}

/// Returns the child `name` of `parent`, appending and logging it when
/// missing.
pub(crate) fn get_or_add<'a>(
    parent: &'a mut XmlElement,
    name: &str,
    path: &str,
    format: &XmlFormat,
    log: &mut EditLog,
) -> &'a mut XmlElement {
    if parent.find_child(name).is_none() {
        log.insert(path);
    }
    parent.get_or_add_child(name, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProfileMode;
    use crate::xml::{parse_str, print_to_string};

    const POM: &str = "<project>\n    <profiles>\n        <profile>\n            <id>ci</id>\n        </profile>\n    </profiles>\n</project>\n";

    #[test]
    fn test_root_resolves_to_project() {
        let mut doc = parse_str(POM).unwrap();
        let format = doc.format().clone();
        let mut log = EditLog::new();
        let resolved = resolve(doc.root_mut(), &Scope::Root, &format, &mut log).unwrap();
        assert_eq!(resolved.element.name(), "project");
        assert_eq!(resolved.path, "/project");
        assert!(log.is_empty());
    }

    #[test]
    fn test_existing_profile_is_found() {
        let mut doc = parse_str(POM).unwrap();
        let format = doc.format().clone();
        let mut log = EditLog::new();
        let scope = Scope::profile("ci", ProfileMode::Update).unwrap();
        let resolved = resolve(doc.root_mut(), &scope, &format, &mut log).unwrap();
        assert_eq!(resolved.element.child_text(ID).as_deref(), Some("ci"));
        assert_eq!(resolved.path, "/project/profiles/profile[0]");
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_profile_in_update_mode_is_absent() {
        let mut doc = parse_str(POM).unwrap();
        let format = doc.format().clone();
        let mut log = EditLog::new();
        let scope = Scope::profile("release", ProfileMode::Update)
            .unwrap()
            .managed()
            .unwrap();
        assert!(resolve(doc.root_mut(), &scope, &format, &mut log).is_none());
        assert_eq!(print_to_string(&doc), POM);
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_profile_is_added_on_request() {
        let mut doc = parse_str(POM).unwrap();
        let format = doc.format().clone();
        let mut log = EditLog::new();
        let scope = Scope::profile("release", ProfileMode::UpdateOrAdd).unwrap();
        let resolved = resolve(doc.root_mut(), &scope, &format, &mut log).unwrap();
        assert_eq!(resolved.path, "/project/profiles/profile[1]");
        assert_eq!(log.edit_count(), 1);
        assert_eq!(
            print_to_string(&doc),
            "<project>\n    <profiles>\n        <profile>\n            <id>ci</id>\n        </profile>\n        <profile>\n            <id>release</id>\n        </profile>\n    </profiles>\n</project>\n"
        );
    }

    #[test]
    fn test_profiles_container_is_created() {
        let mut doc = parse_str("<project>\n  <modelVersion>4.0.0</modelVersion>\n</project>").unwrap();
        let format = doc.format().clone();
        let mut log = EditLog::new();
        let scope = Scope::profile("ci", ProfileMode::UpdateOrAdd).unwrap();
        resolve(doc.root_mut(), &scope, &format, &mut log).unwrap();
        assert_eq!(log.edit_count(), 2);
        assert_eq!(find_profile(doc.root(), "ci"), Some(0));
    }

    #[test]
    fn test_dependency_management_is_get_or_create() {
        let mut doc = parse_str("<project>\n  <dependencyManagement/>\n</project>").unwrap();
        let format = doc.format().clone();
        let mut log = EditLog::new();
        let scope = Scope::Root.managed().unwrap();
        let resolved = resolve_dependencies(doc.root_mut(), &scope, &format, &mut log).unwrap();
        assert_eq!(resolved.path, "/project/dependencyManagement/dependencies");
        assert_eq!(log.edit_count(), 1);
        assert_eq!(
            print_to_string(&doc),
            "<project>\n  <dependencyManagement>\n    <dependencies></dependencies>\n  </dependencyManagement>\n</project>"
        );
    }

    #[test]
    fn test_profile_lookup_uses_trimmed_id() {
        let doc = parse_str("<project><profiles><profile><id> ci </id></profile></profiles></project>").unwrap();
        assert_eq!(find_profile(doc.root(), "ci"), Some(0));
        assert_eq!(find_profile(doc.root(), "other"), None);
    }
}
