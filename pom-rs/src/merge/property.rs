//! Property merge rule.

use tracing::debug;

use super::{EditLog, MergeOutcome};
use crate::constants::PROPERTIES;
use crate::model::Property;
use crate::resolver::get_or_add;
use crate::xml::{XmlElement, XmlFormat};

/// Sets or removes `property` under `<properties>`.
///
/// Setting creates the container when missing. Removing never creates
/// anything, and an emptied container stays in place.
pub fn merge_property(
    project: &mut XmlElement,
    property: &Property,
    format: &XmlFormat,
    log: &mut EditLog,
) -> MergeOutcome {
    let container_path = format!("/{}/{}", project.name(), PROPERTIES);
    let path = format!("{}/{}", container_path, property.name());

    let Some(value) = property.value() else {
        let removed = project
            .find_child_mut(PROPERTIES)
            .and_then(|properties| properties.remove_child_element(property.name()));
        return match removed {
            Some(_) => {
                log.delete(path);
                MergeOutcome::Removed
            }
            None => {
                debug!(property = property.name(), "property not declared, nothing to remove");
                MergeOutcome::Unchanged
            }
        };
    };

    let properties = get_or_add(project, PROPERTIES, &container_path, format, log);
    match properties.find_child_mut(property.name()) {
        Some(existing) => {
            if existing.set_text(value) {
                log.update(path);
                MergeOutcome::Updated { matches: 1 }
            } else {
                MergeOutcome::Unchanged
            }
        }
        None => {
            properties.add_text_element(property.name(), value, format);
            log.insert(path);
            MergeOutcome::Inserted
        }
    }
}
