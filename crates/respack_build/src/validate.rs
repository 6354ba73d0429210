//! Naming conflict detection.

use std::collections::HashMap;

use crate::error::{BuildError, NameConflict};
use crate::object::BuildObject;

/// Checks that every final object name is unique.
///
/// On failure returns a single error listing every contested name, in order
/// of first appearance, with all declaration files that produced it.
pub fn detect_naming_conflicts(objects: &[BuildObject]) -> Result<(), BuildError> {
    let mut groups: Vec<NameConflict> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(objects.len());

    for object in objects {
        match index.get(object.name.as_str()) {
            Some(&i) => groups[i].origins.push(object.declaration_origin.clone()),
            None => {
                index.insert(&object.name, groups.len());
                groups.push(NameConflict {
                    name: object.name.clone(),
                    origins: vec![object.declaration_origin.clone()],
                });
            }
        }
    }

    let conflicts: Vec<NameConflict> = groups
        .into_iter()
        .filter(|group| group.origins.len() > 1)
        .collect();
    if conflicts.is_empty() {
        log::info!("no naming conflicts detected");
        Ok(())
    } else {
        Err(BuildError::NamingConflict { conflicts })
    }
}
