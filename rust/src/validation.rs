//! Structural and resource-level validation of an activity tree.
//!
//! The structural pass stops at the first problem, since a tree with shared
//! nodes or bad durations is not safe to analyse further. The resource pass
//! runs only on a structurally sound tree and reports every finding.

use rustc_hash::FxHashSet;

use crate::error::EngineError;
use crate::models::Activity;
use crate::tree::for_each_resource;

/// Validate the tree's structure, then every resource in it.
pub fn validate(root: &Activity) -> Result<(), EngineError> {
    let mut seen = FxHashSet::default();
    check_structure(root, &mut seen)?;
    validate_resources(root)
}

/// Pre-order structural check. A repeated ID means a node is reachable
/// twice, either shared between parents or its own ancestor.
fn check_structure<'a>(
    node: &'a Activity,
    seen: &mut FxHashSet<&'a str>,
) -> Result<(), EngineError> {
    if !seen.insert(node.id.as_str()) {
        return Err(EngineError::InvalidActivity(format!(
            "activity '{}' appears more than once (shared node or cycle)",
            node.id
        )));
    }
    check_durations(node)?;
    for child in &node.sub_activities {
        check_structure(child, seen)?;
    }
    Ok(())
}

fn check_durations(node: &Activity) -> Result<(), EngineError> {
    if node.duration < 0 {
        return Err(EngineError::InvalidActivity(format!(
            "activity '{}' has negative duration {}",
            node.id, node.duration
        )));
    }
    if node.min_duration < 0 {
        return Err(EngineError::InvalidActivity(format!(
            "activity '{}' has negative minimum duration {}",
            node.id, node.min_duration
        )));
    }
    if node.min_duration > node.duration {
        return Err(EngineError::InvalidActivity(format!(
            "activity '{}' has minimum duration {} above its duration {}",
            node.id, node.min_duration, node.duration
        )));
    }
    Ok(())
}

/// Validate every resource in the tree, collecting all findings.
pub fn validate_resources(root: &Activity) -> Result<(), EngineError> {
    let mut errors = Vec::new();
    for_each_resource(root, |_, resource| {
        if let Err(err) = resource.validate() {
            errors.extend(err.into_vec());
        }
    });
    EngineError::aggregate(errors)
}
