//! Tree traversal primitives and tree-wide resource iteration.

use crate::models::{Activity, Resource};

/// Visit every activity in pre-order: the node itself, then its children
/// left to right.
pub fn walk<'a, F>(root: &'a Activity, mut visit: F)
where
    F: FnMut(&'a Activity),
{
    fn go<'a, F: FnMut(&'a Activity)>(node: &'a Activity, visit: &mut F) {
        visit(node);
        for child in &node.sub_activities {
            go(child, visit);
        }
    }
    go(root, &mut visit);
}

/// Pre-order traversal with mutable access to each node.
///
/// The callback runs before the node's children are visited, so changes it
/// makes to `sub_activities` affect which children are walked.
pub fn walk_mut<F>(root: &mut Activity, mut visit: F)
where
    F: FnMut(&mut Activity),
{
    fn go<F: FnMut(&mut Activity)>(node: &mut Activity, visit: &mut F) {
        visit(node);
        for child in &mut node.sub_activities {
            go(child, visit);
        }
    }
    go(root, &mut visit);
}

/// Total number of activities in the tree.
pub fn count_activities(root: &Activity) -> usize {
    1 + root
        .sub_activities
        .iter()
        .map(count_activities)
        .sum::<usize>()
}

/// Visit every resource in the tree together with the activity that owns it,
/// activities in pre-order.
pub fn for_each_resource<'a, F>(root: &'a Activity, mut visit: F)
where
    F: FnMut(&'a Activity, &'a dyn Resource),
{
    walk(root, |activity| {
        for resource in activity.resources() {
            visit(activity, resource);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, HumanResource, MaterialResource};

    fn sample_tree() -> Activity {
        Activity::new("1", "root", 1)
            .with_human(HumanResource::new("pm", 60.0, 1.0).unwrap())
            .with_sub_activity(
                Activity::new("2", "left", 2)
                    .with_material(MaterialResource::new("sand", 1.0, 3.0).unwrap())
                    .with_sub_activity(Activity::new("4", "left-leaf", 4)),
            )
            .with_sub_activity(
                Activity::new("3", "right", 3).with_asset(Asset::new("truck", 9.0, 1.0).unwrap()),
            )
    }

    #[test]
    fn test_walk_is_pre_order() {
        let root = sample_tree();
        let mut seen = Vec::new();
        walk(&root, |a| seen.push(a.id.clone()));
        assert_eq!(seen, vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn test_walk_mut_reaches_every_node() {
        let mut root = sample_tree();
        walk_mut(&mut root, |a| a.duration *= 10);
        let mut durations = Vec::new();
        walk(&root, |a| durations.push(a.duration));
        assert_eq!(durations, vec![10, 20, 40, 30]);
    }

    #[test]
    fn test_count_activities() {
        assert_eq!(count_activities(&sample_tree()), 4);
        assert_eq!(count_activities(&Activity::new("x", "solo", 0)), 1);
    }

    #[test]
    fn test_for_each_resource_pairs_owner() {
        let root = sample_tree();
        let mut pairs = Vec::new();
        for_each_resource(&root, |activity, resource| {
            pairs.push((activity.id.clone(), resource.label().to_string()));
        });
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "pm".to_string()),
                ("2".to_string(), "sand".to_string()),
                ("3".to_string(), "truck".to_string()),
            ]
        );
    }
}
