//! Alias-free deep copies of activity trees.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::models::{Activity, Supplier};
use crate::tree::walk_mut;

/// Deep-copy a (sub)tree, including its suppliers.
///
/// Nothing in the copy is shared with the source, so either can be edited or
/// analysed on another thread without affecting the other. A supplier shared
/// by several resources of the source is shared by the same resources of the
/// copy, through one new instance.
pub fn clone_activity(root: &Activity) -> Activity {
    let mut copy = root.clone();
    let mut fresh: FxHashMap<*const Supplier, Arc<Supplier>> = FxHashMap::default();

    walk_mut(&mut copy, |activity| {
        for resource in activity.resources_mut() {
            if let Some(shared) = resource.supplier_mut() {
                let replacement = fresh
                    .entry(Arc::as_ptr(shared))
                    .or_insert_with(|| Arc::new(Supplier::clone(shared)));
                *shared = Arc::clone(replacement);
            }
        }
    });

    copy
}
