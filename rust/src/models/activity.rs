//! The activity tree node.

use pyo3::prelude::*;

use super::resource::{Asset, HumanResource, MaterialResource, Resource};

/// A node of the project tree.
///
/// An activity is composed of its sub-activities: it can only start once all
/// of them have finished. Children are owned by their parent; `parent_id` and
/// `next` are trace links back to the parent and carry no ownership.
///
/// `Clone` shares supplier associations with the source. Use
/// [`crate::scenario::clone_activity`] for a copy that shares nothing.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct Activity {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub description: String,
    /// Duration in minutes.
    #[pyo3(get, set)]
    pub duration: i64,
    /// Shortest duration reachable by crashing, in minutes.
    #[pyo3(get, set)]
    pub min_duration: i64,
    /// Cost per minute saved when crashing this activity.
    #[pyo3(get, set)]
    pub crash_cost_step: f64,
    #[pyo3(get, set)]
    pub human_resources: Vec<HumanResource>,
    #[pyo3(get, set)]
    pub material_resources: Vec<MaterialResource>,
    #[pyo3(get, set)]
    pub assets: Vec<Asset>,
    #[pyo3(get, set)]
    pub sub_activities: Vec<Activity>,
    /// IDs of the activities this one was attached to.
    #[pyo3(get, set)]
    pub next: Vec<String>,
    #[pyo3(get, set)]
    pub parent_id: Option<String>,

    // Written by the CPM engine.
    #[pyo3(get)]
    pub es: i64,
    #[pyo3(get)]
    pub ef: i64,
    #[pyo3(get)]
    pub ls: i64,
    #[pyo3(get)]
    pub lf: i64,
    #[pyo3(get)]
    pub slack: i64,
}

impl Activity {
    /// Create an activity that cannot be crashed (`min_duration == duration`).
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            min_duration: duration,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Allow crashing down to `min_duration` at `crash_cost_step` per minute.
    pub fn with_crash(mut self, min_duration: i64, crash_cost_step: f64) -> Self {
        self.min_duration = min_duration;
        self.crash_cost_step = crash_cost_step;
        self
    }

    pub fn with_human(mut self, resource: HumanResource) -> Self {
        self.human_resources.push(resource);
        self
    }

    pub fn with_material(mut self, resource: MaterialResource) -> Self {
        self.material_resources.push(resource);
        self
    }

    pub fn with_asset(mut self, resource: Asset) -> Self {
        self.assets.push(resource);
        self
    }

    pub fn with_sub_activity(mut self, child: Activity) -> Self {
        self.add_sub_activity(child);
        self
    }

    /// Attach a child, recording this activity as its parent.
    pub fn add_sub_activity(&mut self, mut child: Activity) {
        child.parent_id = Some(self.id.clone());
        if !child.next.contains(&self.id) {
            child.next.push(self.id.clone());
        }
        self.sub_activities.push(child);
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.sub_activities.is_empty()
    }

    /// Zero slack. Only meaningful after CPM has run.
    #[inline]
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }

    /// Minutes that crashing could remove from this activity.
    #[inline]
    pub fn crashable_minutes(&self) -> i64 {
        (self.duration - self.min_duration).max(0)
    }

    /// Find an activity by ID in this subtree (pre-order).
    pub fn find(&self, id: &str) -> Option<&Activity> {
        if self.id == id {
            return Some(self);
        }
        self.sub_activities.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Activity> {
        if self.id == id {
            return Some(self);
        }
        self.sub_activities
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// This activity's own resources: humans, then materials, then assets.
    pub fn resources(&self) -> impl Iterator<Item = &dyn Resource> + '_ {
        self.human_resources
            .iter()
            .map(|r| r as &dyn Resource)
            .chain(self.material_resources.iter().map(|r| r as &dyn Resource))
            .chain(self.assets.iter().map(|r| r as &dyn Resource))
    }

    pub fn resources_mut(&mut self) -> impl Iterator<Item = &mut dyn Resource> + '_ {
        self.human_resources
            .iter_mut()
            .map(|r| r as &mut dyn Resource)
            .chain(
                self.material_resources
                    .iter_mut()
                    .map(|r| r as &mut dyn Resource),
            )
            .chain(self.assets.iter_mut().map(|r| r as &mut dyn Resource))
    }

    pub fn resource_count(&self) -> usize {
        self.human_resources.len() + self.material_resources.len() + self.assets.len()
    }
}

#[pymethods]
impl Activity {
    #[new]
    #[pyo3(signature = (id, name, duration, min_duration=None, crash_cost_step=0.0, description=String::new()))]
    fn py_new(
        id: String,
        name: String,
        duration: i64,
        min_duration: Option<i64>,
        crash_cost_step: f64,
        description: String,
    ) -> Self {
        let activity = Self::new(id, name, duration).with_description(description);
        let floor = min_duration.unwrap_or(activity.min_duration);
        activity.with_crash(floor, crash_cost_step)
    }

    #[pyo3(name = "add_sub_activity")]
    fn py_add_sub_activity(&mut self, child: Activity) {
        self.add_sub_activity(child);
    }

    #[pyo3(name = "is_critical")]
    fn py_is_critical(&self) -> bool {
        self.is_critical()
    }

    fn __repr__(&self) -> String {
        format!(
            "Activity(id={:?}, name={:?}, duration={}, children={}, resources={})",
            self.id,
            self.name,
            self.duration,
            self.sub_activities.len(),
            self.resource_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_activity_is_not_crashable() {
        let a = Activity::new("1", "dig", 30);
        assert_eq!(a.min_duration, 30);
        assert_eq!(a.crashable_minutes(), 0);
        assert!(a.is_leaf());
    }

    #[test]
    fn test_add_sub_activity_records_parent() {
        let root = Activity::new("1", "house", 10)
            .with_sub_activity(Activity::new("2", "walls", 20))
            .with_sub_activity(Activity::new("3", "roof", 5));

        assert_eq!(root.sub_activities.len(), 2);
        for child in &root.sub_activities {
            assert_eq!(child.parent_id.as_deref(), Some("1"));
            assert_eq!(child.next, vec!["1".to_string()]);
        }
        assert!(root.parent_id.is_none());
    }

    #[test]
    fn test_find_descends_tree() {
        let mut root = Activity::new("1", "house", 10).with_sub_activity(
            Activity::new("2", "walls", 20).with_sub_activity(Activity::new("3", "bricks", 5)),
        );

        assert_eq!(root.find("3").map(|a| a.name.as_str()), Some("bricks"));
        assert!(root.find("9").is_none());

        root.find_mut("3").unwrap().duration = 7;
        assert_eq!(root.find("3").unwrap().duration, 7);
    }

    #[test]
    fn test_resources_iterate_in_kind_order() {
        let a = Activity::new("1", "pour", 60)
            .with_asset(Asset::new("mixer", 50.0, 1.0).unwrap())
            .with_material(MaterialResource::new("cement", 8.0, 10.0).unwrap())
            .with_human(HumanResource::new("mason", 30.0, 2.0).unwrap());

        let labels: Vec<&str> = a.resources().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["mason", "cement", "mixer"]);
        assert_eq!(a.resource_count(), 3);
    }
}
