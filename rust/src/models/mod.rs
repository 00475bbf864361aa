//! Core data types: the activity tree, its resources and their suppliers.

mod activity;
mod resource;
mod supplier;

pub use activity::Activity;
pub use resource::{Asset, HumanResource, MaterialResource, Resource, ResourceKind};
pub use supplier::{period_minutes, Period, Supplier, SupplierDirectory};
