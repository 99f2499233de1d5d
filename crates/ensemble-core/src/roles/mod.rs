//! Role definitions, the static catalog, and per-room role assignments

pub mod assignment;
pub mod catalog;

pub use assignment::{AssignmentMap, RoleAssignment};
pub use catalog::{CATALOG, Role, RoleCatalog, RoleCategory};
