pub mod builder;
pub mod descriptor;
pub mod filter;
pub mod parent;
pub mod value;

pub use builder::PlanBuilder;
pub use descriptor::{DeleteDescriptor, DeletePlan};
pub use filter::{Condition, Filter, RowSet, Select};
pub use parent::{ParentRef, resolve_parent_value};
pub use value::Value;
