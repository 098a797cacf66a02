pub mod dialect;
pub mod render;

pub use dialect::Dialect;
pub use render::{Statement, explain_delete, explain_destroy, render_delete, render_destroy};
