pub mod executor;
pub mod models;
pub mod target;



pub use executor::CascadeExecutor;
pub use models::{CascadeReport, DestroyOptions};
pub use target::{Query, Target};
