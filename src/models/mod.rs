pub mod filter;
pub mod stats;
pub mod task;
pub mod validation;

pub use filter::*;
pub use stats::*;
pub use task::*;
pub use validation::{FormErrors, FormField};
