pub mod api;
pub mod error;
pub mod format;
pub mod models;
pub mod settings;
pub mod store;
pub mod sync;
pub mod tui;

pub use api::ApiClient;
pub use error::ApiError;
