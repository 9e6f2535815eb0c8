pub mod handlers;
pub mod services;

pub use handlers::{media_routes, upload_routes};
