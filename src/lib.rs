pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use session::Session;
