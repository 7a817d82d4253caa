pub mod email;
pub mod error;
pub mod form;
pub mod models;
pub mod paths;
pub mod search;
pub mod settings;
pub mod types;

pub use error::{AnetError, Result};
