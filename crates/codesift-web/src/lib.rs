//! Codesift Web - HTTP service
//!
//! Serves content search, typeahead, open-in-editor and reindex requests
//! over JSON.

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{create_router, run_server};
pub use state::AppState;
