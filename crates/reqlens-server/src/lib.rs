//! Reqlens HTTP Server
//!
//! JSON API over the analysis and embedding pipelines.

mod error;
mod gate;
mod handlers;
mod routes;
mod server;
mod state;

pub use error::ApiError;
pub use gate::{AllowAll, RateLimitGate};
pub use routes::create_router;
pub use server::{serve, start_server};
pub use state::AppState;
