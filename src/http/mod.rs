//! HTTP surface
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | banner |
//! | GET | `/test` | store diagnostics |
//! | POST | `/api/uploads` | record an upload (multipart `client_id`, `file`) |
//! | GET | `/api/uploads/recent` | latest upload records |
//! | POST | `/api/ask` | assistant answer |
//! | POST | `/api/report` | store and relay a report |
//! | GET | `/api/progress/:client_id` | engagement progress |

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, HttpServer};
pub use state::AppState;
