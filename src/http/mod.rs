//! # HTTP interface
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /user` - Create, responds 201 with the stored record
//! - `GET /user` - List all users
//! - `GET /user/:id` - Fetch one user
//! - `PUT /user` - Replace both names, 404 when the id does not exist
//! - `PATCH /user` - Partial update, 404 when the id does not exist
//! - `DELETE /user/:id` - Idempotent delete, 204

pub mod routes;
pub mod server;

pub use routes::{ApiError, UserState, status_for};
pub use server::HttpServer;
