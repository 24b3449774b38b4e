//! HTTP surface: router construction and health endpoint

mod routes;

pub use routes::build_router;
