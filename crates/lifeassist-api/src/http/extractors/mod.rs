//! Custom axum extractors.

pub mod lenient;
