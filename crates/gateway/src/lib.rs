//! Typed HTTP client for the public Abitus missing-persons API.
//!
//! Wraps the four remote endpoints (filtered listing, detail by id,
//! aggregate statistics, multipart tip submission) using [`reqwest`],
//! maps wire records into the domain model, and exposes the
//! [`Directory`](directory::Directory) trait the controller layer is
//! written against.

pub mod api;
pub mod directory;
pub mod dto;
pub mod error;
pub mod params;

pub use api::AbitusApi;
pub use directory::Directory;
pub use error::GatewayError;
