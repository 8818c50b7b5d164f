//! Client side of the remote link API.
//!
//! [`LinkApi`] is the collaborator contract the bulk admin workflows and the
//! resolver cache are written against. [`HttpLinkApi`] implements it over
//! JSON/HTTP with [`reqwest`].

pub mod api;
pub mod error;
pub mod http;

pub use api::LinkApi;
pub use error::ApiError;
pub use http::HttpLinkApi;
