//! Thin client for the GitHub REST endpoints used by the profile stats job
//!
//! - `index` issues the requests and decodes bodies
//! - `models` holds the response shapes
//! - `link` follows `Link: <...>; rel="next"` pagination

pub mod index;
pub mod link;
pub mod models;

pub use index::{GitHubClient, GitHubRequestError, DEFAULT_API_BASE_URL};
pub use link::next_page_url;
pub use models::*;
