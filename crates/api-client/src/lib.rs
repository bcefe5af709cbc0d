pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;

pub use auth::{AuthClient, LoginFlow, LoginState, LoginSuccess};
pub use catalog::{CatalogClient, CatalogLoader, CatalogState, FetchHandle};
pub use client::ApiClient;
pub use error::{CatalogError, LoginError};
pub use klife_api;
