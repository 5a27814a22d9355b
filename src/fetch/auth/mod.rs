//! [`HttpClient`](super::HttpClient) wrappers that attach store credentials.

mod api_key;
mod url_param;

pub use api_key::ApiKey;
pub use url_param::UrlParam;
