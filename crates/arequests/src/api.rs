//! One-shot request functions
//!
//! Each call opens a transient [`Session`] with no defaults, sends exactly one
//! request and closes the session again, whether the request succeeded or not.
//! Nothing is shared between calls.

use crate::error::Result;
use crate::options::RequestOptions;
use crate::response::Response;
use crate::session::Session;

/// Send a single request on a transient session
pub async fn request(method: &str, url: &str, options: RequestOptions) -> Result<Response> {
    let session = Session::new()?;
    let result = session.request(method, url, options).await;
    session.close().await;
    result
}

/// Send a single GET request
pub async fn get(url: &str) -> Result<Response> {
    request("GET", url, RequestOptions::default()).await
}

/// Send a single GET request with options
pub async fn get_with(url: &str, options: RequestOptions) -> Result<Response> {
    request("GET", url, options).await
}

/// Send a single POST request
pub async fn post(url: &str, options: RequestOptions) -> Result<Response> {
    request("POST", url, options).await
}

pub async fn put(url: &str, options: RequestOptions) -> Result<Response> {
    request("PUT", url, options).await
}

pub async fn patch(url: &str, options: RequestOptions) -> Result<Response> {
    request("PATCH", url, options).await
}

pub async fn delete(url: &str, options: RequestOptions) -> Result<Response> {
    request("DELETE", url, options).await
}

pub async fn head(url: &str, options: RequestOptions) -> Result<Response> {
    request("HEAD", url, options).await
}

pub async fn options(url: &str, options: RequestOptions) -> Result<Response> {
    request("OPTIONS", url, options).await
}
