//! Blocking HTTP plumbing shared by every network node.

mod response;

use reqwest::{
    Method,
    blocking::{Client, RequestBuilder},
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tracing::debug;

use crate::{Result, runtime::RemixContext};

pub use response::{ApiResponse, check_response_status, parse_json};

/// Media type announcing version 1.0 of the service API.
pub const REMIX_VERSION_1_0: &str = "application/lightspeed.remix.service+json; version=1.0";

/// Headers sent with every request.
pub fn version_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(REMIX_VERSION_1_0));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(REMIX_VERSION_1_0));
    headers
}

/// Thin wrapper over a blocking reqwest client.
///
/// No retry and no timeout are applied: a transport failure is returned as is.
#[derive(Clone)]
pub struct RemixClient {
    http: Client,
}

impl RemixClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
        })
    }

    /// Starts a request for `path` (which must begin with `/`) on the service.
    pub fn request(
        &self,
        target: &RemixContext,
        method: Method,
        path: &str,
    ) -> RequestBuilder {
        let url = format!("{}{}", target.base_url(), path);
        debug!(%method, url = %url, "remix request");
        self.http.request(method, url).headers(version_headers())
    }

    /// Sends the request and reads the whole body. The status is not checked.
    pub fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse> {
        let response = request.send()?;
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(url = %url, status, "remix response");

        Ok(ApiResponse {
            url,
            status,
            body,
        })
    }
}
