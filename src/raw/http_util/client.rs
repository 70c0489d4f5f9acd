// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::future::Future;
use std::mem;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::LazyLock;

use bytes::Bytes;
use futures::future::BoxFuture;
use http::Request;
use http::Response;

use super::new_response_build_error;
use crate::*;

/// Shared reqwest client so that every loader reuses one connection pool.
pub(crate) static GLOBAL_REQWEST_CLIENT: LazyLock<reqwest::Client> =
    LazyLock::new(reqwest::Client::new);

/// HttpFetcher is a type erased [`HttpFetch`].
pub type HttpFetcher = Arc<dyn HttpFetchDyn>;

/// A HTTP client instance for the bucket loader.
///
/// # Notes
///
/// * A http client must support redirections that follows 3xx response.
#[derive(Clone)]
pub struct HttpClient {
    fetcher: HttpFetcher,
}

/// We don't want users to know details about our clients.
impl Debug for HttpClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            fetcher: Arc::new(GLOBAL_REQWEST_CLIENT.clone()),
        }
    }
}

impl HttpClient {
    /// Create a new http client backed by the shared reqwest client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct `Self` with given [`HttpFetch`], for example a configured
    /// [`reqwest::Client`].
    pub fn with(client: impl HttpFetch) -> Self {
        let fetcher = Arc::new(client);
        Self { fetcher }
    }

    /// Send a request and consume response.
    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.fetcher.fetch(req).await
    }
}

/// HttpFetch is the trait to fetch a request in async way.
/// User should implement this trait to provide their own http client.
pub trait HttpFetch: Send + Sync + Unpin + 'static {
    /// Fetch a request in async way, with the whole body read into memory.
    fn fetch(
        &self,
        req: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// HttpFetchDyn is the dyn version of [`HttpFetch`]
/// which make it possible to use as `Arc<dyn HttpFetchDyn>`.
/// User should never implement this trait, but use `HttpFetch` instead.
pub trait HttpFetchDyn: Send + Sync + Unpin + 'static {
    /// The dyn version of [`HttpFetch::fetch`].
    ///
    /// This function returns a boxed future to make it object safe.
    fn fetch_dyn(&self, req: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>>>;
}

impl<T: HttpFetch + ?Sized> HttpFetchDyn for T {
    fn fetch_dyn(&self, req: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>>> {
        Box::pin(self.fetch(req))
    }
}

impl<T: HttpFetchDyn + ?Sized> HttpFetch for Arc<T> {
    async fn fetch(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.deref().fetch_dyn(req).await
    }
}

impl HttpFetch for reqwest::Client {
    async fn fetch(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        // Uri stores all string alike data in `Bytes` which means
        // the clone here is cheap.
        let uri = req.uri().clone();

        let (parts, body) = req.into_parts();

        let url = reqwest::Url::parse(&uri.to_string()).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, "request url is invalid")
                .with_operation("http_util::Client::send")
                .with_context("url", uri.to_string())
                .set_source(err)
        })?;

        let mut req_builder = self
            .request(parts.method, url)
            .headers(parts.headers)
            .version(parts.version);

        // Don't set body if body is empty.
        if !body.is_empty() {
            req_builder = req_builder.body(body);
        }

        let mut resp = req_builder.send().await.map_err(|err| {
            Error::new(ErrorKind::Unexpected, "send http request")
                .with_operation("http_util::Client::send")
                .with_context("url", uri.to_string())
                .with_temporary(is_temporary_error(&err))
                .set_source(err)
        })?;

        let mut hr = Response::builder()
            .status(resp.status())
            .version(resp.version())
            // Insert uri into response extension so that error context can
            // report it later.
            .extension(uri.clone());

        // Swap headers directly instead of copy the entire map.
        if let Some(headers) = hr.headers_mut() {
            mem::swap(headers, resp.headers_mut());
        }

        let bs = resp.bytes().await.map_err(|err| {
            Error::new(ErrorKind::Unexpected, "read data from http response")
                .with_operation("http_util::Client::send")
                .with_context("url", uri.to_string())
                .with_temporary(is_temporary_error(&err))
                .set_source(err)
        })?;

        hr.body(bs).map_err(new_response_build_error)
    }
}

#[inline]
fn is_temporary_error(err: &reqwest::Error) -> bool {
    // error sending request
    err.is_request() ||
    // request or response body error
    err.is_body() ||
    // error decoding response body, for example, connection reset.
    err.is_decode() ||
    err.is_timeout()
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    struct EchoFetcher;

    impl HttpFetch for EchoFetcher {
        async fn fetch(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
            Ok(Response::builder()
                .status(StatusCode::OK)
                .body(Bytes::from(req.uri().to_string()))
                .expect("response must build succeed"))
        }
    }

    #[tokio::test]
    async fn test_send_with_custom_fetcher() {
        let client = HttpClient::with(EchoFetcher);
        let req = Request::get("https://bucket.example.com/")
            .body(Bytes::new())
            .expect("request must build succeed");

        let resp = client.send(req).await.expect("send must succeed");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body().as_ref(), b"https://bucket.example.com/");
    }

    #[test]
    fn test_new_client_hides_fetcher() {
        let client = HttpClient::new();
        assert_eq!(format!("{client:?}"), "HttpClient");
    }

    #[tokio::test]
    async fn test_cloned_client_shares_fetcher() {
        let client = HttpClient::with(EchoFetcher);
        let cloned = client.clone();
        assert!(Arc::ptr_eq(&client.fetcher, &cloned.fetcher));

        let req = Request::get("https://cdn.example.com/a")
            .body(Bytes::new())
            .expect("request must build succeed");
        let resp = cloned.send(req).await.expect("send must succeed");
        assert_eq!(resp.body().as_ref(), b"https://cdn.example.com/a");
    }
}
