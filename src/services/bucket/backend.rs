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
use std::sync::Arc;

use log::debug;
use log::error;

use super::config::BucketConfig;
use super::core::BucketCore;
use super::error::parse_error;
use crate::raw::*;
use crate::*;

/// Public S3 compatible bucket listing support.
///
/// # Capabilities
///
/// This service can be used to:
///
/// - [x] list (first page only)
/// - [ ] ~~read~~
/// - [ ] ~~write~~
///
/// # Configuration
///
/// - `endpoint`: url that returns the bucket listing, required.
/// - `cdn_endpoint`: base url of files, default to `endpoint`.
/// - `extended_metadata`: derive folder path, folder name and type of files.
///
/// # Example
///
/// ```no_run
/// use bucketlist::services::Bucket;
/// use bucketlist::Result;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let bucket = Bucket::builder()
///         .endpoint("https://portfolio-media.sfo3.digitaloceanspaces.com")
///         .cdn_endpoint("https://portfolio-media.sfo3.cdn.digitaloceanspaces.com")
///         .extended_metadata(true)
///         .build()?;
///
///     let listing = bucket.fetch_listing().await;
///     for file in listing.files() {
///         println!("{} => {}", file.folder_name(), file.url());
///     }
///     Ok(())
/// }
/// ```
#[derive(Default)]
pub struct BucketBuilder {
    pub(super) config: BucketConfig,
    pub(super) http_client: Option<HttpClient>,
}

impl Debug for BucketBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("BucketBuilder");

        d.field("config", &self.config);
        d.finish_non_exhaustive()
    }
}

impl BucketBuilder {
    /// Set endpoint of the bucket listing.
    ///
    /// For example: `https://portfolio.sfo3.digitaloceanspaces.com`
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoint = if endpoint.is_empty() {
            None
        } else {
            Some(endpoint.to_string())
        };

        self
    }

    /// Set the base url of files, for example the CDN in front of the bucket.
    ///
    /// Default to the endpoint.
    pub fn cdn_endpoint(mut self, cdn_endpoint: &str) -> Self {
        self.config.cdn_endpoint = if cdn_endpoint.is_empty() {
            None
        } else {
            Some(cdn_endpoint.to_string())
        };

        self
    }

    /// Derive folder path, folder name and type for every file.
    pub fn extended_metadata(mut self, enabled: bool) -> Self {
        self.config.extended_metadata = enabled;
        self
    }

    /// Specify the http client that used by this service.
    ///
    /// # Notes
    ///
    /// This API is part of the raw API. `HttpClient` could be changed
    /// during minor updates.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the bucket loader.
    pub fn build(self) -> Result<Bucket> {
        debug!("backend build started: {:?}", &self);

        let endpoint = match self.config.endpoint.as_deref() {
            Some(v) => normalize_endpoint(v),
            None => {
                return Err(Error::new(ErrorKind::ConfigInvalid, "endpoint is empty")
                    .with_operation("Builder::build")
                    .with_context("service", "bucket"));
            }
        };
        debug!("backend use endpoint {}", endpoint);

        let cdn_endpoint = match self.config.cdn_endpoint.as_deref() {
            Some(v) => normalize_endpoint(v),
            None => endpoint.clone(),
        };
        debug!("backend use cdn endpoint {}", cdn_endpoint);

        let client = match self.http_client {
            Some(client) => client,
            None => HttpClient::new(),
        };

        debug!("backend build finished");
        Ok(Bucket {
            core: Arc::new(BucketCore {
                endpoint,
                cdn_endpoint,
                extended_metadata: self.config.extended_metadata,
                client,
            }),
        })
    }
}

/// Prepend `https://` if scheme is missing and trim the trailing `/`.
fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');

    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    }
}

/// Loader of one bucket listing.
///
/// Cloning is cheap, and every call sends its own request.
#[derive(Clone, Debug)]
pub struct Bucket {
    core: Arc<BucketCore>,
}

impl Bucket {
    /// Create a default builder.
    pub fn builder() -> BucketBuilder {
        BucketBuilder::default()
    }

    /// Endpoint this bucket lists from.
    pub fn endpoint(&self) -> &str {
        &self.core.endpoint
    }

    /// Base url of files in this bucket.
    pub fn cdn_endpoint(&self) -> &str {
        &self.core.cdn_endpoint
    }

    /// Fetch and parse the bucket listing.
    ///
    /// Never fails: any error is logged and an empty [`ListingResult`] is
    /// returned, so an empty result could also mean the fetch failed. Use
    /// [`Bucket::try_fetch_listing`] to tell them apart.
    pub async fn fetch_listing(&self) -> ListingResult {
        match self.try_fetch_listing().await {
            Ok(listing) => listing,
            Err(err) => {
                error!("failed to fetch bucket listing: {err}");
                ListingResult::default()
            }
        }
    }

    /// Fetch and parse the bucket listing, returning any failure as [`Error`].
    pub async fn try_fetch_listing(&self) -> Result<ListingResult> {
        let resp = self
            .core
            .bucket_list_objects()
            .await
            .map_err(|err| self.with_error_context(err))?;

        if !resp.status().is_success() {
            return Err(self.with_error_context(parse_error(resp)));
        }

        let xml = String::from_utf8_lossy(resp.body());
        self.core
            .parse_listing(&xml)
            .map_err(|err| self.with_error_context(err))
    }

    /// Parse a listing document with this bucket's settings.
    pub fn parse_listing(&self, xml: &str) -> Result<ListingResult> {
        self.core.parse_listing(xml)
    }

    fn with_error_context(&self, err: Error) -> Error {
        err.with_operation("Bucket::try_fetch_listing")
            .with_context("endpoint", &self.core.endpoint)
    }
}
