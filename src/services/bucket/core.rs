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

use bytes::Bytes;
use http::Request;
use http::Response;
use log::debug;
use log::warn;
use quick_xml::de;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::raw::*;
use crate::*;

pub struct BucketCore {
    /// Listing endpoint, without trailing `/`.
    pub endpoint: String,
    /// Base of file urls, without trailing `/`.
    pub cdn_endpoint: String,
    pub extended_metadata: bool,
    pub client: HttpClient,
}

impl Debug for BucketCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketCore")
            .field("endpoint", &self.endpoint)
            .field("cdn_endpoint", &self.cdn_endpoint)
            .field("extended_metadata", &self.extended_metadata)
            .finish_non_exhaustive()
    }
}

impl BucketCore {
    /// Send an anonymous `GET` to the listing endpoint.
    pub async fn bucket_list_objects(&self) -> Result<Response<Bytes>> {
        debug!("listing bucket objects from {}", self.endpoint);

        let req = Request::get(&self.endpoint)
            .body(Bytes::new())
            .map_err(new_request_build_error)?;

        self.client.send(req).await
    }

    pub fn parse_listing(&self, xml: &str) -> Result<ListingResult> {
        parse_listing(xml, &self.cdn_endpoint, self.extended_metadata)
    }
}

/// Output of ListBucket/ListObjects.
///
/// ## Note
///
/// Enable `serde(default)` so that we can keep going even when some field
/// is not exist.
#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListObjectsOutput {
    pub is_truncated: Option<bool>,
    pub next_continuation_token: Option<String>,
    pub contents: Vec<ListObjectsOutputContent>,
}

/// `Size` is kept as text so that a broken value only affects its own record.
#[derive(Default, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListObjectsOutputContent {
    pub key: String,
    pub size: Option<String>,
    pub last_modified: String,
}

impl ListObjectsOutputContent {
    /// Size in bytes, `0` if it's missing or not a number.
    pub fn size(&self) -> u64 {
        self.size
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or_default()
    }
}

/// Parse a bucket listing document into folders and files.
///
/// - Records without key are skipped with a warning.
/// - Keys ending with `/` become [`FolderEntry`].
/// - Other keys become [`FileEntry`] whose url is `{cdn_endpoint}/{key}`.
///   With `extended_metadata`, folder path, folder name and type are
///   derived from the key and the name is the last segment of the key.
///
/// Returns an error if `xml` is not a well-formed `ListBucketResult` document.
pub fn parse_listing(
    xml: &str,
    cdn_endpoint: &str,
    extended_metadata: bool,
) -> Result<ListingResult> {
    check_listing_root(xml).map_err(|err| err.with_operation("bucket::parse_listing"))?;

    let output: ListObjectsOutput = de::from_str(xml)
        .map_err(new_xml_deserialize_error)
        .map_err(|err| err.with_operation("bucket::parse_listing"))?;

    if output.is_truncated == Some(true) {
        warn!(
            "bucket listing is truncated, only the first page is returned, next continuation token: {:?}",
            output.next_continuation_token
        );
    }

    let cdn_endpoint = cdn_endpoint.trim_end_matches('/');
    let mut result = ListingResult::default();

    for content in output.contents {
        if content.key.is_empty() {
            warn!("skipping listing record with empty key: {content:?}");
            continue;
        }

        if is_folder_key(&content.key) {
            result.push_folder(FolderEntry::new(&content.key));
            continue;
        }

        let url = format!("{cdn_endpoint}/{}", content.key);
        let size = content.size();
        let entry = if extended_metadata {
            FileEntry::with_details(url, &content.key, size, content.last_modified)
        } else {
            FileEntry::new(url, &content.key, size, content.last_modified)
        };
        result.push_file(entry);
    }

    Ok(result)
}

/// Make sure the root element is `ListBucketResult`. An html page served
/// with `200 OK` must not be read as an empty bucket.
fn check_listing_root(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"ListBucketResult" {
                    return Ok(());
                }
                return Err(Error::new(
                    ErrorKind::Unexpected,
                    "document is not a bucket listing",
                )
                .with_context("root", String::from_utf8_lossy(e.name().as_ref())));
            }
            Ok(Event::Eof) => {
                return Err(Error::new(
                    ErrorKind::Unexpected,
                    "document is not a bucket listing",
                )
                .with_context("root", "<none>"))
            }
            Ok(_) => continue,
            Err(err) => {
                return Err(Error::new(ErrorKind::Unexpected, "read xml").set_source(err))
            }
        }
    }
}
