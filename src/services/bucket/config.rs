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

use serde::Deserialize;
use serde::Serialize;

use super::backend::BucketBuilder;
use crate::raw::*;
use crate::*;

/// Config for loading a public S3 compatible bucket listing (AWS S3,
/// DigitalOcean Spaces, minio and so on).
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct BucketConfig {
    /// endpoint that returns the bucket listing.
    ///
    /// required. For example: `https://portfolio.sfo3.digitaloceanspaces.com`
    ///
    /// If user inputs endpoint without scheme, we will prepend `https://`
    /// before it.
    #[serde(alias = "base_url", alias = "bucket_endpoint")]
    pub endpoint: Option<String>,
    /// endpoint used to build file urls, like a CDN in front of the bucket.
    ///
    /// default to `endpoint` if not set.
    #[serde(alias = "cdn_url")]
    pub cdn_endpoint: Option<String>,
    /// Derive folder path, folder name and type for every file and use the
    /// file name instead of the whole key as its name.
    pub extended_metadata: bool,
}

impl Debug for BucketConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketConfig")
            .field("endpoint", &self.endpoint)
            .field("cdn_endpoint", &self.cdn_endpoint)
            .field("extended_metadata", &self.extended_metadata)
            .finish_non_exhaustive()
    }
}

impl BucketConfig {
    /// Deserialize config from string pairs, like
    /// `[("endpoint", "https://..."), ("extended_metadata", "on")]`.
    pub fn from_iter(iter: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let cfg = ConfigDeserializer::new(iter.into_iter().collect());

        Self::deserialize(cfg).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, "failed to deserialize config").set_source(err)
        })
    }

    /// Convert this configuration into a builder.
    pub fn into_builder(self) -> BucketBuilder {
        BucketBuilder {
            config: self,
            http_client: None,
        }
    }
}
