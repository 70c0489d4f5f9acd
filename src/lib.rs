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

//! bucketlist loads the public listing of an S3 compatible bucket and turns
//! it into folder and file records for display.
//!
//! # Quick Start
//!
//! ```no_run
//! use bucketlist::services::Bucket;
//! use bucketlist::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Pick a builder and configure it.
//!     let bucket = Bucket::builder()
//!         .endpoint("https://portfolio.sfo3.digitaloceanspaces.com")
//!         .build()?;
//!
//!     // Fails open: errors are logged and an empty listing is returned.
//!     let listing = bucket.fetch_listing().await;
//!     for folder in listing.folders() {
//!         println!("folder: {}", folder.name());
//!     }
//!
//!     // Or handle the error by yourself.
//!     let listing = bucket.try_fetch_listing().await?;
//!     for file in listing.files() {
//!         println!("file: {} ({} bytes)", file.url(), file.size());
//!     }
//!
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]
// Deny unused qualifications.
#![deny(unused_qualifications)]

// Private module with public types, they will be accessed via `bucketlist::Xxxx`
mod types;
pub use types::*;

// Public modules, they will be accessed like `bucketlist::services::Xxxx`
pub mod raw;
pub mod services;

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::*;

    /// This is not a real test case.
    ///
    /// We assert our public structs here to make sure we don't introduce
    /// unexpected struct/enum size change.
    #[test]
    fn assert_size() {
        assert_eq!(24, size_of::<FolderEntry>());
        assert_eq!(48, size_of::<ListingResult>());
    }

    trait AssertSendSync: Send + Sync {}
    impl AssertSendSync for services::Bucket {}
    impl AssertSendSync for ListingResult {}
    impl AssertSendSync for Error {}
}
