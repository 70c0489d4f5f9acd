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

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::raw::*;
use crate::*;

/// FileEntry is an object in the bucket listing whose key is not a folder.
///
/// All fields are derived from the object key plus the size and timestamp
/// that the listing reports. Serialized in camelCase so that UI code sees
/// `folderPath`, `folderName`, `lastModified` and `type`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    url: String,
    path: String,
    folder_path: String,
    folder_name: String,
    size: u64,
    last_modified: String,
    #[serde(rename = "type")]
    kind: String,
    name: String,
}

impl FileEntry {
    /// Create a file entry that only carries the raw key as its name.
    pub(crate) fn new(url: String, key: &str, size: u64, last_modified: String) -> Self {
        Self {
            url,
            path: key.to_string(),
            size,
            last_modified,
            name: key.to_string(),
            ..Default::default()
        }
    }

    /// Create a file entry with folder and type metadata derived from the key.
    pub(crate) fn with_details(
        url: String,
        key: &str,
        size: u64,
        last_modified: String,
    ) -> Self {
        let name = get_basename(key);
        let folder_path = get_parent(key);

        Self {
            url,
            path: key.to_string(),
            folder_path: folder_path.to_string(),
            folder_name: folder_label(folder_path),
            size,
            last_modified,
            kind: name.chars().next().map(String::from).unwrap_or_default(),
            name: name.to_string(),
        }
    }

    /// Public URL of this file, built from the CDN endpoint and the key.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The object key, verbatim.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Key with its last segment removed, ending with `/`.
    ///
    /// Empty when folder metadata is not derived or the key has no `/`.
    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    /// Human readable label of the folder, like `oregon coast 2022`.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modified timestamp as the listing reports it.
    pub fn last_modified(&self) -> &str {
        &self.last_modified
    }

    /// Parse [`FileEntry::last_modified`] as a RFC 3339 timestamp.
    pub fn last_modified_time(&self) -> Result<DateTime<Utc>> {
        parse_datetime_from_rfc3339(&self.last_modified)
            .map_err(|err| err.with_context("path", &self.path))
    }

    /// Type tag of this file: the first character of its name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Display name of this file.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// FolderEntry is an object in the bucket listing whose key ends with `/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    name: String,
}

impl FolderEntry {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Raw key of this folder, ending with `/`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// ListingResult is the folders and files of one bucket listing, in the
/// order the storage returned them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListingResult {
    folders: Vec<FolderEntry>,
    files: Vec<FileEntry>,
}

impl ListingResult {
    pub(crate) fn push_folder(&mut self, folder: FolderEntry) {
        self.folders.push(folder);
    }

    pub(crate) fn push_file(&mut self, file: FileEntry) {
        self.files.push(file);
    }

    /// Folders of this listing.
    pub fn folders(&self) -> &[FolderEntry] {
        &self.folders
    }

    /// Files of this listing.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Returns true if this listing has neither folders nor files.
    ///
    /// An empty listing returned by [`crate::services::Bucket::fetch_listing`]
    /// could also mean the fetch failed.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Consume self to get the folders and files.
    pub fn into_parts(self) -> (Vec<FolderEntry>, Vec<FileEntry>) {
        (self.folders, self.files)
    }
}

/// Build the display label of a folder path.
///
/// Keys are laid out as `category/year/label/...`. A two segment path is read
/// as `year/label/` only when its first segment is a number, otherwise as
/// `category/year/`.
pub(crate) fn folder_label(folder_path: &str) -> String {
    let segments: Vec<&str> = folder_path.split('/').filter(|v| !v.is_empty()).collect();

    let (year, label) = match segments.as_slice() {
        [] => return String::new(),
        [year] => (*year, None),
        [year, label] if is_year(year) => (*year, Some(*label)),
        [_, year] => (*year, None),
        [_, year, label, ..] => (*year, Some(*label)),
    };

    match label {
        Some(label) => format!("{} {year}", label.replace('-', " ")),
        None => year.to_string(),
    }
}

fn is_year(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_folder_label() {
        let cases = vec![
            (
                "category, year and label",
                "photos/2022/oregon-coast/",
                "oregon coast 2022",
            ),
            ("year and label", "2022/oregon-coast/", "oregon coast 2022"),
            ("nested below label", "photos/2021/big-sur/day-1/", "big sur 2021"),
            ("category and year", "photos/2022/", "2022"),
            ("category and non numeric year", "photos/summer/", "summer"),
            ("single segment", "2022/", "2022"),
            ("leading slash", "/2023/snow/", "snow 2023"),
            ("no folder", "", ""),
        ];

        for (name, input, expect) in cases {
            assert_eq!(folder_label(input), expect, "{name}");
        }
    }

    #[test]
    fn test_file_entry_with_details() {
        let entry = FileEntry::with_details(
            "https://cdn.example.com/photos/2022/oregon-coast/img1.jpg".to_string(),
            "photos/2022/oregon-coast/img1.jpg",
            12345,
            "2022-08-01T10:00:00.000Z".to_string(),
        );

        assert_eq!(entry.name(), "img1.jpg");
        assert_eq!(entry.kind(), "i");
        assert_eq!(entry.folder_path(), "photos/2022/oregon-coast/");
        assert_eq!(entry.folder_name(), "oregon coast 2022");
        assert_eq!(entry.size(), 12345);
        assert_eq!(
            format!("{}{}", entry.folder_path(), entry.name()),
            entry.path()
        );
    }

    #[test]
    fn test_file_entry_under_category_and_year() {
        let entry = FileEntry::with_details(
            "https://cdn.example.com/photos/2022/a.jpg".to_string(),
            "photos/2022/a.jpg",
            1,
            String::new(),
        );

        assert_eq!(entry.folder_path(), "photos/2022/");
        assert_eq!(entry.folder_name(), "2022");
        assert_eq!(entry.name(), "a.jpg");
    }

    #[test]
    fn test_file_entry_at_bucket_root() {
        let entry = FileEntry::with_details(
            "https://cdn.example.com/resume.pdf".to_string(),
            "resume.pdf",
            10,
            String::new(),
        );

        assert_eq!(entry.name(), "resume.pdf");
        assert_eq!(entry.kind(), "r");
        assert_eq!(entry.folder_path(), "");
        assert_eq!(entry.folder_name(), "");
    }

    #[test]
    fn test_file_entry_without_details() {
        let entry = FileEntry::new(
            "https://bucket.example.com/2022/a.png".to_string(),
            "2022/a.png",
            1,
            String::new(),
        );

        assert_eq!(entry.name(), "2022/a.png");
        assert_eq!(entry.path(), "2022/a.png");
        assert_eq!(entry.folder_path(), "");
        assert_eq!(entry.folder_name(), "");
        assert_eq!(entry.kind(), "");
    }

    #[test]
    fn test_last_modified_time() {
        let entry = FileEntry::new(
            String::new(),
            "a.png",
            1,
            "2016-04-30T23:51:29.000Z".to_string(),
        );
        let t = entry.last_modified_time().expect("must be valid rfc3339");
        assert_eq!(t.to_rfc3339(), "2016-04-30T23:51:29+00:00");

        let entry = FileEntry::new(String::new(), "a.png", 1, String::new());
        let err = entry.last_modified_time().expect_err("empty time must fail");
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_serialize_camel_case() {
        let entry = FileEntry::with_details(
            "https://cdn.example.com/photos/2022/oregon-coast/img1.jpg".to_string(),
            "photos/2022/oregon-coast/img1.jpg",
            12345,
            "2022-08-01T10:00:00.000Z".to_string(),
        );
        let mut result = ListingResult::default();
        result.push_folder(FolderEntry::new("photos/"));
        result.push_file(entry);

        let actual = serde_json::to_value(&result).expect("must serialize");
        assert_eq!(
            actual,
            serde_json::json!({
                "folders": [{"name": "photos/"}],
                "files": [{
                    "url": "https://cdn.example.com/photos/2022/oregon-coast/img1.jpg",
                    "path": "photos/2022/oregon-coast/img1.jpg",
                    "folderPath": "photos/2022/oregon-coast/",
                    "folderName": "oregon coast 2022",
                    "size": 12345,
                    "lastModified": "2022-08-01T10:00:00.000Z",
                    "type": "i",
                    "name": "img1.jpg",
                }],
            })
        );
    }
}
