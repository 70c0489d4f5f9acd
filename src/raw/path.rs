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

/// Returns true if the key points to a folder, like `albums/`.
pub fn is_folder_key(key: &str) -> bool {
    key.ends_with('/')
}

/// Get basename from an object key.
///
/// - `abc/def/img.jpg` => `img.jpg`
/// - `img.jpg` => `img.jpg`
/// - `abc/def/` => `def/`
pub fn get_basename(key: &str) -> &str {
    // Handle file case
    if !is_folder_key(key) {
        return match key.rfind('/') {
            Some(idx) => &key[idx + 1..],
            None => key,
        };
    }

    // The idx of second `/` if key in reserve order.
    // - `abc/` => `None`
    // - `abc/def/` => `Some(3)`
    let idx = key[..key.len() - 1].rfind('/').map(|v| v + 1);

    match idx {
        Some(v) => &key[v..],
        None => key,
    }
}

/// Get parent from an object key, keeping the trailing `/`.
///
/// - `abc/def/img.jpg` => `abc/def/`
/// - `abc/def/` => `abc/`
/// - `img.jpg` => ``
pub fn get_parent(key: &str) -> &str {
    if !is_folder_key(key) {
        // The idx of first `/` if key in reserve order.
        // - `abc` => `None`
        // - `abc/def` => `Some(3)`
        return match key.rfind('/') {
            Some(v) => &key[..v + 1],
            None => "",
        };
    }

    let idx = key[..key.len() - 1].rfind('/').map(|v| v + 1);

    match idx {
        Some(v) => &key[..v],
        None => "",
    }
}
