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

use crate::*;

/// Parse datetime from rfc3339, the format `LastModified` uses.
///
/// For example: `2016-04-30T23:51:29.000Z`
pub fn parse_datetime_from_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|v| v.into())
        .map_err(|e| {
            Error::new(ErrorKind::Unexpected, "parse datetime from rfc3339 failed")
                .with_context("input", s)
                .set_source(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_from_rfc3339() {
        let t = parse_datetime_from_rfc3339("2009-12-09T00:18:23.000Z").expect("must succeed");
        assert_eq!(t.timestamp(), 1260317903);

        let t = parse_datetime_from_rfc3339("2009-12-09T08:18:23+08:00").expect("must succeed");
        assert_eq!(t.timestamp(), 1260317903);

        assert!(parse_datetime_from_rfc3339("yesterday").is_err());
    }
}
