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

use bytes::Bytes;
use http::Response;
use quick_xml::de;
use serde::Deserialize;

use crate::raw::*;
use crate::*;

/// BucketError is the error document returned by S3 compatible storages.
#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct BucketError {
    pub code: String,
    pub message: String,
    pub resource: String,
    pub request_id: String,
}

/// Parse error response into Error.
pub(super) fn parse_error(resp: Response<Bytes>) -> Error {
    let (parts, bs) = resp.into_parts();

    let (mut kind, mut retryable) = match parts.status.as_u16() {
        403 => (ErrorKind::PermissionDenied, false),
        404 => (ErrorKind::NotFound, false),
        429 => (ErrorKind::RateLimited, true),
        500 | 502 | 503 | 504 => (ErrorKind::Unexpected, true),
        _ => (ErrorKind::Unexpected, false),
    };

    let (message, bucket_err) = std::str::from_utf8(&bs)
        .ok()
        .and_then(|v| de::from_str::<BucketError>(v).ok())
        .filter(|v| !v.code.is_empty())
        .map(|v| (format!("{v:?}"), Some(v)))
        .unwrap_or_else(|| (String::from_utf8_lossy(&bs).into_owned(), None));

    if let Some(bucket_err) = bucket_err {
        (kind, retryable) =
            parse_bucket_error_code(&bucket_err.code).unwrap_or((kind, retryable));
    }

    let mut err = Error::new(kind, message);

    err = with_error_response_context(err, parts);

    if retryable {
        err = err.set_temporary();
    }

    err
}

/// Returns the `ErrorKind` of this code and whether the error is retryable.
///
/// All possible error code: <https://docs.aws.amazon.com/AmazonS3/latest/API/ErrorResponses.html#ErrorCodeList>
pub(crate) fn parse_bucket_error_code(code: &str) -> Option<(ErrorKind, bool)> {
    match code {
        // The bucket in the endpoint doesn't exist, nothing to retry.
        "NoSuchBucket" => Some((ErrorKind::ConfigInvalid, false)),
        "AccessDenied" => Some((ErrorKind::PermissionDenied, false)),
        "RequestTimeout" => Some((ErrorKind::Unexpected, true)),
        "InternalError" => Some((ErrorKind::Unexpected, true)),
        "SlowDown" => Some((ErrorKind::RateLimited, true)),
        "ServiceUnavailable" => Some((ErrorKind::Unexpected, true)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    fn response(status: StatusCode, body: &'static str) -> Response<Bytes> {
        Response::builder()
            .status(status)
            .body(Bytes::from_static(body.as_bytes()))
            .expect("response must build succeed")
    }

    #[test]
    fn test_parse_error_from_status() {
        let cases = vec![
            (StatusCode::FORBIDDEN, ErrorKind::PermissionDenied, false),
            (StatusCode::NOT_FOUND, ErrorKind::NotFound, false),
            (StatusCode::TOO_MANY_REQUESTS, ErrorKind::RateLimited, true),
            (StatusCode::SERVICE_UNAVAILABLE, ErrorKind::Unexpected, true),
            (StatusCode::BAD_REQUEST, ErrorKind::Unexpected, false),
        ];

        for (status, kind, temporary) in cases {
            let err = parse_error(response(status, "oops"));
            assert_eq!(err.kind(), kind, "{status}");
            assert_eq!(err.is_temporary(), temporary, "{status}");
            assert_eq!(err.message(), "oops", "{status}");
        }
    }

    #[test]
    fn test_parse_error_from_body() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchBucket</Code>
  <Message>The specified bucket does not exist</Message>
  <Resource>/portfolio</Resource>
  <RequestId>4442587FB7D0A2F9</RequestId>
</Error>"#;

        let err = parse_error(response(StatusCode::NOT_FOUND, body));
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(!err.is_temporary());
        assert!(err.message().contains("NoSuchBucket"), "{err}");
    }

    #[test]
    fn test_parse_error_slow_down() {
        let body = r#"<Error><Code>SlowDown</Code><Message>Please reduce your request rate.</Message></Error>"#;

        let err = parse_error(response(StatusCode::SERVICE_UNAVAILABLE, body));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(err.is_temporary());
    }

    #[test]
    fn test_parse_bucket_error_code() {
        assert_eq!(
            parse_bucket_error_code("AccessDenied"),
            Some((ErrorKind::PermissionDenied, false))
        );
        assert_eq!(parse_bucket_error_code("Whatever"), None);
    }
}
