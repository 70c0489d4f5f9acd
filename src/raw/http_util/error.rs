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

use http::response::Parts;

use crate::Error;
use crate::ErrorKind;

/// Create a new error happened during building request.
pub fn new_request_build_error(err: http::Error) -> Error {
    Error::new(ErrorKind::Unexpected, "building http request")
        .with_operation("http::Request::build")
        .set_source(err)
}

/// Create a new error happened during building response.
pub fn new_response_build_error(err: http::Error) -> Error {
    Error::new(ErrorKind::Unexpected, "building http response")
        .with_operation("http::Response::build")
        .set_source(err)
}

/// Add response parts like status code and request id into error context.
pub fn with_error_response_context(mut err: Error, parts: Parts) -> Error {
    if let Some(uri) = parts.extensions.get::<http::Uri>() {
        err = err.with_context("uri", uri.to_string());
    }

    err = err.with_context("response_status", parts.status.as_u16());

    for key in ["x-amz-request-id", "x-amz-id-2"] {
        if let Some(v) = parts.headers.get(key).and_then(|v| v.to_str().ok()) {
            err = err.with_context("response_header", format!("{key}: {v}"));
        }
    }

    err
}

#[cfg(test)]
mod tests {
    use http::Response;
    use http::StatusCode;

    use super::*;

    #[test]
    fn test_with_error_response_context() {
        let (parts, _) = Response::builder()
            .status(StatusCode::FORBIDDEN)
            .header("x-amz-request-id", "tx000001")
            .body(())
            .expect("response must build succeed")
            .into_parts();

        let err =
            with_error_response_context(Error::new(ErrorKind::PermissionDenied, "denied"), parts);
        assert_eq!(
            err.to_string(),
            "PermissionDenied (permanent) at , context: { response_status: 403, response_header: x-amz-request-id: tx000001 } => denied"
        );
    }

    #[test]
    fn test_with_error_response_context_uri() {
        let uri: http::Uri = "https://bucket.example.com/".parse().expect("uri must be valid");
        let (parts, _) = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .extension(uri)
            .body(())
            .expect("response must build succeed")
            .into_parts();

        let err = with_error_response_context(Error::new(ErrorKind::NotFound, "missing"), parts);
        assert_eq!(
            err.to_string(),
            "NotFound (permanent) at , context: { uri: https://bucket.example.com/, response_status: 404 } => missing"
        );
    }
}
