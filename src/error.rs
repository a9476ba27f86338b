// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `PoolMath` library.
//!
//! Failures fall into two families: transport failures (network errors,
//! non-success HTTP statuses) and decode failures (malformed or unexpected
//! JSON). The reconciliation core treats both as an opaque failure signal;
//! no retry policy lives here.
//!
//! All error types are `Clone`: a coalesced control call delivers its single
//! outcome to every caller queued in the debounce window, which requires the
//! error to fan out over a broadcast channel. `reqwest` errors are therefore
//! classified into owned variants at the client boundary instead of being
//! wrapped directly.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The HTTP round trip to the controller failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The controller's response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors related to the HTTP round trip itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or the connection was lost mid-flight.
    #[error("request to {url} failed: {message}")]
    Request {
        /// The URL that was requested.
        url: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// The request exceeded the configured deadline.
    #[error("request to {url} timed out")]
    Timeout {
        /// The URL that was requested.
        url: String,
    },

    /// The controller answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// The channel carrying a coalesced call's outcome was torn down
    /// before the outcome arrived.
    #[error("coalesced call channel closed")]
    ChannelClosed,
}

impl TransportError {
    /// Classifies a `reqwest` failure for the given URL.
    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else {
            Self::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Errors related to decoding controller responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The response body was not valid JSON for the expected snapshot shape.
    #[error("malformed status payload: {message}")]
    Json {
        /// Description of the parse failure.
        message: String,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
