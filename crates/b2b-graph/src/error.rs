// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Graph client.

use b2b_common_http::RetryableError;
use thiserror::Error;

use crate::caller::GraphResponse;

/// Failures that prevent a Graph call from producing a [`GraphResponse`].
///
/// A call that reaches Graph and gets a non-2xx answer is not an error; it is
/// an unsuccessful [`GraphResponse`].
#[derive(Debug, Error)]
pub enum GraphError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// The token endpoint refused to issue an access token.
	#[error("Token request rejected: {0}")]
	TokenRejected(String),

	/// Invalid or unparseable response.
	#[error("Invalid response from Graph: {0}")]
	InvalidResponse(String),

	/// Configuration error.
	#[error("Configuration error: {0}")]
	Config(String),

	/// The request body could not be serialized.
	#[error("Failed to serialize request body: {0}")]
	Serialize(#[from] serde_json::Error),

	/// Graph answered with a throttling or 5xx status; retried internally and
	/// surfaced as the final unsuccessful response once attempts run out.
	#[error("Transient Graph failure: {}", .0.message)]
	Transient(GraphResponse),
}

impl RetryableError for GraphError {
	fn is_retryable(&self) -> bool {
		match self {
			GraphError::Network(e) => e.is_retryable(),
			GraphError::Timeout => true,
			GraphError::Transient(_) => true,
			_ => false,
		}
	}
}

impl GraphError {
	pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
		if e.is_timeout() {
			GraphError::Timeout
		} else {
			GraphError::Network(e)
		}
	}
}
