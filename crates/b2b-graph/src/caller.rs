// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::GraphError;

/// Authenticated access to the directory API.
///
/// `body = Some(..)` issues a POST with that JSON payload, `None` issues a
/// GET. Implementations own tokens, retries and connection pooling.
#[async_trait]
pub trait GraphCaller: Send + Sync {
	async fn call(&self, url: &str, body: Option<&Value>) -> Result<GraphResponse, GraphError>;
}

/// Outcome of one Graph call. Built once per call and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphResponse {
	pub successful: bool,
	pub status: u16,
	pub message: String,
	pub response_content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
	error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	code: Option<String>,
	message: Option<String>,
}

impl GraphResponse {
	pub fn success(status: u16, response_content: impl Into<String>) -> Self {
		Self {
			successful: true,
			status,
			message: describe_status(status),
			response_content: response_content.into(),
		}
	}

	pub fn failure(status: u16, message: impl Into<String>, response_content: impl Into<String>) -> Self {
		Self {
			successful: false,
			status,
			message: message.into(),
			response_content: response_content.into(),
		}
	}

	/// Interpret a raw HTTP answer. 2xx is success; anything else is a failure
	/// whose message comes from Graph's `{"error": {"code", "message"}}`
	/// envelope when present, else from the status line.
	pub fn from_http(status: StatusCode, body: String) -> Self {
		if status.is_success() {
			return Self::success(status.as_u16(), body);
		}

		let message = error_message(&body).unwrap_or_else(|| describe_status(status.as_u16()));
		Self::failure(status.as_u16(), message, body)
	}
}

fn describe_status(status: u16) -> String {
	match StatusCode::from_u16(status) {
		Ok(code) => code.to_string(),
		Err(_) => status.to_string(),
	}
}

fn error_message(body: &str) -> Option<String> {
	let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
	match (envelope.error.code, envelope.error.message) {
		(Some(code), Some(message)) => Some(format!("{code}: {message}")),
		(None, Some(message)) => Some(message),
		(Some(code), None) => Some(code),
		(None, None) => None,
	}
}
