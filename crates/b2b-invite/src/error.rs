// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use b2b_graph::GraphError;
use thiserror::Error;

/// Shown in place of a server response when no call got that far.
pub const NO_SERVER_RESPONSE: &str = "N/A";

#[derive(Debug, Error)]
pub enum InviteError {
	/// Graph answered but did not create an invitation.
	#[error("Invite not sent - API error: {message}")]
	Rejected { message: String },

	#[error("{source}")]
	Graph {
		#[source]
		source: GraphError,
		server_response: Option<String>,
	},

	#[error("{reason}")]
	InvalidResponse {
		reason: String,
		server_response: String,
	},

	#[error("failed to serialize invitation: {0}")]
	Serialize(#[from] serde_json::Error),
}

impl InviteError {
	/// Raw body of the last Graph response, if one was received.
	pub fn server_response(&self) -> Option<&str> {
		match self {
			InviteError::Graph {
				server_response, ..
			} => server_response.as_deref(),
			InviteError::InvalidResponse {
				server_response, ..
			} => Some(server_response),
			InviteError::Rejected { .. } | InviteError::Serialize(_) => None,
		}
	}

	/// Status string shown to users. Always starts with `Error:`.
	pub fn status_message(&self) -> String {
		match self {
			InviteError::Rejected { .. } => format!("Error: {self}"),
			_ => format!(
				"Error: {self}<br>Server response: {}",
				self.server_response().unwrap_or(NO_SERVER_RESPONSE)
			),
		}
	}
}
