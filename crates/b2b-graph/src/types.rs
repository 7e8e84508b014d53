// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Graph JSON schemas used by the invitation flow.

use serde::{Deserialize, Deserializer, Serialize};

/// `invitation` resource. Sent with the request fields populated; Graph echoes
/// them back and adds `id`, `status`, `invitedUser` and `inviteRedeemUrl`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphInvitation {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub invited_user_display_name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub invited_user_email_address: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub invite_redirect_url: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub send_invitation_message: bool,
	#[serde(default, deserialize_with = "null_as_default")]
	pub invited_user_type: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub invited_user_message_info: Option<InvitedUserMessageInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub invited_user: Option<GraphInvitedUser>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub invite_redeem_url: Option<String>,
}

// Graph returns `null` for request fields it did not receive.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitedUserMessageInfo {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customized_message_body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphInvitedUser {
	#[serde(default, deserialize_with = "null_as_default")]
	pub id: String,
}

/// Body of `POST /groups/{id}/members/$ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphGroupAdd {
	#[serde(rename = "@odata.id")]
	pub odata_id: String,
}

impl GraphGroupAdd {
	/// Reference to `user_id` as a directory object under `graph_resource`.
	pub fn new(graph_resource: &str, user_id: &str) -> Self {
		Self {
			odata_id: format!(
				"{}/v1.0/directoryObjects/{user_id}",
				graph_resource.trim_end_matches('/')
			),
		}
	}
}

/// One entry of `/users/{upn}/memberOf`: a directory role or a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMemberRole {
	#[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
	pub odata_type: Option<String>,
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub role_template_id: Option<String>,
}

impl GraphMemberRole {
	pub fn is_directory_role(&self) -> bool {
		self.odata_type.as_deref() == Some("#microsoft.graph.directoryRole")
	}
}
