// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and per-domain settings models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A guest to invite. Validated upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRequest {
	pub first_name: String,
	pub last_name: String,
	pub email_address: String,
}

impl GuestRequest {
	pub fn new(
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		email_address: impl Into<String>,
	) -> Self {
		Self {
			first_name: first_name.into(),
			last_name: last_name.into(),
			email_address: email_address.into(),
		}
	}

	pub fn display_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}
}

/// Directory user type given to the invited account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
	#[default]
	Guest,
	Member,
}

impl MemberType {
	pub fn as_str(&self) -> &'static str {
		match self {
			MemberType::Guest => "Guest",
			MemberType::Member => "Member",
		}
	}
}

impl fmt::Display for MemberType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionSettings {
	/// Contact address shown to the guest in notification emails.
	#[serde(default)]
	pub inviter_response_email_addr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteTemplate {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub template_content: Option<String>,
}

/// Settings for guests from one pre-authorized email domain. Overrides the
/// site-wide redemption settings and template when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreAuthDomain {
	pub domain: String,
	#[serde(default)]
	pub domain_redemption_settings: RedemptionSettings,
	#[serde(default)]
	pub invite_template_id: Option<String>,
	#[serde(default)]
	pub invite_template_content: InviteTemplate,
	#[serde(default)]
	pub member_type: MemberType,
	/// Groups the invited user joins, in order.
	#[serde(default)]
	pub groups: Vec<String>,
}

impl PreAuthDomain {
	pub fn has_custom_template(&self) -> bool {
		self
			.invite_template_id
			.as_deref()
			.is_some_and(|id| !id.is_empty())
	}
}
