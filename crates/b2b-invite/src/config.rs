// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Site-wide invitation settings.

use b2b_common_config::{env_flag, env_or, require_env, ConfigError};

use crate::models::{InviteTemplate, RedemptionSettings};

pub const DEFAULT_GRAPH_RESOURCE: &str = "https://graph.microsoft.com";
pub const DEFAULT_GRAPH_API_VERSION: &str = "v1.0";
pub const DEFAULT_EMAIL_SUBJECT: &str = "Invitation from {{orgname}}";

/// Group member references are only published on v1.0.
const GROUP_API_VERSION: &str = "v1.0";

/// Read-only settings shared by every invitation. Defaults for guests whose
/// domain has no [`crate::PreAuthDomain`] override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteSettings {
	pub graph_resource: String,
	pub graph_api_version: String,
	/// Send invitations ourselves over SMTP instead of via Graph's mailer.
	pub use_smtp: bool,
	pub site_redemption_settings: RedemptionSettings,
	pub site_invite_template_content: InviteTemplate,
	pub inviting_organization: String,
	/// May contain `{{orgname}}`.
	pub invitation_email_subject: String,
}

impl InviteSettings {
	pub fn new(inviting_organization: impl Into<String>) -> Self {
		Self {
			graph_resource: DEFAULT_GRAPH_RESOURCE.to_string(),
			graph_api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
			use_smtp: false,
			site_redemption_settings: RedemptionSettings::default(),
			site_invite_template_content: InviteTemplate::default(),
			inviting_organization: inviting_organization.into(),
			invitation_email_subject: DEFAULT_EMAIL_SUBJECT.to_string(),
		}
	}

	/// Load settings from the environment.
	///
	/// Required:
	/// - `B2B_INVITING_ORGANIZATION`
	///
	/// Optional:
	/// - `B2B_GRAPH_RESOURCE` (default `https://graph.microsoft.com`)
	/// - `B2B_GRAPH_API_VERSION` (default `v1.0`)
	/// - `B2B_USE_SMTP` (default false)
	/// - `B2B_INVITATION_EMAIL_SUBJECT` (default `Invitation from {{orgname}}`)
	/// - `B2B_INVITER_RESPONSE_EMAIL`
	/// - `B2B_INVITE_TEMPLATE_ID`, `B2B_INVITE_TEMPLATE_CONTENT`
	pub fn from_env() -> Result<Self, ConfigError> {
		let inviting_organization = require_env("B2B_INVITING_ORGANIZATION")?;

		let graph_resource = env_or("B2B_GRAPH_RESOURCE", DEFAULT_GRAPH_RESOURCE);
		if !graph_resource.starts_with("http://") && !graph_resource.starts_with("https://") {
			return Err(ConfigError::invalid(
				"B2B_GRAPH_RESOURCE",
				"must be an http(s) URL",
			));
		}

		Ok(Self {
			graph_resource,
			graph_api_version: env_or("B2B_GRAPH_API_VERSION", DEFAULT_GRAPH_API_VERSION),
			use_smtp: env_flag("B2B_USE_SMTP", false)?,
			site_redemption_settings: RedemptionSettings {
				inviter_response_email_addr: env_or("B2B_INVITER_RESPONSE_EMAIL", ""),
			},
			site_invite_template_content: InviteTemplate {
				id: std::env::var("B2B_INVITE_TEMPLATE_ID").ok(),
				template_content: std::env::var("B2B_INVITE_TEMPLATE_CONTENT").ok(),
			},
			inviting_organization,
			invitation_email_subject: env_or("B2B_INVITATION_EMAIL_SUBJECT", DEFAULT_EMAIL_SUBJECT),
		})
	}

	pub fn with_graph_resource(mut self, graph_resource: impl Into<String>) -> Self {
		self.graph_resource = graph_resource.into();
		self
	}

	pub fn with_use_smtp(mut self, use_smtp: bool) -> Self {
		self.use_smtp = use_smtp;
		self
	}

	pub fn with_site_template(mut self, template: InviteTemplate) -> Self {
		self.site_invite_template_content = template;
		self
	}

	pub fn with_site_redemption(mut self, redemption: RedemptionSettings) -> Self {
		self.site_redemption_settings = redemption;
		self
	}

	fn base(&self) -> &str {
		self.graph_resource.trim_end_matches('/')
	}

	pub fn invitations_url(&self) -> String {
		format!("{}/{}/invitations", self.base(), self.graph_api_version)
	}

	pub fn member_of_url(&self, upn: &str) -> String {
		format!(
			"{}/{}/users/{}/memberOf",
			self.base(),
			self.graph_api_version,
			urlencoding::encode(upn)
		)
	}

	pub fn group_members_url(&self, group_id: &str) -> String {
		format!(
			"{}/{GROUP_API_VERSION}/groups/{}/members/$ref",
			self.base(),
			urlencoding::encode(group_id)
		)
	}

	pub fn email_subject(&self) -> String {
		self
			.invitation_email_subject
			.replace("{{orgname}}", &self.inviting_organization)
	}
}
