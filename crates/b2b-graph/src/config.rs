// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Graph client.

use std::time::Duration;

use b2b_common_config::{env_or, load_secret_env, require_env, ConfigError, SecretString};
use b2b_common_http::RetryConfig;
use reqwest::Url;

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_RESOURCE: &str = "https://graph.microsoft.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// App registration used to call Graph with application permissions
/// (`User.Invite.All`, `GroupMember.ReadWrite.All`, `Directory.Read.All`).
#[derive(Debug, Clone)]
pub struct GraphClientConfig {
	pub tenant_id: String,
	pub client_id: String,
	pub client_secret: SecretString,
	/// Identity platform host, without tenant.
	pub authority: Url,
	/// Resource the token is requested for; the scope is `{resource}/.default`.
	pub resource: String,
	pub request_timeout: Duration,
	pub retry_config: RetryConfig,
}

impl GraphClientConfig {
	pub fn new(
		tenant_id: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<SecretString>,
	) -> Self {
		Self {
			tenant_id: tenant_id.into(),
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			authority: Url::parse(DEFAULT_AUTHORITY).expect("default authority is valid"),
			resource: DEFAULT_RESOURCE.to_string(),
			request_timeout: DEFAULT_TIMEOUT,
			retry_config: RetryConfig::default(),
		}
	}

	/// Load configuration from the environment.
	///
	/// Required:
	/// - `B2B_GRAPH_TENANT_ID`
	/// - `B2B_GRAPH_CLIENT_ID`
	/// - `B2B_GRAPH_CLIENT_SECRET` (or `B2B_GRAPH_CLIENT_SECRET_FILE`)
	///
	/// Optional:
	/// - `B2B_GRAPH_AUTHORITY` (default `https://login.microsoftonline.com`)
	/// - `B2B_GRAPH_RESOURCE` (default `https://graph.microsoft.com`)
	pub fn from_env() -> Result<Self, ConfigError> {
		let tenant_id = require_env("B2B_GRAPH_TENANT_ID")?;
		let client_id = require_env("B2B_GRAPH_CLIENT_ID")?;
		let client_secret = load_secret_env("B2B_GRAPH_CLIENT_SECRET")?
			.filter(|s| !s.is_empty())
			.ok_or_else(|| ConfigError::Missing("B2B_GRAPH_CLIENT_SECRET".to_string()))?;

		let authority_raw = env_or("B2B_GRAPH_AUTHORITY", DEFAULT_AUTHORITY);
		let authority = parse_authority(&authority_raw)
			.map_err(|reason| ConfigError::invalid("B2B_GRAPH_AUTHORITY", reason))?;

		Ok(Self {
			tenant_id,
			client_id,
			client_secret,
			authority,
			resource: env_or("B2B_GRAPH_RESOURCE", DEFAULT_RESOURCE),
			request_timeout: DEFAULT_TIMEOUT,
			retry_config: RetryConfig::default(),
		})
	}

	/// Point token requests at another identity host (sovereign clouds, tests).
	pub fn with_authority(mut self, authority: &str) -> Result<Self, ConfigError> {
		self.authority = parse_authority(authority)
			.map_err(|reason| ConfigError::invalid("authority", reason))?;
		Ok(self)
	}

	pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
		self.resource = resource.into();
		self
	}

	pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	/// `{authority}/{tenant}/oauth2/v2.0/token`
	pub fn token_endpoint(&self) -> String {
		format!(
			"{}/{}/oauth2/v2.0/token",
			self.authority.as_str().trim_end_matches('/'),
			self.tenant_id
		)
	}

	/// `{resource}/.default`
	pub fn scope(&self) -> String {
		format!("{}/.default", self.resource.trim_end_matches('/'))
	}
}

fn parse_authority(raw: &str) -> Result<Url, String> {
	let url = Url::parse(raw).map_err(|e| format!("'{raw}' is not a valid URL: {e}"))?;
	if url.host_str().is_none() {
		return Err(format!("'{raw}' has no host"));
	}
	Ok(url)
}
