// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! App-only access tokens via the OAuth 2.0 client-credentials grant.

use std::time::Duration;

use b2b_common_config::SecretString;
use b2b_common_http::{is_retryable_status, retry, RetryConfig};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::caller::GraphResponse;
use crate::config::GraphClientConfig;
use crate::error::GraphError;

/// Tokens are refreshed this long before the identity platform says they
/// expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct TokenResponse {
	access_token: SecretString,
	expires_in: u64,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
	error: String,
	error_description: Option<String>,
}

struct CachedToken {
	token: SecretString,
	expires_at: Instant,
}

/// Fetches and caches a bearer token for one app registration.
///
/// Concurrent callers share the lock, so at most one token request is in
/// flight at a time.
pub struct TokenCache {
	http_client: Client,
	token_endpoint: String,
	client_id: String,
	client_secret: SecretString,
	scope: String,
	retry_config: RetryConfig,
	cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenCache")
			.field("token_endpoint", &self.token_endpoint)
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("scope", &self.scope)
			.finish_non_exhaustive()
	}
}

impl TokenCache {
	pub fn new(http_client: Client, config: &GraphClientConfig) -> Self {
		Self {
			http_client,
			token_endpoint: config.token_endpoint(),
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			scope: config.scope(),
			retry_config: config.retry_config.clone(),
			cached: Mutex::new(None),
		}
	}

	/// Return a token valid for at least [`REFRESH_MARGIN`], requesting a new
	/// one when the cached token is missing or about to expire.
	#[instrument(skip(self), fields(client_id = %self.client_id))]
	pub async fn access_token(&self) -> Result<SecretString, GraphError> {
		let mut cached = self.cached.lock().await;

		if let Some(current) = cached.as_ref() {
			if current.expires_at > Instant::now() + REFRESH_MARGIN {
				return Ok(current.token.clone());
			}
			debug!("cached token near expiry, refreshing");
		}

		let fresh = retry(&self.retry_config, || self.request_token()).await?;
		let token = fresh.access_token.clone();
		*cached = Some(CachedToken {
			token: fresh.access_token,
			expires_at: Instant::now() + Duration::from_secs(fresh.expires_in),
		});

		debug!(expires_in = fresh.expires_in, "acquired Graph access token");
		Ok(token)
	}

	/// Drop the cached token so the next call requests a new one.
	pub async fn invalidate(&self) {
		self.cached.lock().await.take();
	}

	async fn request_token(&self) -> Result<TokenResponse, GraphError> {
		let response = self
			.http_client
			.post(&self.token_endpoint)
			.header("Accept", "application/json")
			.form(&[
				("grant_type", "client_credentials"),
				("client_id", self.client_id.as_str()),
				("client_secret", self.client_secret.expose().as_str()),
				("scope", self.scope.as_str()),
			])
			.send()
			.await
			.map_err(GraphError::from_reqwest)?;

		let status = response.status();
		let body = response.text().await.map_err(GraphError::from_reqwest)?;

		if !status.is_success() {
			if is_retryable_status(status) {
				return Err(GraphError::Transient(GraphResponse::from_http(status, body)));
			}

			let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
				Ok(err) => err.error_description.unwrap_or(err.error),
				Err(_) => format!("token endpoint returned {status}"),
			};
			return Err(GraphError::TokenRejected(reason));
		}

		serde_json::from_str(&body)
			.map_err(|e| GraphError::InvalidResponse(format!("failed to parse token response: {e}")))
	}
}
