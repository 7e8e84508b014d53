// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Production [`GraphCaller`] backed by `reqwest`.

use async_trait::async_trait;
use b2b_common_http::{is_retryable_status, retry};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use crate::caller::{GraphCaller, GraphResponse};
use crate::config::GraphClientConfig;
use crate::error::GraphError;
use crate::token::TokenCache;

/// Graph client authenticating as an application.
///
/// POSTs are sent once. GETs are retried on throttling, 5xx and connection
/// failures according to the configured [`b2b_common_http::RetryConfig`].
#[derive(Debug)]
pub struct GraphClient {
	http_client: Client,
	tokens: TokenCache,
	config: GraphClientConfig,
}

impl GraphClient {
	pub fn new(config: GraphClientConfig) -> Result<Self, GraphError> {
		let http_client = b2b_common_http::builder()
			.timeout(config.request_timeout)
			.build()
			.map_err(|e| GraphError::Config(format!("failed to build HTTP client: {e}")))?;

		let tokens = TokenCache::new(http_client.clone(), &config);

		Ok(Self {
			http_client,
			tokens,
			config,
		})
	}

	pub fn config(&self) -> &GraphClientConfig {
		&self.config
	}

	async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<GraphResponse, GraphError> {
		let token = self.tokens.access_token().await?;

		let mut request = self
			.http_client
			.request(method, url)
			.bearer_auth(token.expose())
			.header("Accept", "application/json");

		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await.map_err(GraphError::from_reqwest)?;
		let status = response.status();
		let text = response.text().await.map_err(GraphError::from_reqwest)?;

		debug!(status = %status, "received Graph response");
		trace!(body = %text, "Graph response body");

		if status == StatusCode::UNAUTHORIZED {
			// Token revoked or rotated server-side; the next call fetches a new one.
			self.tokens.invalidate().await;
		}

		Ok(GraphResponse::from_http(status, text))
	}

	async fn get_with_retry(&self, url: &str) -> Result<GraphResponse, GraphError> {
		let outcome = retry(&self.config.retry_config, || async {
			let response = self.send(Method::GET, url, None).await?;
			let transient = StatusCode::from_u16(response.status)
				.map(is_retryable_status)
				.unwrap_or(false);

			if !response.successful && transient {
				Err(GraphError::Transient(response))
			} else {
				Ok(response)
			}
		})
		.await;

		match outcome {
			Err(GraphError::Transient(response)) => Ok(response),
			other => other,
		}
	}
}

#[async_trait]
impl GraphCaller for GraphClient {
	#[instrument(skip(self, body), fields(has_body = body.is_some()))]
	async fn call(&self, url: &str, body: Option<&Value>) -> Result<GraphResponse, GraphError> {
		let response = match body {
			Some(body) => self.send(Method::POST, url, Some(body)).await?,
			None => self.get_with_retry(url).await?,
		};

		if !response.successful {
			warn!(status = response.status, message = %response.message, "Graph call unsuccessful");
		}

		Ok(response)
	}
}
