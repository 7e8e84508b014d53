// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP delivery for invitation notification emails.
//!
//! When a deployment sends invitations itself instead of letting the
//! directory service mail them, the rendered notification goes out through a
//! [`MailSender`]. [`SmtpClient`] is the [`lettre`]-backed implementation.
//!
//! ```no_run
//! use b2b_server_smtp::{MailSender, SmtpClient, SmtpConfig};
//!
//! # async fn example() -> Result<(), b2b_server_smtp::SmtpError> {
//! let client = SmtpClient::new(SmtpConfig::from_env()?)?;
//! client
//! 	.send_message("guest@fabrikam.com", "Invitation from Contoso", "<p>Welcome</p>")
//! 	.await?;
//! # Ok(())
//! # }
//! ```

use std::env;

use async_trait::async_trait;
use b2b_common_config::{load_secret_env, SecretString};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};

const DEFAULT_FROM_NAME: &str = "B2B Invitations";

#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	#[error("connection failed: {0}")]
	Connection(String),

	#[error("send failed: {0}")]
	Send(String),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("invalid email address: {0}")]
	Address(String),
}

/// Sends one message to one recipient. The body is HTML.
#[async_trait]
pub trait MailSender: Send + Sync {
	async fn send_message(&self, to: &str, subject: &str, body: &str) -> Result<(), SmtpError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: String,
	pub from_name: String,
	/// STARTTLS. Defaults to `true`.
	#[serde(default = "default_use_tls")]
	pub use_tls: bool,
}

fn default_use_tls() -> bool {
	true
}

impl SmtpConfig {
	/// Load SMTP configuration from the environment.
	///
	/// - `B2B_SMTP_HOST` (required)
	/// - `B2B_SMTP_PORT` (default 587)
	/// - `B2B_SMTP_USERNAME`, `B2B_SMTP_PASSWORD` / `B2B_SMTP_PASSWORD_FILE`
	/// - `B2B_SMTP_FROM_ADDRESS` (required)
	/// - `B2B_SMTP_FROM_NAME` (default "B2B Invitations")
	/// - `B2B_SMTP_USE_TLS` (default true)
	pub fn from_env() -> Result<Self, SmtpError> {
		let host = env::var("B2B_SMTP_HOST")
			.map_err(|_| SmtpError::Config("B2B_SMTP_HOST is required".into()))?;

		let port = env::var("B2B_SMTP_PORT")
			.unwrap_or_else(|_| "587".into())
			.parse()
			.map_err(|_| SmtpError::Config("B2B_SMTP_PORT must be a valid port number".into()))?;

		let username = env::var("B2B_SMTP_USERNAME").ok();
		let password =
			load_secret_env("B2B_SMTP_PASSWORD").map_err(|e| SmtpError::Config(e.to_string()))?;

		let from_address = env::var("B2B_SMTP_FROM_ADDRESS")
			.map_err(|_| SmtpError::Config("B2B_SMTP_FROM_ADDRESS is required".into()))?;

		let from_name = env::var("B2B_SMTP_FROM_NAME").unwrap_or_else(|_| DEFAULT_FROM_NAME.into());

		let use_tls = env::var("B2B_SMTP_USE_TLS")
			.map(|v| v.to_lowercase() != "false" && v != "0")
			.unwrap_or(true);

		Ok(Self {
			host,
			port,
			username,
			password,
			from_address,
			from_name,
			use_tls,
		})
	}
}

/// Async SMTP client. Connections are opened lazily and pooled by [`lettre`].
pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
	)]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (config.username, config.password) {
			builder = builder.credentials(Credentials::new(username, password.into_inner()));
		}

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport: builder.build(),
			from_mailbox,
		})
	}

	/// Open a connection to verify the server is reachable.
	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		self
			.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		Ok(())
	}
}

#[async_trait]
impl MailSender for SmtpClient {
	#[tracing::instrument(name = "smtp_send_message", skip(self, body), fields(to = %to, subject = %subject))]
	async fn send_message(&self, to: &str, subject: &str, body: &str) -> Result<(), SmtpError> {
		let message = build_message(self.from_mailbox.clone(), to, subject, body)?;

		self
			.transport
			.send(message)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;

		tracing::info!("notification email sent");
		Ok(())
	}
}

fn build_message(from: Mailbox, to: &str, subject: &str, body: &str) -> Result<Message, SmtpError> {
	let to_mailbox: Mailbox = to.parse().map_err(|e| SmtpError::Address(format!("{e}")))?;

	Message::builder()
		.from(from)
		.to(to_mailbox)
		.subject(subject)
		.header(ContentType::TEXT_HTML)
		.body(body.to_string())
		.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))
}

/// Syntactic check only; says nothing about deliverability.
pub fn is_valid_email(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}
