// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Secrets follow the `VAR` / `VAR_FILE` convention used by Docker and
//! Kubernetes secret mounts: when `VAR_FILE` is set, the secret is read from
//! that path (one trailing newline stripped); otherwise `VAR` is used as-is.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::secret::SecretString;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Errors raised while building typed configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("missing environment variable: {0}")]
	Missing(String),

	#[error("invalid value for {var}: {reason}")]
	Invalid { var: String, reason: String },

	#[error(transparent)]
	Secret(#[from] SecretEnvError),
}

impl ConfigError {
	pub fn invalid(var: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Invalid {
			var: var.into(),
			reason: reason.into(),
		}
	}
}

/// Load a secret from `{var}_FILE` or `{var}`, in that order.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(path_str);
		let content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		let value = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(value)));
	}

	Ok(env::var(var).ok().map(SecretString::new))
}

/// Read a required, non-empty variable.
pub fn require_env(var: &str) -> Result<String, ConfigError> {
	match env::var(var) {
		Ok(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(ConfigError::Missing(var.to_string())),
	}
}

/// Read a variable, falling back to `default` when unset.
pub fn env_or(var: &str, default: &str) -> String {
	env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag. `true`/`1`/`yes`/`on` (any case) enable it,
/// `false`/`0`/`no`/`off` disable it; unset returns `default`.
pub fn env_flag(var: &str, default: bool) -> Result<bool, ConfigError> {
	let Ok(raw) = env::var(var) else {
		return Ok(default);
	};

	match raw.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		other => Err(ConfigError::invalid(var, format!("expected a boolean, got '{other}'"))),
	}
}
