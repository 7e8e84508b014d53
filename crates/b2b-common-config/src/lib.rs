// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration primitives shared by the B2B invitation crates.
//!
//! - [`Secret<T>`]: wraps client secrets, SMTP passwords and bearer tokens so
//!   they never reach logs
//! - [`load_secret_env`]: reads a secret from `VAR` or from the file named by
//!   `VAR_FILE`
//! - [`env_or`] / [`env_flag`]: plain settings with defaults

pub mod env;
pub mod secret;

pub use env::{env_flag, env_or, load_secret_env, require_env, ConfigError, SecretEnvError};
pub use secret::{Secret, SecretString, REDACTED};
