// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities.
//!
//! This crate provides:
//! - A pre-configured [`reqwest`] client builder with the service User-Agent
//! - Retry with exponential backoff for transient failures

mod client;
mod retry;

pub use client::{builder, user_agent};
pub use retry::{is_retryable_status, retry, RetryConfig, RetryableError};
