// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use reqwest::{Client, ClientBuilder};

/// Client builder preloaded with the service User-Agent.
///
/// ```ignore
/// let client = b2b_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// `b2b-invite/{crate version}`
pub fn user_agent() -> String {
	format!("b2b-invite/{}", env!("CARGO_PKG_VERSION"))
}
