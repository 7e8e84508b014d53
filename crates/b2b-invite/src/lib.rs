// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Guest (B2B) invitations for an organization's directory.
//!
//! [`InviteManager`] builds the invitation payload for a [`GuestRequest`],
//! posts it through a [`b2b_graph::GraphCaller`], adds the new user to the
//! groups configured for their [`PreAuthDomain`] and, when the site sends
//! invitations itself, mails a notification rendered by [`format_email_body`].
//! It also looks up the directory roles of a user.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use b2b_graph::{GraphClient, GraphClientConfig};
//! use b2b_invite::{GuestRequest, InviteManager, InviteSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = GraphClient::new(GraphClientConfig::from_env()?)?;
//! let manager = InviteManager::new(InviteSettings::from_env()?, Arc::new(graph));
//!
//! let request = GuestRequest::new("Ada", "Lovelace", "ada@fabrikam.com");
//! let status = manager
//! 	.send_invitation(&request, "https://portal.contoso.com/profile", None)
//! 	.await;
//! if status.starts_with("Error:") {
//! 	eprintln!("{status}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod template;

pub use config::InviteSettings;
pub use error::InviteError;
pub use manager::{GroupMembershipReport, InvitationOutcome, InviteManager, RoleResponse};
pub use models::{GuestRequest, InviteTemplate, MemberType, PreAuthDomain, RedemptionSettings};
pub use template::format_email_body;
