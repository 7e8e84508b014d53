// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Microsoft Graph access for the B2B invitation service.
//!
//! The orchestrator talks to the directory only through [`GraphCaller`]: give
//! it a URL and an optional JSON body, get back a [`GraphResponse`] carrying a
//! coarse success flag, a human-readable message and the raw response text.
//! [`GraphClient`] is the production implementation; it acquires app-only
//! tokens with the OAuth 2.0 client-credentials grant and caches them until
//! shortly before expiry.
//!
//! The directory's JSON schemas for invitations, group member references and
//! directory role objects live in [`types`].

pub mod caller;
pub mod client;
pub mod config;
pub mod error;
pub mod token;
pub mod types;

pub use caller::{GraphCaller, GraphResponse};
pub use client::GraphClient;
pub use config::GraphClientConfig;
pub use error::GraphError;
pub use token::TokenCache;
pub use types::{
	GraphGroupAdd, GraphInvitation, GraphInvitedUser, GraphMemberRole, InvitedUserMessageInfo,
};
