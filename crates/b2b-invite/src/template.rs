// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Notification email rendering.
//!
//! Recognized tokens:
//!
//! | token | value |
//! |-------|-------|
//! | `{{InvitingOrgName}}` | inviting organization |
//! | `{{InvitationLink}}` | `inviteRedeemUrl` from the invitation response |
//! | `{{OrgContactEmail}}` | inviter contact address from the redemption settings |
//!
//! Any other `{{...}}` text is left as is.

use b2b_graph::GraphInvitation;

use crate::models::RedemptionSettings;

pub const TOKEN_ORG_NAME: &str = "{{InvitingOrgName}}";
pub const TOKEN_INVITATION_LINK: &str = "{{InvitationLink}}";
pub const TOKEN_CONTACT_EMAIL: &str = "{{OrgContactEmail}}";

pub fn format_email_body(
	template: &str,
	invitation: &GraphInvitation,
	redemption: &RedemptionSettings,
	org_name: &str,
) -> String {
	let link = invitation.invite_redeem_url.as_deref().unwrap_or_default();

	template
		.replace(TOKEN_ORG_NAME, org_name)
		.replace(TOKEN_INVITATION_LINK, link)
		.replace(TOKEN_CONTACT_EMAIL, &redemption.inviter_response_email_addr)
}
