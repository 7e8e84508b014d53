// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation orchestration and role lookup.

use std::sync::Arc;

use b2b_graph::{
	GraphCaller, GraphGroupAdd, GraphInvitation, GraphMemberRole, InvitedUserMessageInfo,
};
use b2b_server_smtp::MailSender;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::InviteSettings;
use crate::error::InviteError;
use crate::models::{GuestRequest, InviteTemplate, MemberType, PreAuthDomain, RedemptionSettings};
use crate::template::format_email_body;

/// Result of a directory role lookup. Faults never escape; they show up as
/// `successful == false` with `error_message` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
	pub roles: Vec<GraphMemberRole>,
	pub successful: bool,
	pub error_message: String,
}

impl RoleResponse {
	fn failed(message: impl Into<String>) -> Self {
		Self {
			roles: Vec::new(),
			successful: false,
			error_message: message.into(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembershipReport {
	pub user_id: String,
	/// Every group tried, in call order.
	pub attempted: Vec<String>,
	pub failed: Vec<String>,
}

impl GroupMembershipReport {
	pub fn all_succeeded(&self) -> bool {
		self.failed.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationOutcome {
	/// Invitation status reported by Graph, e.g. `PendingAcceptance`.
	pub status: String,
	pub invitation: GraphInvitation,
	/// Present when the guest's domain lists groups.
	pub groups: Option<GroupMembershipReport>,
}

#[derive(Debug)]
struct Effective<'a> {
	redemption: &'a RedemptionSettings,
	template: &'a InviteTemplate,
	member_type: MemberType,
	use_custom_template: bool,
}

pub struct InviteManager {
	settings: InviteSettings,
	graph: Arc<dyn GraphCaller>,
	mail: Option<Arc<dyn MailSender>>,
}

impl std::fmt::Debug for InviteManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InviteManager")
			.field("settings", &self.settings)
			.field("mail", &self.mail.is_some())
			.finish_non_exhaustive()
	}
}

impl InviteManager {
	pub fn new(settings: InviteSettings, graph: Arc<dyn GraphCaller>) -> Self {
		Self {
			settings,
			graph,
			mail: None,
		}
	}

	/// Attach a sender for notification emails. Only used when
	/// [`InviteSettings::use_smtp`] is set.
	pub fn with_mail_sender(mut self, mail: Arc<dyn MailSender>) -> Self {
		self.mail = Some(mail);
		self
	}

	pub fn settings(&self) -> &InviteSettings {
		&self.settings
	}

	fn effective<'a>(&'a self, domain: Option<&'a PreAuthDomain>) -> Effective<'a> {
		match domain {
			Some(domain) => Effective {
				redemption: &domain.domain_redemption_settings,
				template: &domain.invite_template_content,
				member_type: domain.member_type,
				use_custom_template: domain.has_custom_template(),
			},
			None => Effective {
				redemption: &self.settings.site_redemption_settings,
				template: &self.settings.site_invite_template_content,
				member_type: MemberType::Guest,
				use_custom_template: false,
			},
		}
	}

	/// Build the `POST /invitations` payload for `request`.
	pub fn build_invitation(
		&self,
		request: &GuestRequest,
		profile_url: &str,
		domain: Option<&PreAuthDomain>,
	) -> GraphInvitation {
		let effective = self.effective(domain);
		let send_invitation_message = !self.settings.use_smtp;

		let invited_user_message_info = match domain {
			Some(domain) if effective.use_custom_template && send_invitation_message => domain
				.invite_template_content
				.template_content
				.clone()
				.map(|body| InvitedUserMessageInfo {
					customized_message_body: Some(body),
				}),
			_ => None,
		};

		GraphInvitation {
			invited_user_display_name: request.display_name(),
			invited_user_email_address: request.email_address.clone(),
			invite_redirect_url: profile_url.to_string(),
			send_invitation_message,
			invited_user_type: effective.member_type.to_string(),
			invited_user_message_info,
			..Default::default()
		}
	}

	/// Invite a guest and return the invitation status, or a string starting
	/// with `Error:` describing why it failed.
	pub async fn send_invitation(
		&self,
		request: &GuestRequest,
		profile_url: &str,
		domain: Option<&PreAuthDomain>,
	) -> String {
		match self.try_send_invitation(request, profile_url, domain).await {
			Ok(outcome) => outcome.status,
			Err(err) => {
				warn!(error = %err, "invitation failed");
				err.status_message()
			}
		}
	}

	#[instrument(skip(self, request, domain), fields(email = %request.email_address, domain = domain.map(|d| d.domain.as_str())))]
	pub async fn try_send_invitation(
		&self,
		request: &GuestRequest,
		profile_url: &str,
		domain: Option<&PreAuthDomain>,
	) -> Result<InvitationOutcome, InviteError> {
		let invitation = self.build_invitation(request, profile_url, domain);
		let body = serde_json::to_value(&invitation)?;

		let response = self
			.graph
			.call(&self.settings.invitations_url(), Some(&body))
			.await
			.map_err(|source| InviteError::Graph {
				source,
				server_response: None,
			})?;

		let created: GraphInvitation = match serde_json::from_str(&response.response_content) {
			Ok(created) => created,
			// Error pages and empty bodies carry nothing beyond the status.
			Err(_) if !response.successful => {
				return Err(InviteError::Rejected {
					message: response.message,
				});
			}
			Err(e) => {
				return Err(InviteError::InvalidResponse {
					reason: format!("failed to parse invitation response: {e}"),
					server_response: response.response_content,
				});
			}
		};

		if created.id.is_none() {
			return Err(InviteError::Rejected {
				message: response.message,
			});
		}

		let groups = match domain.filter(|d| !d.groups.is_empty()) {
			Some(domain) => {
				let user_id = created
					.invited_user
					.as_ref()
					.map(|user| user.id.as_str())
					.filter(|id| !id.is_empty())
					.ok_or_else(|| InviteError::InvalidResponse {
						reason: "invitation response has no invited user id".to_string(),
						server_response: response.response_content.clone(),
					})?;

				let report = self.add_user_to_groups(user_id, &domain.groups).await;
				if !report.all_succeeded() {
					warn!(user_id, failed = ?report.failed, "could not add invited user to all groups");
				}
				Some(report)
			}
			None => None,
		};

		if self.settings.use_smtp {
			let effective = self.effective(domain);
			self.notify(&invitation.invited_user_email_address, &created, &effective).await;
		}

		let status = created.status.clone().unwrap_or_default();
		info!(status = %status, "invitation created");

		Ok(InvitationOutcome {
			status,
			invitation: created,
			groups,
		})
	}

	async fn notify(&self, to: &str, created: &GraphInvitation, effective: &Effective<'_>) {
		let Some(mail) = self.mail.as_ref() else {
			debug!("no mail sender attached, skipping notification email");
			return;
		};

		let Some(template) = effective.template.template_content.as_deref() else {
			warn!("no invitation template content, skipping notification email");
			return;
		};

		let subject = self.settings.email_subject();
		let body = format_email_body(
			template,
			created,
			effective.redemption,
			&self.settings.inviting_organization,
		);

		if let Err(e) = mail.send_message(to, &subject, &body).await {
			warn!(error = %e, "failed to send notification email");
		}
	}

	/// Add `user_id` to each group in order. `true` only when every add
	/// succeeded; a failure does not stop the remaining adds.
	pub async fn add_user_to_group(&self, user_id: &str, group_ids: &[String]) -> bool {
		self.add_user_to_groups(user_id, group_ids).await.all_succeeded()
	}

	#[instrument(skip(self, group_ids), fields(groups = group_ids.len()))]
	pub async fn add_user_to_groups(&self, user_id: &str, group_ids: &[String]) -> GroupMembershipReport {
		let mut report = GroupMembershipReport {
			user_id: user_id.to_string(),
			..Default::default()
		};

		let body = match serde_json::to_value(GraphGroupAdd::new(&self.settings.graph_resource, user_id)) {
			Ok(body) => body,
			Err(e) => {
				warn!(error = %e, "failed to serialize group member reference");
				report.failed = group_ids.to_vec();
				return report;
			}
		};

		for group_id in group_ids {
			report.attempted.push(group_id.clone());
			let url = self.settings.group_members_url(group_id);

			match self.graph.call(&url, Some(&body)).await {
				Ok(response) if response.successful => {
					debug!(group_id = %group_id, "added user to group");
				}
				Ok(response) => {
					warn!(group_id = %group_id, message = %response.message, "group add rejected");
					report.failed.push(group_id.clone());
				}
				Err(e) => {
					warn!(group_id = %group_id, error = %e, "group add failed");
					report.failed.push(group_id.clone());
				}
			}
		}

		report
	}

	/// Directory roles and groups `upn` is a member of, in the order Graph
	/// returns them.
	#[instrument(skip(self))]
	pub async fn get_directory_roles(&self, upn: &str) -> RoleResponse {
		let response = match self.graph.call(&self.settings.member_of_url(upn), None).await {
			Ok(response) => response,
			Err(e) => {
				warn!(error = %e, "role lookup failed");
				return RoleResponse::failed(e.to_string());
			}
		};

		if !response.successful {
			return RoleResponse::failed(response.message);
		}

		match parse_roles(&response.response_content) {
			Ok(roles) => RoleResponse {
				roles,
				successful: true,
				error_message: response.message,
			},
			Err(reason) => {
				warn!(reason = %reason, "malformed memberOf response");
				RoleResponse::failed(reason)
			}
		}
	}
}

fn parse_roles(content: &str) -> Result<Vec<GraphMemberRole>, String> {
	let mut data: Value =
		serde_json::from_str(content).map_err(|e| format!("failed to parse memberOf response: {e}"))?;

	let Some(Value::Array(values)) = data.get_mut("value").map(Value::take) else {
		return Err("memberOf response has no value array".to_string());
	};

	values
		.into_iter()
		.map(|value| serde_json::from_value(value).map_err(|e| format!("failed to parse role: {e}")))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use b2b_graph::{GraphError, GraphResponse};
	use b2b_server_smtp::SmtpError;
	use reqwest::StatusCode;
	use serde_json::json;
	use std::collections::VecDeque;
	use std::sync::Mutex;

	type Call = (String, Option<Value>);

	/// Records every call and answers from a queue; an empty queue answers
	/// `200 {}`.
	#[derive(Default)]
	struct FakeGraph {
		calls: Mutex<Vec<Call>>,
		responses: Mutex<VecDeque<Result<GraphResponse, GraphError>>>,
	}

	impl FakeGraph {
		fn with(responses: Vec<Result<GraphResponse, GraphError>>) -> Arc<Self> {
			Arc::new(Self {
				calls: Mutex::new(Vec::new()),
				responses: Mutex::new(responses.into()),
			})
		}

		fn calls(&self) -> Vec<Call> {
			self.calls.lock().unwrap().clone()
		}

		fn urls(&self) -> Vec<String> {
			self.calls().into_iter().map(|(url, _)| url).collect()
		}
	}

	#[async_trait]
	impl GraphCaller for FakeGraph {
		async fn call(&self, url: &str, body: Option<&Value>) -> Result<GraphResponse, GraphError> {
			self.calls.lock().unwrap().push((url.to_string(), body.cloned()));
			self
				.responses
				.lock()
				.unwrap()
				.pop_front()
				.unwrap_or_else(|| Ok(GraphResponse::success(200, "{}")))
		}
	}

	#[derive(Default)]
	struct FakeMail {
		sent: Mutex<Vec<(String, String, String)>>,
		fail: bool,
	}

	#[async_trait]
	impl MailSender for FakeMail {
		async fn send_message(&self, to: &str, subject: &str, body: &str) -> Result<(), SmtpError> {
			self
				.sent
				.lock()
				.unwrap()
				.push((to.to_string(), subject.to_string(), body.to_string()));
			if self.fail {
				return Err(SmtpError::Send("relay refused".to_string()));
			}
			Ok(())
		}
	}

	const REDEEM_URL: &str = "https://login.microsoftonline.com/redeem?rd=abc";

	fn created() -> Result<GraphResponse, GraphError> {
		Ok(GraphResponse::success(
			201,
			json!({
				"id": "inv-1",
				"status": "PendingAcceptance",
				"inviteRedeemUrl": REDEEM_URL,
				"invitedUser": { "id": "user-1" }
			})
			.to_string(),
		))
	}

	fn rejected(status: u16, message: &str) -> Result<GraphResponse, GraphError> {
		Ok(GraphResponse::failure(status, message, "{}"))
	}

	fn guest() -> GuestRequest {
		GuestRequest::new("Ada", "Lovelace", "ada@fabrikam.com")
	}

	fn settings() -> InviteSettings {
		InviteSettings::new("Contoso").with_graph_resource("https://graph.test")
	}

	fn domain() -> PreAuthDomain {
		PreAuthDomain {
			domain: "fabrikam.com".to_string(),
			domain_redemption_settings: RedemptionSettings {
				inviter_response_email_addr: "fabrikam-partners@contoso.com".to_string(),
			},
			invite_template_id: Some("tpl-1".to_string()),
			invite_template_content: InviteTemplate {
				id: Some("tpl-1".to_string()),
				template_content: Some("Welcome from {{InvitingOrgName}}: {{InvitationLink}}".to_string()),
			},
			member_type: MemberType::Member,
			groups: Vec::new(),
		}
	}

	fn manager(settings: InviteSettings, graph: Arc<FakeGraph>) -> InviteManager {
		InviteManager::new(settings, graph)
	}

	fn sent_body(graph: &FakeGraph) -> Value {
		graph.calls()[0].1.clone().unwrap()
	}

	#[tokio::test]
	async fn default_payload_uses_guest_and_graph_mailer() {
		let graph = FakeGraph::with(vec![created()]);
		let manager = manager(settings(), graph.clone());

		let status = manager
			.send_invitation(&guest(), "https://portal.contoso.com/profile", None)
			.await;

		assert_eq!(status, "PendingAcceptance");
		assert_eq!(graph.urls(), vec!["https://graph.test/v1.0/invitations"]);
		assert_eq!(
			sent_body(&graph),
			json!({
				"invitedUserDisplayName": "Ada Lovelace",
				"invitedUserEmailAddress": "ada@fabrikam.com",
				"inviteRedirectUrl": "https://portal.contoso.com/profile",
				"sendInvitationMessage": true,
				"invitedUserType": "Guest"
			})
		);
	}

	#[test]
	fn smtp_mode_disables_graph_mailer() {
		let manager = manager(settings().with_use_smtp(true), FakeGraph::with(vec![]));
		let invitation = manager.build_invitation(&guest(), "https://p", None);
		assert!(!invitation.send_invitation_message);
		assert_eq!(invitation.invited_user_type, "Guest");
	}

	#[test]
	fn domain_template_becomes_customized_body() {
		let manager = manager(settings(), FakeGraph::with(vec![]));
		let domain = domain();

		let invitation = manager.build_invitation(&guest(), "https://p", Some(&domain));

		assert_eq!(invitation.invited_user_type, "Member");
		assert_eq!(
			invitation.invited_user_message_info,
			Some(InvitedUserMessageInfo {
				customized_message_body: domain.invite_template_content.template_content.clone(),
			})
		);
	}

	#[test]
	fn customized_body_needs_id_graph_mailer_and_content() {
		let no_id = PreAuthDomain {
			invite_template_id: None,
			..domain()
		};
		let no_content = PreAuthDomain {
			invite_template_content: InviteTemplate {
				id: Some("tpl-1".to_string()),
				template_content: None,
			},
			..domain()
		};

		let graph_mailer = manager(settings(), FakeGraph::with(vec![]));
		let smtp = manager(settings().with_use_smtp(true), FakeGraph::with(vec![]));

		for (manager, domain) in [(&graph_mailer, no_id), (&graph_mailer, no_content), (&smtp, domain())] {
			let invitation = manager.build_invitation(&guest(), "https://p", Some(&domain));
			assert!(invitation.invited_user_message_info.is_none());
		}
	}

	#[tokio::test]
	async fn missing_id_is_reported_with_transport_message() {
		let graph = FakeGraph::with(vec![Ok(GraphResponse::failure(
			400,
			"BadRequest: The invited user already exists.",
			json!({ "error": { "code": "BadRequest" } }).to_string(),
		))]);
		let manager = manager(settings(), graph.clone());

		let status = manager.send_invitation(&guest(), "https://p", Some(&domain())).await;

		assert!(status.starts_with("Error: Invite not sent"));
		assert!(status.contains("BadRequest: The invited user already exists."));
		assert_eq!(graph.calls().len(), 1);
	}

	#[tokio::test]
	async fn groups_are_added_in_order_without_affecting_status() {
		let graph = FakeGraph::with(vec![
			created(),
			rejected(403, "Authorization_RequestDenied"),
			Err(GraphError::Timeout),
			Ok(GraphResponse::success(204, "")),
		]);
		let manager = manager(settings(), graph.clone());
		let domain = PreAuthDomain {
			groups: vec!["g-1".to_string(), "g-2".to_string(), "g-3".to_string()],
			..domain()
		};

		let outcome = manager
			.try_send_invitation(&guest(), "https://p", Some(&domain))
			.await
			.unwrap();

		assert_eq!(outcome.status, "PendingAcceptance");
		assert_eq!(
			graph.urls()[1..],
			[
				"https://graph.test/v1.0/groups/g-1/members/$ref",
				"https://graph.test/v1.0/groups/g-2/members/$ref",
				"https://graph.test/v1.0/groups/g-3/members/$ref",
			]
		);
		assert_eq!(
			graph.calls()[1].1,
			Some(json!({ "@odata.id": "https://graph.test/v1.0/directoryObjects/user-1" }))
		);

		let report = outcome.groups.unwrap();
		assert_eq!(report.failed, vec!["g-1", "g-2"]);
		assert!(!report.all_succeeded());
	}

	#[tokio::test]
	async fn add_user_to_group_does_not_short_circuit() {
		let graph = FakeGraph::with(vec![rejected(404, "Request_ResourceNotFound"), Ok(GraphResponse::success(204, ""))]);
		let manager = manager(settings(), graph.clone());

		let ok = manager
			.add_user_to_group("user-1", &["group-a".to_string(), "group-b".to_string()])
			.await;

		assert!(!ok);
		assert_eq!(graph.calls().len(), 2);
	}

	#[tokio::test]
	async fn add_user_to_group_all_succeed() {
		let graph = FakeGraph::with(vec![]);
		let manager = manager(settings(), graph.clone());
		assert!(manager.add_user_to_group("user-1", &["a".to_string(), "b".to_string()]).await);
		assert!(manager.add_user_to_group("user-1", &[]).await);
	}

	#[tokio::test]
	async fn missing_invited_user_with_groups_is_an_error() {
		let graph = FakeGraph::with(vec![Ok(GraphResponse::success(
			201,
			json!({ "id": "inv-1", "status": "PendingAcceptance" }).to_string(),
		))]);
		let manager = manager(settings(), graph.clone());
		let domain = PreAuthDomain {
			groups: vec!["g-1".to_string()],
			..domain()
		};

		let status = manager.send_invitation(&guest(), "https://p", Some(&domain)).await;

		assert!(status.starts_with("Error: invitation response has no invited user id<br>Server response: {"));
		assert_eq!(graph.calls().len(), 1);
	}

	#[tokio::test]
	async fn transport_fault_uses_placeholder_response() {
		let graph = FakeGraph::with(vec![Err(GraphError::TokenRejected("invalid_client".to_string()))]);
		let manager = manager(settings(), graph);

		let status = manager.send_invitation(&guest(), "https://p", None).await;

		assert_eq!(
			status,
			"Error: Token request rejected: invalid_client<br>Server response: N/A"
		);
	}

	#[tokio::test]
	async fn failed_response_without_json_keeps_transport_message() {
		let graph = FakeGraph::with(vec![Ok(GraphResponse::from_http(StatusCode::FORBIDDEN, String::new()))]);
		let manager = manager(settings(), graph);

		let status = manager.send_invitation(&guest(), "https://p", None).await;

		assert_eq!(status, "Error: Invite not sent - API error: 403 Forbidden");
	}

	#[tokio::test]
	async fn unparseable_success_body_is_echoed() {
		let graph = FakeGraph::with(vec![Ok(GraphResponse::success(200, "<html>bad gateway</html>"))]);
		let manager = manager(settings(), graph);

		let err = manager
			.try_send_invitation(&guest(), "https://p", None)
			.await
			.unwrap_err();

		assert_eq!(err.server_response(), Some("<html>bad gateway</html>"));
		assert!(err.status_message().ends_with("<br>Server response: <html>bad gateway</html>"));
	}

	#[tokio::test]
	async fn smtp_notification_sent_when_enabled() {
		let graph = FakeGraph::with(vec![created()]);
		let mail = Arc::new(FakeMail::default());
		let manager = manager(settings().with_use_smtp(true), graph).with_mail_sender(mail.clone());

		let status = manager.send_invitation(&guest(), "https://p", Some(&domain())).await;

		assert_eq!(status, "PendingAcceptance");
		let sent = mail.sent.lock().unwrap().clone();
		assert_eq!(
			sent,
			vec![(
				"ada@fabrikam.com".to_string(),
				"Invitation from Contoso".to_string(),
				format!("Welcome from Contoso: {REDEEM_URL}"),
			)]
		);
	}

	#[tokio::test]
	async fn smtp_notification_uses_site_template_without_domain() {
		let graph = FakeGraph::with(vec![created()]);
		let mail = Arc::new(FakeMail::default());
		let settings = settings()
			.with_use_smtp(true)
			.with_site_template(InviteTemplate {
				id: None,
				template_content: Some("Contact {{OrgContactEmail}}".to_string()),
			})
			.with_site_redemption(RedemptionSettings {
				inviter_response_email_addr: "partners@contoso.com".to_string(),
			});
		let manager = manager(settings, graph).with_mail_sender(mail.clone());

		manager.send_invitation(&guest(), "https://p", None).await;

		let sent = mail.sent.lock().unwrap().clone();
		assert_eq!(sent[0].2, "Contact partners@contoso.com");
	}

	#[tokio::test]
	async fn no_notification_when_graph_sends_mail() {
		let graph = FakeGraph::with(vec![created()]);
		let mail = Arc::new(FakeMail::default());
		let manager = manager(settings(), graph).with_mail_sender(mail.clone());

		manager.send_invitation(&guest(), "https://p", Some(&domain())).await;

		assert!(mail.sent.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn notification_failure_does_not_fail_invitation() {
		let graph = FakeGraph::with(vec![created()]);
		let mail = Arc::new(FakeMail {
			fail: true,
			..Default::default()
		});
		let manager = manager(settings().with_use_smtp(true), graph).with_mail_sender(mail.clone());

		let status = manager.send_invitation(&guest(), "https://p", Some(&domain())).await;

		assert_eq!(status, "PendingAcceptance");
		assert_eq!(mail.sent.lock().unwrap().len(), 1);
	}

	#[tokio::test]
	async fn roles_are_returned_in_order() {
		let graph = FakeGraph::with(vec![Ok(GraphResponse::success(
			200,
			json!({
				"@odata.context": "https://graph.microsoft.com/v1.0/$metadata#directoryObjects",
				"value": [
					{ "@odata.type": "#microsoft.graph.directoryRole", "id": "r-1", "displayName": "Guest Inviter" },
					{ "@odata.type": "#microsoft.graph.group", "id": "g-1", "displayName": "Partners" }
				]
			})
			.to_string(),
		))]);
		let manager = manager(settings(), graph.clone());

		let roles = manager.get_directory_roles("ada@contoso.com").await;

		assert!(roles.successful);
		assert_eq!(graph.calls(), vec![("https://graph.test/v1.0/users/ada@contoso.com/memberOf".to_string(), None)]);
		let ids: Vec<_> = roles.roles.iter().map(|r| r.id.as_deref().unwrap()).collect();
		assert_eq!(ids, vec!["r-1", "g-1"]);
		assert!(roles.roles[0].is_directory_role());
	}

	#[tokio::test]
	async fn guest_upn_is_encoded_in_member_of_url() {
		let graph = FakeGraph::with(vec![Ok(GraphResponse::success(200, r#"{"value":[]}"#))]);
		let manager = manager(settings(), graph.clone());

		let roles = manager
			.get_directory_roles("ada_fabrikam.com#EXT#@contoso.onmicrosoft.com")
			.await;

		assert!(roles.successful);
		assert_eq!(
			graph.urls(),
			vec!["https://graph.test/v1.0/users/ada_fabrikam.com%23EXT%23%40contoso.onmicrosoft.com/memberOf"]
		);
	}

	#[tokio::test]
	async fn invited_user_without_id_parses_when_no_groups() {
		let graph = FakeGraph::with(vec![Ok(GraphResponse::success(
			201,
			json!({ "id": "inv-1", "status": "PendingAcceptance", "invitedUser": { "id": null } }).to_string(),
		))]);
		let manager = manager(settings(), graph);

		let status = manager.send_invitation(&guest(), "https://p", None).await;

		assert_eq!(status, "PendingAcceptance");
	}

	#[tokio::test]
	async fn role_lookup_failure_is_empty_and_unsuccessful() {
		let graph = FakeGraph::with(vec![rejected(404, "Request_ResourceNotFound: user not found")]);
		let manager = manager(settings(), graph);

		let roles = manager.get_directory_roles("nobody@contoso.com").await;

		assert!(!roles.successful);
		assert!(roles.roles.is_empty());
		assert_eq!(roles.error_message, "Request_ResourceNotFound: user not found");
	}

	#[tokio::test]
	async fn role_lookup_transport_fault_is_contained() {
		let graph = FakeGraph::with(vec![Err(GraphError::Timeout)]);
		let roles = manager(settings(), graph).get_directory_roles("ada@contoso.com").await;
		assert!(!roles.successful);
		assert_eq!(roles.error_message, "Request timed out");
	}

	#[tokio::test]
	async fn role_lookup_malformed_payload_is_contained() {
		let graph = FakeGraph::with(vec![
			Ok(GraphResponse::success(200, "not json")),
			Ok(GraphResponse::success(200, r#"{"value": 3}"#)),
		]);
		let manager = manager(settings(), graph);

		let first = manager.get_directory_roles("ada@contoso.com").await;
		let second = manager.get_directory_roles("ada@contoso.com").await;

		assert!(!first.successful);
		assert!(first.error_message.starts_with("failed to parse memberOf response"));
		assert!(!second.successful);
		assert_eq!(second.error_message, "memberOf response has no value array");
	}
}
