use anyhow::{anyhow, bail, Result};
use civic_ledger::{
    CreatePetition, CreateTemplate, CreateVotingEvent, DeployContract, EventKind, EventStatus,
    Role, TemplateUpdate, VoteChoice,
};
use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Value};
use uuid::Uuid;

pub struct RequestSender<'a> {
    pub client: &'a Client,
    pub base_url: &'a str,
    /// Session token, or the issuer token when minting sessions.
    pub token: Option<&'a str>,
}

impl<'a> RequestSender<'a> {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        read_response(self.request(Method::GET, path).send().await?).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        read_response(self.request(Method::POST, path).json(body).send().await?).await
    }
}

/// Decode a JSON body, surfacing the service's `{error}` envelope on failure.
async fn read_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let text = resp.text().await?;
    let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
    if !status.is_success() {
        let message = body["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        bail!("request failed ({}): {}", status, message);
    }
    Ok(body)
}

fn with_action(action: &str, args: Value) -> Result<Value> {
    let mut body = args;
    body.as_object_mut()
        .ok_or_else(|| anyhow!("instruction arguments must be a JSON object"))?
        .insert("action".to_string(), json!(action));
    Ok(body)
}

pub async fn send_issue_session(tx_sender: &RequestSender<'_>, user_id: &str) -> Result<Value> {
    tx_sender
        .post("/auth/session", &json!({ "user_id": user_id }))
        .await
}

pub async fn send_create_voting_event(
    tx_sender: &RequestSender<'_>,
    args: &CreateVotingEvent,
) -> Result<Value> {
    let body = with_action("create", serde_json::to_value(args)?)?;
    tx_sender.post("/voting", &body).await
}

pub async fn send_cast_vote(
    tx_sender: &RequestSender<'_>,
    voting_event_id: Uuid,
    vote_option: &VoteChoice,
) -> Result<Value> {
    tx_sender
        .post(
            "/voting",
            &json!({
                "action": "vote",
                "voting_event_id": voting_event_id,
                "vote_option": vote_option,
            }),
        )
        .await
}

pub async fn send_create_petition(
    tx_sender: &RequestSender<'_>,
    args: &CreatePetition,
) -> Result<Value> {
    let body = with_action("create", serde_json::to_value(args)?)?;
    tx_sender.post("/petition", &body).await
}

pub async fn send_sign_petition(
    tx_sender: &RequestSender<'_>,
    petition_id: Uuid,
    comment: Option<&str>,
) -> Result<Value> {
    tx_sender
        .post(
            "/petition",
            &json!({
                "action": "sign",
                "petition_id": petition_id,
                "comment": comment,
            }),
        )
        .await
}

pub async fn send_finalize(
    tx_sender: &RequestSender<'_>,
    kind: EventKind,
    event_id: Uuid,
    results_reference: &str,
) -> Result<Value> {
    let (path, body) = match kind {
        EventKind::Voting => (
            "/voting",
            json!({
                "action": "finalize",
                "voting_event_id": event_id,
                "results_reference": results_reference,
            }),
        ),
        EventKind::Petition => (
            "/petition",
            json!({
                "action": "finalize",
                "petition_id": event_id,
                "results_reference": results_reference,
            }),
        ),
    };
    tx_sender.post(path, &body).await
}

pub async fn send_change_status(
    tx_sender: &RequestSender<'_>,
    kind: EventKind,
    event_id: Uuid,
    status: EventStatus,
) -> Result<Value> {
    tx_sender
        .post(
            "/admin",
            &json!({
                "action": "change-status",
                "eventId": event_id,
                "eventType": kind,
                "status": status,
            }),
        )
        .await
}

pub async fn send_delete_event(
    tx_sender: &RequestSender<'_>,
    kind: EventKind,
    event_id: Uuid,
) -> Result<Value> {
    tx_sender
        .post(
            "/admin",
            &json!({ "action": "delete-event", "eventId": event_id, "eventType": kind }),
        )
        .await
}

pub async fn send_update_roles(
    tx_sender: &RequestSender<'_>,
    grant: Option<Vec<String>>,
    revoke: Option<Vec<String>>,
    role: Role,
) -> Result<Vec<Value>> {
    let mut responses = Vec::new();
    if let Some(user_ids) = grant.filter(|ids| !ids.is_empty()) {
        let body = json!({ "action": "grant-role", "userIds": user_ids, "role": role });
        responses.push(tx_sender.post("/admin", &body).await?);
    }
    if let Some(user_ids) = revoke.filter(|ids| !ids.is_empty()) {
        let body = json!({ "action": "revoke-role", "userIds": user_ids, "role": role });
        responses.push(tx_sender.post("/admin", &body).await?);
    }
    Ok(responses)
}

pub async fn send_admin_query(tx_sender: &RequestSender<'_>, action: &str) -> Result<Value> {
    tx_sender.post("/admin", &json!({ "action": action })).await
}

pub async fn send_participants_query(
    tx_sender: &RequestSender<'_>,
    kind: EventKind,
    event_id: Uuid,
) -> Result<Value> {
    tx_sender
        .post(
            "/admin",
            &json!({ "action": "participants", "eventId": event_id, "eventType": kind }),
        )
        .await
}

pub async fn send_create_template(
    tx_sender: &RequestSender<'_>,
    args: &CreateTemplate,
) -> Result<Value> {
    let body = with_action("create-template", serde_json::to_value(args)?)?;
    tx_sender.post("/templates", &body).await
}

pub async fn send_update_template(
    tx_sender: &RequestSender<'_>,
    template_id: Uuid,
    updates: &TemplateUpdate,
) -> Result<Value> {
    tx_sender
        .post(
            "/templates",
            &json!({
                "action": "update-template",
                "templateId": template_id,
                "updates": updates,
            }),
        )
        .await
}

pub async fn send_deploy_contract(
    tx_sender: &RequestSender<'_>,
    template_id: Uuid,
    args: &DeployContract,
) -> Result<Value> {
    let mut body = with_action("deploy-contract", serde_json::to_value(args)?)?;
    if let Some(fields) = body.as_object_mut() {
        fields.insert("templateId".to_string(), json!(template_id));
    }
    tx_sender.post("/templates", &body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tag_is_added_to_arguments() {
        let body = with_action("create", json!({ "title": "T" })).unwrap();
        assert_eq!(body, json!({ "title": "T", "action": "create" }));
        assert!(with_action("create", json!([1, 2])).is_err());
    }
}
