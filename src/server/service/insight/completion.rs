//! Client for an OpenAI-compatible chat-completion API.

use serde::{Deserialize, Serialize};

use crate::server::{
    config::CompletionConfig,
    error::{internal::InternalError, AppError},
    model::insight::{Insight, InsightSignals},
};

const TEMPERATURE: f32 = 0.2;
const MAX_INSIGHTS: usize = 10;

const SYSTEM_PROMPT: &str = "You are an analytics assistant for a university hub platform. \
Given platform statistics as JSON, reply with a JSON array of at most 10 objects, each with \
the string fields \"title\", \"detail\" and \"severity\" (one of \"info\", \"warning\", \
\"critical\"). Reply with the JSON array only.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(client: reqwest::Client, config: CompletionConfig) -> Self {
        Self { client, config }
    }

    /// Asks the model for insights about the given signals.
    ///
    /// # Returns
    /// - `Ok(Vec<Insight>)` - Parsed insights, never empty
    /// - `Err(AppError::ReqwestErr(_))` - Network failure or non-success status
    /// - `Err(AppError::InternalErr(CompletionResponse))` - Reply was not an insight array
    pub async fn generate_insights(
        &self,
        signals: &InsightSignals,
    ) -> Result<Vec<Insight>, AppError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: describe(signals).to_string(),
                },
            ],
            temperature: TEMPERATURE,
        };

        let response: ChatResponse = self
            .client
            .post(self.config.api_url.clone())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| InternalError::CompletionResponse("no message content".to_string()))?;

        Ok(parse_insights(&content)?)
    }
}

fn describe(signals: &InsightSignals) -> serde_json::Value {
    let stats = &signals.stats;

    serde_json::json!({
        "total_users": stats.total_users,
        "new_users_last_7_days": stats.new_users_last_7_days,
        "total_hubs": stats.total_hubs,
        "total_projects": stats.total_projects,
        "total_programmes": stats.total_programmes,
        "upcoming_events": stats.upcoming_events,
        "pending_join_requests": stats.pending_join_requests,
        "pending_join_requests_older_than_7_days": signals.stale_pending_requests,
        "hubs_with_only_owner": signals.solo_owner_hubs,
        "full_programmes": signals.full_programmes,
        "upcoming_event_fill": signals
            .event_fill
            .iter()
            .map(|e| serde_json::json!({
                "title": e.title,
                "registrations": e.registrations,
                "capacity": e.capacity,
            }))
            .collect::<Vec<_>>(),
    })
}

/// Parses a model reply into insights. Markdown code fences around the array are tolerated.
fn parse_insights(content: &str) -> Result<Vec<Insight>, InternalError> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let mut insights: Vec<Insight> =
        serde_json::from_str(body).map_err(|e| InternalError::CompletionResponse(e.to_string()))?;

    if insights.is_empty() {
        return Err(InternalError::CompletionResponse(
            "empty insight list".to_string(),
        ));
    }
    insights.truncate(MAX_INSIGHTS);

    Ok(insights)
}
