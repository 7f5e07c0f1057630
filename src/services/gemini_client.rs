use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    configuration::OutputMode,
    domain::{CompanyRecord, LookupError, QueryContext},
};

use super::{
    build_prompt, normalize_structured, normalize_text, record_response_schema,
    CompanyFactsProvider, Prompt,
};

const ERROR_BODY_CHAR_LIMIT: usize = 300;

/// Fragments of the 400 message Gemini sends when a response schema cannot be
/// combined with tools.
const SCHEMA_REJECTION_MARKERS: [&str; 3] =
    ["response mime type", "response_mime_type", "responsemimetype"];

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    output: OutputMode,
    schema_unavailable: AtomicBool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
enum Tool {
    GoogleSearch {},
    UrlContext {},
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Joins every text part of the first candidate.
    fn text(&self) -> Result<String, LookupError> {
        let blocked = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone());
        let candidate = self
            .candidates
            .first()
            .ok_or(LookupError::EmptyResponse { reason: blocked })?;

        let text = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<&str>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(LookupError::EmptyResponse {
                reason: candidate.finish_reason.clone(),
            });
        }

        Ok(text)
    }
}

impl GeminiProvider {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        model: String,
        base_url: String,
        output: OutputMode,
    ) -> Self {
        GeminiProvider {
            client,
            api_key,
            model,
            base_url,
            output,
            schema_unavailable: AtomicBool::new(false),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn wants_schema(&self) -> bool {
        self.output == OutputMode::Schema && !self.schema_unavailable.load(Ordering::Relaxed)
    }

    async fn generate(
        &self,
        api_key: &str,
        query: &QueryContext,
        prompt: &Prompt,
        with_schema: bool,
    ) -> Result<String, CallError> {
        let request = build_request(query, prompt, with_schema);

        log::info!(
            "Calling Gemini model {} for {:?} (schema: {})",
            self.model,
            query.company_name,
            with_schema
        );
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(LookupError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_CHAR_LIMIT).collect();
            return Err(CallError::Status { status, body });
        }

        let response = response
            .json::<GenerateResponse>()
            .await
            .map_err(LookupError::from)?;
        Ok(response.text()?)
    }
}

/// Keeps a non-2xx answer apart from other failures so a rejected schema
/// request can be retried without it.
#[derive(Debug)]
enum CallError {
    Status { status: StatusCode, body: String },
    Lookup(LookupError),
}

impl CallError {
    /// Only a 400 that names the response mime type counts; other 400s
    /// (bad key, unknown model) are ordinary failures.
    fn is_schema_rejection(&self) -> bool {
        match self {
            CallError::Status { status, body } if *status == StatusCode::BAD_REQUEST => {
                let body = body.to_lowercase();
                SCHEMA_REJECTION_MARKERS.iter().any(|m| body.contains(m))
            }
            _ => false,
        }
    }
}

impl From<LookupError> for CallError {
    fn from(e: LookupError) -> Self {
        CallError::Lookup(e)
    }
}

impl From<CallError> for LookupError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Status { status, body } => {
                LookupError::ProviderCall(format!("Gemini returned {}: {}", status, body))
            }
            CallError::Lookup(e) => e,
        }
    }
}

fn build_request(query: &QueryContext, prompt: &Prompt, with_schema: bool) -> GenerateRequest {
    let mut tools = vec![Tool::GoogleSearch {}];
    if query.supplementary_url.is_some() {
        tools.push(Tool::UrlContext {});
    }

    let (response_mime_type, response_schema) = match with_schema {
        true => (Some("application/json"), Some(record_response_schema())),
        false => (None, None),
    };

    GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: prompt.system_instruction.clone(),
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: prompt.user_instruction.clone(),
            }],
        }],
        tools,
        generation_config: GenerationConfig {
            temperature: 0.0,
            response_mime_type,
            response_schema,
        },
    }
}

/// Schema output is JSON text; anything that does not parse goes through the
/// free-text path.
fn normalize_schema_output(text: &str) -> Result<CompanyRecord, LookupError> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) if value.is_object() => normalize_structured(value),
        _ => normalize_text(text),
    }
}

#[async_trait]
impl CompanyFactsProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn resolve(&self, query: &QueryContext) -> Result<CompanyRecord, LookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LookupError::Configuration("Gemini API key is not set".to_string()))?;
        let prompt = build_prompt(query);

        if self.wants_schema() {
            match self.generate(api_key, query, &prompt, true).await {
                Ok(text) => return normalize_schema_output(&text),
                Err(e) if e.is_schema_rejection() => {
                    log::warn!(
                        "Gemini rejected schema output with tools, using prompt output from now on: {:?}",
                        e
                    );
                    self.schema_unavailable.store(true, Ordering::Relaxed);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let text = self.generate(api_key, query, &prompt, false).await?;
        normalize_text(&text)
    }
}
