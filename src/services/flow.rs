// src/services/flow.rs
//
// Invocation shim for the external flow service. The conversational engine
// itself (intent understanding, retrieval, order lookup) lives behind this
// endpoint and is opaque to us: we send one request per user message and
// unwrap the returned text.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::Config;

/// Reply used when the flow answers with a mapping that carries no usable
/// `result` text.
pub const FALLBACK_REPLY: &str =
    "I apologize, but I couldn't process your request. Please try again.";

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("the flow service timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("could not reach the flow service: {0}")]
    Network(#[source] reqwest::Error),

    #[error("the flow service returned HTTP {0}")]
    Status(u16),

    #[error("could not decode the flow response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("the flow response did not match any known shape")]
    ShapeMismatch,
}

#[derive(Clone, Debug)]
pub struct FlowClient {
    client: Client,
    base_url: String,
    flow_id: String,
    api_key: Option<String>,
    tweaks: Map<String, Value>,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    input_value: &'a str,
    output_type: &'static str,
    input_type: &'static str,
    tweaks: &'a Map<String, Value>,
}

// Strict shape of a successful run: outputs[0].outputs[0].results.message.text
#[derive(Deserialize)]
struct RunResponse {
    outputs: Vec<RunOutputs>,
}

#[derive(Deserialize)]
struct RunOutputs {
    outputs: Vec<RunOutput>,
}

#[derive(Deserialize)]
struct RunOutput {
    results: RunResults,
}

#[derive(Deserialize)]
struct RunResults {
    message: RunMessage,
}

#[derive(Deserialize)]
struct RunMessage {
    text: String,
}

impl FlowClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            flow_id: config.flow_id.clone(),
            api_key: config.api_key.clone(),
            tweaks: config.tweaks.clone(),
        }
    }

    /// Send one user message to the flow and return the reply text.
    ///
    /// One call per message, no retries. Every failure mode is classified
    /// into a [`FlowError`]; the caller decides how to surface it.
    pub async fn run(&self, message: &str) -> Result<String, FlowError> {
        let url = format!("{}/api/v1/run/{}", self.base_url, self.flow_id);
        let body = RunRequest {
            input_value: message,
            output_type: "chat",
            input_type: "chat",
            tweaks: &self.tweaks,
        };

        let mut request = self
            .client
            .post(&url)
            .query(&[("stream", "false")])
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlowError::Status(status.as_u16()));
        }

        let raw = response.text().await.map_err(classify_transport_error)?;
        let value: Value = serde_json::from_str(&raw)?;
        extract_reply(&value)
    }
}

fn classify_transport_error(err: reqwest::Error) -> FlowError {
    if err.is_timeout() {
        FlowError::Timeout(err)
    } else {
        FlowError::Network(err)
    }
}

/// Unwrap the reply text from a flow response.
///
/// The nested shape is primary; a flat `{"result": text}` mapping is the
/// legacy shape. Anything else is a shape mismatch rather than a silent
/// default, so real decoding failures stay visible to the caller.
fn extract_reply(value: &Value) -> Result<String, FlowError> {
    if let Ok(nested) = serde_json::from_value::<RunResponse>(value.clone()) {
        let text = nested
            .outputs
            .into_iter()
            .next()
            .and_then(|o| o.outputs.into_iter().next())
            .map(|o| o.results.message.text);
        if let Some(text) = text {
            return Ok(text);
        }
    }

    match value.get("result") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Ok(FALLBACK_REPLY.to_string()),
        None => Err(FlowError::ShapeMismatch),
    }
}
