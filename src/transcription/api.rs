//! Chat-completion transcription client.
//!
//! Posts a JSON body of the form `{ "messages": [...], "model": "..." }` to
//! the configured endpoint and reads the transcription from the `response`
//! field of the reply. The recorded artifact's location is embedded as
//! literal text in the conversational prompt — the request shape the remote
//! service defines, reproduced here verbatim.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::config::TranscriptionSettings;

/// One message of the conversational prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Wire request: `{ messages, model }`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    model: &'a str,
}

/// Wire response: the transcription lives in `response`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Failures of the transcription call. All of them surface to the user as
/// the same fixed message; the detail here goes to the log.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("could not reach transcription service: {0}")]
    Network(#[source] reqwest::Error),
    #[error("transcription service returned {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed transcription response: {0}")]
    MalformedBody(#[source] reqwest::Error),
}

/// Builds the conversational prompt for one recording.
fn build_messages(audio_location: &Path) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: "You are a transcription assistant. Reply with only the transcribed text, \
                      without commentary."
                .to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: format!(
                "Transcribe the audio recording at {}",
                audio_location.display()
            ),
        },
    ]
}

/// Transcribes the recorded artifact via the configured endpoint.
///
/// # Errors
/// - [`TranscriptionError::Network`] if the request cannot be sent
/// - [`TranscriptionError::Http`] on any non-2xx status
/// - [`TranscriptionError::MalformedBody`] if the reply is not the expected JSON
pub async fn transcribe(
    settings: &TranscriptionSettings,
    audio_location: &Path,
) -> Result<String, TranscriptionError> {
    let messages = build_messages(audio_location);
    let request = ChatRequest {
        messages: &messages,
        model: &settings.model,
    };

    tracing::debug!(
        "Transcription request: POST {} (model={})",
        settings.endpoint,
        settings.model
    );

    let client = reqwest::Client::new();
    let response = match client
        .post(&settings.endpoint)
        .json(&request)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            if e.is_connect() {
                tracing::error!("Failed to connect to transcription service: {e}");
            } else if e.is_timeout() {
                tracing::error!("Transcription request timed out: {e}");
            } else {
                tracing::error!("Transcription network error: {e}");
            }
            return Err(TranscriptionError::Network(e));
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::error!("Transcription service error (status {status}): {body}");
        return Err(TranscriptionError::Http { status, body });
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(TranscriptionError::MalformedBody)?;

    tracing::debug!(
        "Transcription completed: {} characters",
        parsed.response.len()
    );
    Ok(parsed.response.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_wire_shape() {
        let messages = build_messages(Path::new("/tmp/memo.wav"));
        let request = ChatRequest {
            messages: &messages,
            model: "voicejot-transcribe-1",
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "voicejot-transcribe-1");

        let wire_messages = value["messages"].as_array().unwrap();
        assert_eq!(wire_messages.len(), 2);
        assert_eq!(wire_messages[0]["role"], "system");
        assert_eq!(wire_messages[1]["role"], "user");
        // The artifact location is embedded as literal prompt text
        assert!(wire_messages[1]["content"]
            .as_str()
            .unwrap()
            .contains("/tmp/memo.wav"));
    }

    #[test]
    fn response_parses_from_response_field() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"response": "hello world"}"#).unwrap();
        assert_eq!(parsed.response, "hello world");
    }

    #[test]
    fn response_without_response_field_is_malformed() {
        let result: Result<ChatResponse, _> =
            serde_json::from_str(r#"{"text": "hello world"}"#);
        assert!(result.is_err());
    }
}
