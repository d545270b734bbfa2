//! Gemini SSE stream parser and async stream adapter.
//!
//! `streamGenerateContent?alt=sse` answers with `text/event-stream`. Each
//! event carries one `data:` payload that is a partial
//! `GenerateContentResponse`:
//!
//! ```text
//! data: {"candidates":[{"content":{"parts":[{"text":"Hel"}],"role":"model"}}]}
//!
//! data: {"candidates":[{"content":{"parts":[{"text":"lo"}],"role":"model"},"finishReason":"STOP"}],"usageMetadata":{...}}
//! ```
//!
//! Network chunks do not line up with events, so bytes are buffered until a
//! full line is available.

use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use lifeassist_core::llm::provider::ProviderStream;
use lifeassist_types::llm::{LlmError, StreamEvent, Usage};

use super::client::{API_KEY_HEADER, ensure_success};
use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Incremental SSE decoder yielding the `data` payload of each event.
///
/// Lines are split on `\n` at the byte level (a trailing `\r` is dropped),
/// so multi-byte characters split across chunks are reassembled intact.
/// Multiple `data:` lines in one event are joined with `\n`; other fields
/// and `:` comments are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: String,
    has_data: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return the payloads of all events completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(data) = self.process_line(line) {
                events.push(data);
            }
        }

        events
    }

    /// Flush at end of body. Returns a final event that was not followed by
    /// a blank line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches('\r').to_string();
            if let Some(data) = self.process_line(&line) {
                return Some(data);
            }
        }
        self.take_event()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.take_event();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            if self.has_data {
                self.data.push('\n');
            }
            self.data.push_str(value);
            self.has_data = true;
        }
        None
    }

    fn take_event(&mut self) -> Option<String> {
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        Some(std::mem::take(&mut self.data))
    }
}

/// Map one SSE data payload to zero or more [`StreamEvent`]s.
fn process_chunk(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(Vec::new());
    }

    let chunk: GenerateContentResponse = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("stream chunk: {e}")))?;

    if chunk.candidates.is_empty() {
        if let Some(reason) = chunk.block_reason() {
            return Err(LlmError::Deserialization(format!(
                "response has no candidates (block reason: {reason})"
            )));
        }
    }

    let mut events = Vec::new();
    let text = chunk.text();
    if !text.is_empty() {
        events.push(StreamEvent::TextDelta { text });
    }
    if let Some(meta) = &chunk.usage_metadata {
        events.push(StreamEvent::Usage(Usage::from(meta)));
    }
    Ok(events)
}

/// Create a streaming connection to `streamGenerateContent`.
///
/// Sends the request, checks the status, then decodes the SSE body. The
/// stream ends with [`StreamEvent::Done`] once the body is exhausted, or
/// with a single error.
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GenerateContentRequest,
    api_key: Option<&SecretString>,
) -> ProviderStream {
    let client = client.clone();
    let url = url.to_string();
    let api_key = api_key.map(|key| key.expose_secret().to_string());

    Box::pin(async_stream::try_stream! {
        let api_key = api_key.ok_or(LlmError::AuthenticationFailed)?;

        let response = client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;
        let response = ensure_success(response).await?;

        let mut byte_stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = chunk_result
                .map_err(|e| LlmError::Stream(format!("response body read: {e}")))?;

            for data in decoder.feed(&chunk) {
                for event in process_chunk(&data)? {
                    yield event;
                }
            }
        }

        if let Some(data) = decoder.finish() {
            for event in process_chunk(&data)? {
                yield event;
            }
        }

        yield StreamEvent::Done;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"a\":1}\n\n");
        assert_eq!(events, vec!["{\"a\":1}"]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_decoder_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"da").is_empty());
        assert!(decoder.feed(b"ta: {\"text\":").is_empty());
        assert!(decoder.feed(b"\"hi\"}\r\n").is_empty());
        assert_eq!(decoder.feed(b"\r\ndata: next\n\n"), vec!["{\"text\":\"hi\"}", "next"]);
    }

    #[test]
    fn test_decoder_multibyte_char_split_across_chunks() {
        let bytes = "data: héllo 日本\n\n".as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(&bytes[..split]).is_empty());
        assert_eq!(decoder.feed(&bytes[split..]), vec!["héllo 日本"]);
    }

    #[test]
    fn test_decoder_joins_multiline_data_and_skips_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b": keep-alive\nevent: message\ndata: one\ndata: two\n\n");
        assert_eq!(events, vec!["one\ntwo"]);
    }

    #[test]
    fn test_decoder_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_process_chunk_text_and_usage() {
        let events = process_chunk(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi"}],"role":"model"},"finishReason":"STOP"}],
                "usageMetadata":{"promptTokenCount":3,"candidatesTokenCount":1}}"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta {
                    text: "Hi".to_string()
                },
                StreamEvent::Usage(Usage {
                    input_tokens: 3,
                    output_tokens: 1
                }),
            ]
        );
    }

    #[test]
    fn test_process_chunk_blocked_is_error() {
        let err = process_chunk(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_process_chunk_malformed_json() {
        let err = process_chunk("{not json").unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }
}
