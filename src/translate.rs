//! Translation via the public Google Translate web endpoint.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;

use crate::config::{self, Settings};

/// Anything that can translate a block of text into a target language.
#[allow(async_fn_in_trait)]
pub trait Translator {
    async fn translate(&self, text: &str, target: &str) -> Result<String>;
}

impl<T: Translator> Translator for &T {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        (**self).translate(text, target).await
    }
}

/// Google Translate client (`client=gtx` endpoint, no API key).
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    source: String,
    max_chunk_chars: usize,
}

impl GoogleTranslator {
    pub fn new(source: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: config::translate::ENDPOINT.to_string(),
            source: source.into(),
            max_chunk_chars: config::translate::MAX_CHUNK_CHARS,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.source_language.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Point the client at another endpoint speaking the same protocol.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn translate_chunk(&self, chunk: &str, target: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", target),
                ("dt", "t"),
            ])
            .form(&[("q", chunk)])
            .send()
            .await
            .context("Translation request failed")?
            .error_for_status()
            .context("Translation service rejected the request (quota exceeded?)")?;

        let body = response
            .text()
            .await
            .context("Failed to read translation response")?;

        parse_response(&body)
    }
}

impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let chunks = chunk_text(text, self.max_chunk_chars);
        crate::log_debug!(
            "Translating {} chars in {} chunk(s) {} -> {}",
            text.chars().count(), chunks.len(), self.source, target
        );

        let mut translated = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            translated.push(self.translate_chunk(chunk, target).await?);
        }
        Ok(translated.join("\n"))
    }
}

/// Extract the translated text from a `translate_a/single` response.
///
/// The body looks like `[[["dịch","source",null,null,10],...],null,"en",...]`;
/// the translation is every `[0][i][0]` string concatenated.
pub fn parse_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body).context("Translation response is not JSON")?;
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Unexpected translation response shape"))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

/// Split text into pieces of at most `max_chars` characters, breaking at
/// line boundaries where possible.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if line_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(split_long_line(line, max_chars));
            continue;
        }

        // +1 for the newline that joins it to the current chunk
        let needed = if current.is_empty() { line_len } else { line_len + 1 };
        if !current.is_empty() && current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Break an over-long line at whitespace, or hard at a char boundary when a
/// single word is too long.
fn split_long_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split(' ') {
        let word_len = word.chars().count();
        let needed = if current.is_empty() { word_len } else { word_len + 1 };

        if current_len + needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len += needed;
            continue;
        }

        if !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }

        let mut chars = word.chars().peekable();
        while chars.peek().is_some() {
            let piece: String = chars.by_ref().take(max_chars).collect();
            let piece_len = piece.chars().count();
            if piece_len == max_chars {
                pieces.push(piece);
            } else {
                current = piece;
                current_len = piece_len;
            }
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn translator_for(server: &MockServer, source: &str) -> GoogleTranslator {
        GoogleTranslator::new(source, Duration::from_secs(5))
            .unwrap()
            .with_endpoint(format!("{}/translate_a/single", server.uri()))
    }

    fn reply(translated: &str, original: &str) -> ResponseTemplate {
        let body = serde_json::json!([[[translated, original, null, null, 10]], null, "en"]);
        ResponseTemplate::new(200).set_body_string(body.to_string())
    }

    #[test]
    fn test_parse_response_concatenates_segments() {
        let body = r#"[[["Xin chào thế giới. ","Hello world. ",null,null,10],["Tạm biệt.","Goodbye.",null,null,10]],null,"en"]"#;
        assert_eq!(parse_response(body).unwrap(), "Xin chào thế giới. Tạm biệt.");
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(parse_response("<html>rate limited</html>").is_err());
        assert!(parse_response(r#"{"error": "quota"}"#).is_err());
    }

    #[test]
    fn test_chunk_text_short_input_is_one_chunk() {
        assert_eq!(chunk_text("a\nb", 100), vec!["a\nb"]);
    }

    #[test]
    fn test_chunk_text_breaks_on_lines() {
        let chunks = chunk_text("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn test_chunk_text_splits_long_line_at_spaces() {
        let chunks = chunk_text("one two three", 7);
        assert_eq!(chunks, vec!["one two", "three"]);
    }

    #[test]
    fn test_chunk_text_hard_splits_long_word() {
        let chunks = chunk_text("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }

    #[test]
    fn test_chunk_text_counts_chars_not_bytes() {
        let chunks = chunk_text("ệệệ\nệệ", 6);
        assert_eq!(chunks, vec!["ệệệ\nệệ"]);
    }

    #[tokio::test]
    async fn test_blank_input_skips_request() {
        let translator = GoogleTranslator::new("auto", Duration::from_secs(1))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/unreachable");
        assert_eq!(translator.translate("  \n ", "vi").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_request_sends_query_and_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate_a/single"))
            .and(query_param("client", "gtx"))
            .and(query_param("sl", "en"))
            .and(query_param("tl", "vi"))
            .and(query_param("dt", "t"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("q=Hello+world."))
            .respond_with(reply("Xin chào thế giới.", "Hello world."))
            .expect(1)
            .mount(&server)
            .await;

        let translator = translator_for(&server, "en");
        let translated = translator.translate("Hello world.", "vi").await.unwrap();
        assert_eq!(translated, "Xin chào thế giới.");
    }

    #[tokio::test]
    async fn test_rate_limited_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .expect(1)
            .mount(&server)
            .await;

        let translator = translator_for(&server, "auto");
        let err = translator.translate("Hello.", "vi").await.unwrap_err();
        assert!(format!("{:#}", err).contains("rejected the request"), "{:#}", err);
    }

    #[tokio::test]
    async fn test_chunks_are_joined_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("q=First"))
            .respond_with(reply("Một.", "First line."))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("q=Second"))
            .respond_with(reply("Hai.", "Second line."))
            .expect(1)
            .mount(&server)
            .await;

        let mut translator = translator_for(&server, "auto");
        translator.max_chunk_chars = 12;
        let translated = translator.translate("First line.\nSecond line.", "vi").await.unwrap();
        assert_eq!(translated, "Một.\nHai.");
    }
}
