//! JSON request/response contract for text rendering: `{text, font?}` in,
//! `{ascii}` or `{error, details?}` plus a status code out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AsciiArt, RenderError, DEFAULT_FONT};

pub const TEXT_REQUIRED: &str = "Text is required";
pub const RENDERER_UNAVAILABLE: &str = "Failed to load text renderer";
pub const RENDER_FAILED: &str = "Failed to generate ASCII art";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl RenderRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn font(&self) -> &str {
        self.font.as_deref().unwrap_or(DEFAULT_FONT)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenderResponse {
    Art {
        ascii: String,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderReply {
    pub status: u16,
    pub body: RenderResponse,
}

impl RenderReply {
    fn ok(ascii: String) -> Self {
        Self {
            status: 200,
            body: RenderResponse::Art { ascii },
        }
    }

    fn error(status: u16, error: &str, details: Option<String>) -> Self {
        Self {
            status,
            body: RenderResponse::Error {
                error: error.to_string(),
                details,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body)
            .unwrap_or_else(|_| format!("{{\"error\":\"{INTERNAL_ERROR}\"}}"))
    }
}

/// Handle a raw JSON request body.
pub fn handle(art: &AsciiArt, body: &[u8]) -> RenderReply {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => return RenderReply::error(500, INTERNAL_ERROR, Some(err.to_string())),
    };
    match parse_request(value) {
        Ok(request) => render_request(art, &request),
        Err(reply) => reply,
    }
}

fn parse_request(value: Value) -> Result<RenderRequest, RenderReply> {
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(RenderReply::error(
                500,
                INTERNAL_ERROR,
                Some(format!("expected a JSON object, got {other}")),
            ))
        }
    };
    let text = match fields.get("text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => return Err(RenderReply::error(400, TEXT_REQUIRED, None)),
    };
    // A non-string font is ignored rather than rejected.
    let font = fields
        .get("font")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(RenderRequest { text, font })
}

pub fn render_request(art: &AsciiArt, request: &RenderRequest) -> RenderReply {
    render_text(art, &request.text, request.font())
}

/// Typed entry point used in-process; same statuses as [`handle`].
pub fn render_text(art: &AsciiArt, text: &str, font: &str) -> RenderReply {
    if text.is_empty() {
        return RenderReply::error(400, TEXT_REQUIRED, None);
    }
    match art.render(text, font) {
        Ok(ascii) => RenderReply::ok(ascii),
        Err(RenderError::Unavailable) => RenderReply::error(500, RENDERER_UNAVAILABLE, None),
        Err(err) => RenderReply::error(500, RENDER_FAILED, Some(err.to_string())),
    }
}

/// Client side of the contract: the art on 2xx, `fallback(text)` otherwise.
pub fn request_or(
    art: &AsciiArt,
    request: &RenderRequest,
    fallback: impl FnOnce(&str) -> String,
) -> String {
    let reply = render_request(art, request);
    match reply.body {
        RenderResponse::Art { ascii } if reply.is_success() => ascii,
        RenderResponse::Art { .. } => fallback(&request.text),
        RenderResponse::Error { error, .. } => {
            tracing::debug!(status = reply.status, %error, "render request failed, using fallback");
            fallback(&request.text)
        }
    }
}

/// The art on success, the plain input text otherwise.
pub fn request(art: &AsciiArt, request: &RenderRequest) -> String {
    request_or(art, request, str::to_string)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ascii::tests::ScriptedGlyphs;

    fn working() -> AsciiArt {
        AsciiArt::new(Arc::new(ScriptedGlyphs::failing(&["Doom"])))
    }

    fn broken() -> AsciiArt {
        AsciiArt::new(Arc::new(ScriptedGlyphs::failing(&["Doom", "Standard"])))
    }

    fn error_of(reply: &RenderReply) -> (&str, Option<&str>) {
        match &reply.body {
            RenderResponse::Error { error, details } => (error.as_str(), details.as_deref()),
            RenderResponse::Art { .. } => panic!("expected error, got {reply:?}"),
        }
    }

    #[test]
    fn test_success_defaults_to_standard_font() {
        let reply = handle(&working(), br#"{"text": "pika"}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(
            reply.body,
            RenderResponse::Art {
                ascii: "<Standard:pika>".into()
            }
        );
        assert_eq!(reply.to_json(), r#"{"ascii":"<Standard:pika>"}"#);
    }

    #[test]
    fn test_failing_font_falls_back_to_standard() {
        let reply = handle(&working(), br#"{"text": "pika", "font": "Doom"}"#);
        assert_eq!(reply.status, 200);
        assert!(reply.is_success());
    }

    #[test]
    fn test_missing_or_invalid_text_is_400() {
        for body in [
            r#"{}"#,
            r#"{"text": ""}"#,
            r#"{"text": 42}"#,
            r#"{"font": "Standard"}"#,
        ] {
            let reply = handle(&working(), body.as_bytes());
            assert_eq!(reply.status, 400, "body {body}");
            assert_eq!(error_of(&reply), (TEXT_REQUIRED, None));
        }
        assert_eq!(
            handle(&working(), br#"{"text": "x"}"#).to_json(),
            r#"{"ascii":"<Standard:x>"}"#
        );
        assert_eq!(
            handle(&working(), b"{}").to_json(),
            r#"{"error":"Text is required"}"#
        );
    }

    #[test]
    fn test_unavailable_renderer_is_500() {
        let reply = handle(&AsciiArt::unavailable(), br#"{"text": "pika"}"#);
        assert_eq!(reply.status, 500);
        assert_eq!(error_of(&reply), (RENDERER_UNAVAILABLE, None));
    }

    #[test]
    fn test_render_failure_is_500_with_details() {
        let reply = handle(&broken(), br#"{"text": "pika", "font": "Doom"}"#);
        assert_eq!(reply.status, 500);
        let (error, details) = error_of(&reply);
        assert_eq!(error, RENDER_FAILED);
        assert!(details.unwrap().contains("Doom"));
    }

    #[test]
    fn test_malformed_json_is_internal_error() {
        let reply = handle(&working(), b"{not json");
        assert_eq!(reply.status, 500);
        let (error, details) = error_of(&reply);
        assert_eq!(error, INTERNAL_ERROR);
        assert!(details.is_some());
    }

    #[test]
    fn test_valid_json_that_is_not_an_object_is_internal_error() {
        for body in ["null", "42", r#""pika""#, r#"["pika"]"#, "true"] {
            let reply = handle(&working(), body.as_bytes());
            assert_eq!(reply.status, 500, "body {body}");
            let (error, details) = error_of(&reply);
            assert_eq!(error, INTERNAL_ERROR);
            assert!(details.is_some());
        }
    }

    #[test]
    fn test_non_string_font_uses_default() {
        let reply = handle(&working(), br#"{"text": "pika", "font": 7}"#);
        assert_eq!(
            reply.body,
            RenderResponse::Art {
                ascii: "<Standard:pika>".into()
            }
        );
    }

    #[test]
    fn test_request_returns_plain_text_on_failure() {
        let pika = RenderRequest::new("pika");
        assert_eq!(request(&working(), &pika), "<Standard:pika>");
        assert_eq!(request(&broken(), &pika.clone().with_font("Doom")), "pika");
        assert_eq!(request(&AsciiArt::unavailable(), &pika), "pika");
    }

    #[test]
    fn test_request_or_uses_the_given_fallback() {
        let mew = RenderRequest::new("mew");
        let boxed = request_or(&AsciiArt::unavailable(), &mew, |text| format!("[{text}]"));
        assert_eq!(boxed, "[mew]");
        assert_eq!(
            request_or(&working(), &mew, |_| unreachable!()),
            "<Standard:mew>"
        );
    }

    #[test]
    fn test_serialized_request_is_accepted_by_handle() {
        let body = serde_json::to_vec(&RenderRequest::new("mew")).unwrap();
        assert_eq!(body, br#"{"text":"mew"}"#);
        assert!(handle(&working(), &body).is_success());
    }
}
