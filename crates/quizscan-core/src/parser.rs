//! Response parser: the service's raw text → a validated [`ExtractedResult`].
//!
//! Parsing is attempted in a fixed order and stops at the first success:
//!
//! 1. the trimmed text, with a surrounding code fence stripped if present
//! 2. the span from the first `{` to the last `}`
//!
//! Anything else is a [`ParseError::MalformedResponse`]. The parser never
//! fills in missing values; defaults are the caller's policy
//! (see [`crate::fallback`]).

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ParseError;
use crate::model::ExtractedResult;

/// Parse and validate a raw service reply.
pub fn parse_response(raw: &str) -> Result<ExtractedResult, ParseError> {
    let value = locate_json(raw).ok_or_else(|| ParseError::MalformedResponse {
        raw: raw.to_string(),
    })?;
    validate(&value)
}

/// Find the first candidate that parses as JSON, in the documented order.
fn locate_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    let direct = strip_fence(trimmed).unwrap_or(trimmed);
    if let Ok(value) = serde_json::from_str::<Value>(direct) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value) => {
            debug!("parsed JSON object embedded in surrounding text");
            Some(value)
        }
        Err(_) => None,
    }
}

/// Strip a code fence wrapping the whole text: an opening "```" with an
/// optional format tag on its line, and a closing "```".
fn strip_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let body = rest.strip_suffix("```")?;
    // Drop the optional tag ("json", "JSON", ...) up to the first newline.
    let body = match body.find('\n') {
        Some(newline) if is_fence_tag(&body[..newline]) => &body[newline + 1..],
        _ => {
            let tag_len = body
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(body.len());
            &body[tag_len..]
        }
    };
    Some(body.trim())
}

fn is_fence_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate(value: &Value) -> Result<ExtractedResult, ParseError> {
    let object = value
        .as_object()
        .ok_or_else(|| ParseError::Validation("expected a JSON object".into()))?;

    Ok(ExtractedResult {
        student_name: string_field(object, "studentName")?,
        score: number_field(object, "score")?,
        total_marks: number_field(object, "totalMarks")?,
        subject: string_field(object, "subject")?,
    })
}

fn string_field(object: &Map<String, Value>, name: &str) -> Result<String, ParseError> {
    match object.get(name) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(ParseError::Validation(format!(
            "field `{name}` must be a string, got {other}"
        ))),
        None => Err(ParseError::Validation(format!("missing field `{name}`"))),
    }
}

fn number_field(object: &Map<String, Value>, name: &str) -> Result<f64, ParseError> {
    let parsed = match object.get(name) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
        None => return Err(ParseError::Validation(format!("missing field `{name}`"))),
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ParseError::Validation(format!(
            "field `{name}` must be numeric"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECT: &str =
        r#"{"studentName": "Asha Rao", "score": 8, "totalMarks": 10, "subject": "Maths"}"#;

    fn expected() -> ExtractedResult {
        ExtractedResult {
            student_name: "Asha Rao".into(),
            score: 8.0,
            total_marks: 10.0,
            subject: "Maths".into(),
        }
    }

    #[test]
    fn plain_fenced_and_prose_forms_agree() {
        let plain = OBJECT.to_string();
        let fenced = format!("```json\n{OBJECT}\n```");
        let prose = format!("Here is the result:\n\n```json\n{OBJECT}\n```\n\nLet me know if you need more.");

        for text in [plain, fenced, prose] {
            assert_eq!(parse_response(&text).unwrap(), expected(), "input: {text}");
        }
    }

    #[test]
    fn untagged_and_inline_fences() {
        let untagged = format!("```\n{OBJECT}\n```");
        let inline = format!("```json {OBJECT}```");
        assert_eq!(parse_response(&untagged).unwrap(), expected());
        assert_eq!(parse_response(&inline).unwrap(), expected());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let text = format!("\n\n   {OBJECT}   \n");
        assert_eq!(parse_response(&text).unwrap(), expected());
    }

    #[test]
    fn no_braces_is_malformed() {
        let raw = "I could not read this paper, sorry.";
        match parse_response(raw) {
            Err(ParseError::MalformedResponse { raw: kept }) => assert_eq!(kept, raw),
            other => panic!("expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn broken_json_between_braces_is_malformed() {
        let raw = "result: {studentName: Asha, score: 8}";
        assert!(matches!(
            parse_response(raw),
            Err(ParseError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn reversed_braces_are_malformed() {
        assert!(matches!(
            parse_response("} nothing here {"),
            Err(ParseError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn missing_field_is_validation_error() {
        let raw = r#"{"studentName": "Asha", "score": 8, "subject": "Maths"}"#;
        match parse_response(raw) {
            Err(ParseError::Validation(msg)) => assert!(msg.contains("totalMarks"), "{msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_score_is_validation_error() {
        let raw = r#"{"studentName": "Asha", "score": "eight", "totalMarks": 10, "subject": "Maths"}"#;
        assert!(matches!(
            parse_response(raw),
            Err(ParseError::Validation(_))
        ));
    }

    #[test]
    fn null_score_is_not_defaulted() {
        let raw = r#"{"studentName": "Asha", "score": null, "totalMarks": 10, "subject": "Maths"}"#;
        assert!(matches!(
            parse_response(raw),
            Err(ParseError::Validation(_))
        ));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = r#"{"studentName": "Asha", "score": "7.5", "totalMarks": " 10 ", "subject": "Maths"}"#;
        let result = parse_response(raw).unwrap();
        assert_eq!(result.score, 7.5);
        assert_eq!(result.total_marks, 10.0);
    }

    #[test]
    fn array_reply_is_validation_error() {
        assert!(matches!(
            parse_response("[1, 2, 3]"),
            Err(ParseError::Validation(_))
        ));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r#"{"studentName": "Asha", "score": 8, "totalMarks": 10, "subject": "Maths", "confidence": 0.9}"#;
        assert_eq!(parse_response(raw).unwrap().student_name, "Asha");
    }
}
