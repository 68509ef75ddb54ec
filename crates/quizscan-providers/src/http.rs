//! HTTP plumbing shared by the providers: client setup and error mapping.

use std::time::Duration;

use quizscan_core::error::GatewayError;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub(crate) fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("failed to build HTTP client")
}

/// Map a transport failure. Timeouts are service errors like any other.
pub(crate) fn send_error(e: reqwest::Error, timeout_secs: u64) -> GatewayError {
    if e.is_timeout() {
        GatewayError::service(format!("request timed out after {timeout_secs}s"))
    } else {
        GatewayError::service(format!("network error: {e}"))
    }
}

/// Map a non-success HTTP status and its body.
pub(crate) fn status_error(status: u16, body: String) -> GatewayError {
    match status {
        401 | 403 => GatewayError::Auth(body),
        // Gemini reports a bad key as 400 INVALID_ARGUMENT.
        400 if mentions_invalid_key(&body) => GatewayError::Auth(body),
        _ => GatewayError::Service {
            status: Some(status),
            message: body,
        },
    }
}

fn mentions_invalid_key(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("api key not valid")
        || lower.contains("api_key_invalid")
        || lower.contains("invalid api key")
}

pub(crate) fn require_key(provider: &str, api_key: &str) -> Result<(), GatewayError> {
    if api_key.trim().is_empty() {
        return Err(GatewayError::Configuration(format!(
            "no API key configured for {provider}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses() {
        assert!(matches!(status_error(401, "no".into()), GatewayError::Auth(_)));
        assert!(matches!(status_error(403, "no".into()), GatewayError::Auth(_)));
    }

    #[test]
    fn invalid_key_400_is_auth() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(status_error(400, body.into()), GatewayError::Auth(_)));
    }

    #[test]
    fn other_400_is_service() {
        match status_error(400, "bad image".into()) {
            GatewayError::Service { status, .. } => assert_eq!(status, Some(400)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_key_is_configuration() {
        assert!(matches!(
            require_key("gemini", "  "),
            Err(GatewayError::Configuration(_))
        ));
        assert!(require_key("gemini", "k").is_ok());
    }
}
