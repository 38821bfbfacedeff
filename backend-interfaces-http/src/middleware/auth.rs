use axum::http::HeaderMap;

use backend_domain::RuntimeConfig;

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:8286".to_string(),
            api_token: token.map(ToString::to_string),
            gateway_base_url: "https://api.example.com".to_string(),
            gateway_secret_key: None,
            settlement_currency: "NGN".to_string(),
            max_body_bytes: 1024,
            request_timeout_seconds: 15,
        }
    }

    #[test]
    fn open_when_no_token_configured() {
        assert!(authorize(&config(None), &HeaderMap::new()));
    }

    #[test]
    fn matching_bearer_token_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer sekrit"));
        assert!(authorize(&config(Some("sekrit")), &headers));
    }

    #[test]
    fn missing_or_wrong_token_is_rejected() {
        let config = config(Some("sekrit"));
        assert!(!authorize(&config, &HeaderMap::new()));
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer nope"));
        assert!(!authorize(&config, &headers));
    }
}
