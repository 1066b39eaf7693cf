//! HTTP client for the code-runner service.
//!
//! Wraps the four endpoints behind typed calls and maps every failure onto
//! one of the `ActionError` classes. All requests are bounded by the
//! configured timeout; expiry surfaces as `ActionError::TimedOut`.

use crate::model::{ActionError, Language, RunConfig, RunOutcome, ServerHealth, Snippet, SnippetPayload};
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(cfg: &RunConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.request_timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            timeout: cfg.request_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> ActionError {
        if e.is_timeout() {
            ActionError::TimedOut(self.timeout)
        } else {
            // Drop the URL from the message; the UI has one server only.
            ActionError::Transport(e.without_url().to_string())
        }
    }

    /// One health probe. 2xx with any body means reachable; everything else
    /// (non-2xx, network error, timeout) means unreachable. Never fails.
    pub async fn status(&self) -> ServerHealth {
        match self.http.get(self.url("/api/status")).send().await {
            Ok(resp) if resp.status().is_success() => {
                log::debug!("status probe ok: {}", resp.status());
                ServerHealth::Reachable
            }
            Ok(resp) => {
                log::debug!("status probe unhealthy: {}", resp.status());
                ServerHealth::Unreachable
            }
            Err(e) => {
                log::debug!("status probe failed: {e}");
                ServerHealth::Unreachable
            }
        }
    }

    /// `POST /api/execute`, returning the raw response body. The service
    /// reports execution errors in the body (with a non-2xx status), so the
    /// body is decoded regardless of the status code.
    pub async fn execute_raw(
        &self,
        code: &str,
        language: Language,
    ) -> Result<serde_json::Value, ActionError> {
        self.post_json("/api/execute", code, language).await
    }

    /// Execute a snippet and interpret the response per the rendering policy.
    pub async fn execute(
        &self,
        code: &str,
        language: Language,
    ) -> Result<RunOutcome, ActionError> {
        let body = self.execute_raw(code, language).await?;
        decode_execute_response(&body)
    }

    /// `POST /api/share`, returning the raw response body.
    pub async fn share_raw(
        &self,
        code: &str,
        language: Language,
    ) -> Result<serde_json::Value, ActionError> {
        self.post_json("/api/share", code, language).await
    }

    /// Share a snippet and return its URL.
    pub async fn share(&self, code: &str, language: Language) -> Result<String, ActionError> {
        let body = self.share_raw(code, language).await?;
        decode_share_response(&body)
    }

    /// `GET /api/code/{id}`, returning the raw response body. Non-2xx means
    /// the snippet does not exist.
    pub async fn fetch_snippet_raw(&self, id: &str) -> Result<serde_json::Value, ActionError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/code/{id}")))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        if !resp.status().is_success() {
            log::debug!("snippet {id} fetch failed: {}", resp.status());
            return Err(ActionError::Server(format!("shared code '{id}' not found")));
        }
        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| self.transport_error(e))
    }

    /// Fetch a shared snippet by id.
    pub async fn fetch_snippet(&self, id: &str) -> Result<Snippet, ActionError> {
        let body = self.fetch_snippet_raw(id).await?;
        decode_snippet_response(&body)
    }

    async fn post_json(
        &self,
        path: &str,
        code: &str,
        language: Language,
    ) -> Result<serde_json::Value, ActionError> {
        let payload = SnippetPayload {
            code: code.to_string(),
            language,
        };
        let resp = self
            .http
            .post(self.url(path))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let body = resp
            .json::<serde_json::Value>()
            .await
            .map_err(|e| self.transport_error(e))?;
        log::debug!("POST {path}: {status}");
        Ok(body)
    }
}

/// Map an execute response body onto the outcome classes:
/// `error` field wins over `output`; neither present is a valid empty run.
pub fn decode_execute_response(body: &serde_json::Value) -> Result<RunOutcome, ActionError> {
    if let Some(err) = body.get("error").and_then(|v| v.as_str()) {
        return Err(ActionError::Server(err.to_string()));
    }
    match body.get("output").and_then(|v| v.as_str()) {
        Some(out) if !out.is_empty() => Ok(RunOutcome::Output(out.to_string())),
        _ => Ok(RunOutcome::NoOutput),
    }
}

/// Decode a snippet body fetched by id.
pub fn decode_snippet_response(body: &serde_json::Value) -> Result<Snippet, ActionError> {
    serde_json::from_value(body.clone())
        .map_err(|e| ActionError::Transport(format!("malformed snippet response: {e}")))
}

/// Map a share response body onto a URL or a server error.
pub fn decode_share_response(body: &serde_json::Value) -> Result<String, ActionError> {
    if let Some(url) = body.get("share_url").and_then(|v| v.as_str()) {
        return Ok(url.to_string());
    }
    if let Some(err) = body.get("error").and_then(|v| v.as_str()) {
        return Err(ActionError::Server(err.to_string()));
    }
    Err(ActionError::Transport(
        "malformed share response: neither share_url nor error present".to_string(),
    ))
}

/// Extract a share id from user input: either a bare id or any URL/path whose
/// id is the final segment after `/share/`.
pub fn parse_share_id(input: &str) -> Option<String> {
    let input = input.trim().trim_end_matches('/');
    if input.is_empty() {
        return None;
    }
    let id = match input.rfind("/share/") {
        Some(pos) => &input[pos + "/share/".len()..],
        None if input.contains('/') => return None,
        None => input,
    };
    let id = id.rsplit('/').next().unwrap_or(id);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn execute_output_is_verbatim() {
        let out = decode_execute_response(&json!({"output": "hello"})).unwrap();
        assert_eq!(out, RunOutcome::Output("hello".into()));
    }

    #[test]
    fn execute_error_field_wins_over_output() {
        let err = decode_execute_response(&json!({"output": "partial", "error": "bad syntax"}))
            .unwrap_err();
        assert_eq!(err, ActionError::Server("bad syntax".into()));
    }

    #[test]
    fn execute_empty_body_is_no_output() {
        assert_eq!(
            decode_execute_response(&json!({})).unwrap(),
            RunOutcome::NoOutput
        );
        assert_eq!(
            decode_execute_response(&json!({"output": ""})).unwrap(),
            RunOutcome::NoOutput
        );
    }

    #[test]
    fn share_url_or_error() {
        assert_eq!(
            decode_share_response(&json!({"share_url": "http://h/share/ab12"})).unwrap(),
            "http://h/share/ab12"
        );
        assert_eq!(
            decode_share_response(&json!({"error": "db down"})).unwrap_err(),
            ActionError::Server("db down".into())
        );
        assert!(matches!(
            decode_share_response(&json!({"ok": true})).unwrap_err(),
            ActionError::Transport(_)
        ));
    }

    #[test]
    fn snippet_decodes_with_and_without_language() {
        let s = decode_snippet_response(&json!({"code": "print(1)", "language": "python"})).unwrap();
        assert_eq!(s.code, "print(1)");
        assert_eq!(s.language.as_deref(), Some("python"));

        let s = decode_snippet_response(&json!({"code": "print(2)"})).unwrap();
        assert_eq!(s.language, None);

        assert!(matches!(
            decode_snippet_response(&json!({"language": "python"})).unwrap_err(),
            ActionError::Transport(_)
        ));
    }

    #[test]
    fn share_id_from_bare_id() {
        assert_eq!(parse_share_id("abc123").as_deref(), Some("abc123"));
        assert_eq!(parse_share_id("  abc123 ").as_deref(), Some("abc123"));
    }

    #[test]
    fn share_id_from_url_takes_final_segment() {
        assert_eq!(
            parse_share_id("http://localhost:5000/share/abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(parse_share_id("/share/abc123/").as_deref(), Some("abc123"));
    }

    #[test]
    fn share_id_rejects_garbage() {
        assert_eq!(parse_share_id(""), None);
        assert_eq!(parse_share_id("/share/"), None);
        assert_eq!(parse_share_id("http://localhost:5000/other/abc"), None);
    }
}
