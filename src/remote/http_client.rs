use super::*;

use std::time::Duration;

use reqwest::blocking::{RequestBuilder, Response};

/// Pause before each resend; its length bounds the number of resends.
const RESEND_BACKOFF: [Duration; 2] = [Duration::from_millis(200), Duration::from_millis(400)];

/// Failures where the proxy produced no response.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

impl RemoteClient {
    /// Sends `request`, resending it while the proxy is unreachable. Any
    /// response the proxy produced, error statuses included, is returned as is.
    pub(super) fn send(&self, request: RequestBuilder, label: &str) -> Result<Response> {
        let mut backoff = RESEND_BACKOFF.iter();
        loop {
            let attempt = request
                .try_clone()
                .ok_or_else(|| anyhow::anyhow!("{} request cannot be resent", label))?;
            match attempt.send() {
                Ok(resp) => return Ok(resp),
                Err(err) if is_transient(&err) => match backoff.next() {
                    Some(delay) => {
                        tracing::debug!(error = %err, ?delay, "{} could not reach the proxy", label);
                        std::thread::sleep(*delay);
                    }
                    None => {
                        return Err(err).with_context(|| {
                            format!("{}: proxy unreachable at {}", label, self.base_url)
                        });
                    }
                },
                Err(err) => return Err(err).context(label.to_string()),
            }
        }
    }

    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let msg = resp
            .json::<serde_json::Value>()
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| "no error message".to_string());
        anyhow::bail!("{} failed ({}): {}", label, status, msg)
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
