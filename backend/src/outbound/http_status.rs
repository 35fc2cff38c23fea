//! Status and transport classification shared by the reqwest adapters.
//!
//! Each adapter maps [`UpstreamFailure`] onto its own port error so the
//! rules for 429s, timeouts and client errors stay identical across feeds.

use reqwest::StatusCode;

/// Transport-level reason an upstream call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpstreamFailure {
    Transport(String),
    Timeout(String),
    RateLimited(String),
    Rejected(String),
}

impl UpstreamFailure {
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let preview = body_preview(body);
        let message = if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {preview}", status.as_u16())
        };

        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Timeout(message),
            _ if status.is_client_error() => Self::Rejected(message),
            _ => Self::Transport(message),
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
