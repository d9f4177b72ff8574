/// Errors surfaced by [`WeatherClient`](crate::WeatherClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Latitude and longitude are required. Use set_location() to set them.")]
    InvalidConfiguration,

    #[error("Failed to build request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Forecast request failed with status {status}: {}", truncate_body(.body))]
    Status { status: u16, body: String },

    #[error("Failed to parse forecast JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Forecast response has no '{0}' field")]
    MissingField(&'static str),
}

impl Error {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }

    /// True for connection-level failures and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Status { .. })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_truncates_long_bodies() {
        let err = Error::Status { status: 500, body: "x".repeat(500) };
        let msg = err.to_string();

        assert!(msg.starts_with("Forecast request failed with status 500: "));
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 300);
        assert!(err.is_transport());
    }

    #[test]
    fn missing_field_names_the_path() {
        let err = Error::MissingField("hourly.data");
        assert_eq!(err.to_string(), "Forecast response has no 'hourly.data' field");
        assert!(!err.is_transport());
    }
}
