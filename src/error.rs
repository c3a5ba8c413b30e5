use reqwest::StatusCode;
use thiserror::Error;

/// Message shown whenever the API reports a missing Pokémon.
pub const NOT_FOUND_MESSAGE: &str = "Pokémon not found";

#[derive(Error, Debug)]
pub enum DexError {
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    #[error("request failed: {0}")]
    RequestFailed(StatusCode),

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("sprite decode failed: {0}")]
    Sprite(#[from] image::ImageError),
}

impl DexError {
    /// Text shown to the user for this failure.
    ///
    /// `context` prefixes non-success statuses (`"{context}: Internal Server Error"`),
    /// `fallback` stands in when an underlying error has no description.
    pub fn user_message(&self, context: &str, fallback: &str) -> String {
        match self {
            DexError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            DexError::RequestFailed(status) => {
                format!("{}: {}", context, status.canonical_reason().unwrap_or(""))
            }
            DexError::Network(err) => non_empty_or(err.to_string(), fallback),
            DexError::Sprite(err) => non_empty_or(err.to_string(), fallback),
        }
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_ignores_context() {
        let msg = DexError::NotFound.user_message("Failed to fetch Pokémon", "fallback");
        assert_eq!(msg, "Pokémon not found");
    }

    #[test]
    fn request_failed_uses_status_text() {
        let err = DexError::RequestFailed(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.user_message("Failed to fetch Pokémon list", "fallback"),
            "Failed to fetch Pokémon list: Internal Server Error"
        );
    }

    #[test]
    fn blank_message_falls_back() {
        assert_eq!(non_empty_or("  ".to_string(), "Failed to search Pokémon"), "Failed to search Pokémon");
        assert_eq!(non_empty_or("boom".to_string(), "unused"), "boom");
    }
}
