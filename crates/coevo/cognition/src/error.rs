/// Errors from the generator and summarizer collaborators.
///
/// None of these are fatal to a run: the engine degrades to local fallbacks.
#[derive(Debug, thiserror::Error)]
pub enum CognitionError {
    #[error("missing {0} in environment or configuration")]
    MissingApiKey(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider error {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("provider returned an empty response")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CognitionError::Provider {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert!(format!("{}", err).contains("429"));
        assert!(format!("{}", CognitionError::MissingApiKey("GEMINI_API_KEY"))
            .contains("GEMINI_API_KEY"));
    }
}
