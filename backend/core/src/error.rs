use thiserror::Error;

/// Top-level error type for the tutorbridge runtime.
///
/// None of these reach the voice platform verbatim: the dialog layer maps
/// every variant to one of a fixed set of user-facing sentences.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("upstream model error ({provider}): {message}")]
    Upstream { provider: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TutorError {
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        TutorError::Upstream {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// True for failures caused by the remote model rather than by us.
    pub fn is_upstream(&self) -> bool {
        matches!(self, TutorError::Upstream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_display_names_provider() {
        let err = TutorError::upstream("openai", "invalid_api_key");
        assert_eq!(
            err.to_string(),
            "upstream model error (openai): invalid_api_key"
        );
        assert!(err.is_upstream());
    }

    #[test]
    fn anyhow_errors_convert_transparently() {
        let err: TutorError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.to_string(), "disk on fire");
        assert!(!err.is_upstream());
    }
}
