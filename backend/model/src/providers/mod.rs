pub mod mock;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tutorbridge_config::ModelSettings;
use tutorbridge_core::LlmProvider;

use self::openai::OpenAiProvider;

/// Build the network provider described by `settings`.
pub fn provider_from_settings(settings: &ModelSettings) -> Result<Arc<dyn LlmProvider>> {
    let provider = OpenAiProvider::new(
        settings.api_key.clone().unwrap_or_default(),
        Duration::from_secs(settings.request_timeout_secs),
    )?
    .with_base_url(&settings.base_url);
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_openai_provider_from_defaults() {
        let provider = provider_from_settings(&ModelSettings::default()).unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
