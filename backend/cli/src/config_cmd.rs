//! CLI Config Command
//!
//! Prints the effective configuration as YAML with secrets masked.

use anyhow::Result;
use tutorbridge_config::{io::to_yaml, redacted_config, TutorConfig};

pub fn run(config: &TutorConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &TutorConfig) -> Result<String> {
    to_yaml(&redacted_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_yaml_hides_api_key() {
        let mut config = TutorConfig::default();
        config.model.api_key = Some("sk-proj-secretsecret".into());
        let yaml = render(&config).unwrap();
        assert!(yaml.contains("sk-p***"));
        assert!(!yaml.contains("secretsecret"));
        assert!(yaml.contains("historyDepth: 6"));
    }
}
