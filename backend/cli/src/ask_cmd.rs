//! CLI Ask Command
//!
//! One model call with the configured prompt, no deadline and no session.

use anyhow::Result;
use tutorbridge_config::TutorConfig;
use tutorbridge_model::ModelClient;

pub async fn run(config: &TutorConfig, question: &str) -> Result<()> {
    let client = ModelClient::from_config(config)?;
    let answer = client.complete(question).await?;
    println!("{answer}");
    Ok(())
}
