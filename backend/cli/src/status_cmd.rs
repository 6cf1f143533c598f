//! CLI Status Command
//!
//! Queries `/health` of a running server.

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://127.0.0.1:{port}/health");
    match reqwest::get(&url).await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("tutorbridge is not running on port {port}");
        }
    }
    Ok(())
}
