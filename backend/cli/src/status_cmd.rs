//! CLI Status Command
//!
//! Reports whether a FaceGate server is answering on the configured port.

use std::time::Duration;

use anyhow::Result;
use facegate_config::FaceGateConfig;

pub async fn run(config: &FaceGateConfig) -> Result<()> {
    let host = match config.server.bind.as_str() {
        "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
        other => other,
    };
    let url = format!("http://{}:{}/api/health", host, config.server.port);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => println!("FaceGate at {} answered {}", url, resp.status()),
        Err(_) => println!("FaceGate is not running on port {}", config.server.port),
    }
    Ok(())
}
