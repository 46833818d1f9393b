//! CLI Config Command

use std::path::Path;

use anyhow::{Context, Result};
use facegate_config::{redact, write_config, FaceGateConfig};

/// Print the effective config as YAML, secrets masked.
pub fn show(config: &FaceGateConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &FaceGateConfig) -> Result<String> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    serde_yaml::to_string(&redact(&value)).context("Failed to render config as YAML")
}

/// Write a default config file unless one already exists.
pub async fn init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    write_config(&FaceGateConfig::default(), path).await?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_masks_api_key() {
        let mut config = FaceGateConfig::default();
        config.analyzer.api_key = Some("df-0123456789abcdef".into());
        let yaml = render(&config).unwrap();
        assert!(yaml.contains("df-0***"));
        assert!(!yaml.contains("0123456789abcdef"));
        assert!(yaml.contains("port: 3001"));
    }

    #[tokio::test]
    async fn init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  port: 4000\n").unwrap();
        init(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "server:\n  port: 4000\n");
    }

    #[tokio::test]
    async fn init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        init(&path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("relay:"));
    }
}
