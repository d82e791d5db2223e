use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::Value;

use crate::error::Result;

/// A deployment the generated SDKs can point at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    pub name: String,
    pub host: String,
}

/// Project information echoed in the protocol document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterOptions {
    pub project: String,
    pub envs: Vec<Env>,
}

/// `[package.metadata.sdk_kit]` of a `Cargo.toml`.
///
/// ```toml
/// [package.metadata.sdk_kit]
/// project = "blog"
/// address = "http://127.0.0.1:3000"
/// target = "go"
/// output_dir = "sdk/go"
/// envs = [{ name = "dev", host = "http://127.0.0.1:3000" }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub address: Option<String>,
    pub target: Option<String>,
    pub package: Option<String>,
    pub output_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub options: ExporterOptions,
}

impl ManifestConfig {
    /// Reads `Cargo.toml` in `project_root`. Relative `output_dir` values are resolved against it.
    pub fn from_project(project_root: &Path) -> Result<Self> {
        let mut config = Self::from_manifest(&project_root.join("Cargo.toml"))?;
        if let Some(dir) = config.output_dir.take() {
            config.output_dir = Some(project_root.join(dir));
        }
        Ok(config)
    }

    pub fn from_manifest(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// A manifest without the metadata table yields the default config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: Value = toml::from_str(content)?;
        let table = manifest
            .get("package")
            .and_then(|package| package.get("metadata"))
            .and_then(|metadata| metadata.get("sdk_kit"));
        match table {
            Some(table) => Ok(table.clone().try_into()?),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_metadata_table() {
        let config = ManifestConfig::from_toml_str(
            r#"
            [package]
            name = "blog"

            [package.metadata.sdk_kit]
            project = "blog"
            target = "go"
            output_dir = "sdk/go"
            envs = [{ name = "dev", host = "http://127.0.0.1:3000" }]
            "#,
        )
        .unwrap();
        assert_eq!(config.target.as_deref(), Some("go"));
        assert_eq!(config.output_dir, Some(PathBuf::from("sdk/go")));
        assert_eq!(config.options.project, "blog");
        assert_eq!(config.options.envs[0].host, "http://127.0.0.1:3000");
        assert!(config.address.is_none());
    }

    #[test]
    fn missing_table_is_default() {
        let config = ManifestConfig::from_toml_str("[package]\nname = \"x\"\n").unwrap();
        assert_eq!(config, ManifestConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(ManifestConfig::from_toml_str("[package").is_err());
    }
}
