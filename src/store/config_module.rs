//! Generated configuration module (`export const <name> = {...};`)

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Writer for the single configuration source file the drawing tool imports
pub struct ConfigModule {
    path: PathBuf,
    export_name: String,
    write_lock: tokio::sync::Mutex<()>,
}

impl ConfigModule {
    pub fn new(path: impl Into<PathBuf>, export_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            export_name: export_name.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the module source: the config as 4-space indented JSON assigned
    /// to the exported constant
    pub fn render(&self, config: &serde_json::Value) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        config.serialize(&mut serializer)?;

        let json = String::from_utf8_lossy(&buf);
        Ok(format!("export const {} = {};\n", self.export_name, json))
    }

    /// Overwrite the module with `config`; no merging with the previous content
    pub async fn save(&self, config: &serde_json::Value) -> Result<()> {
        let source = self.render(config)?;

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, source).await?;

        tracing::info!("Saved config module to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_render_template() {
        let module = ConfigModule::new("config.default.js", "defaultConfig");
        let source = module.render(&json!({"theme": {"accent": "#b8bb26"}})).unwrap();

        assert_eq!(
            source,
            "export const defaultConfig = {\n    \"theme\": {\n        \"accent\": \"#b8bb26\"\n    }\n};\n"
        );
    }

    #[tokio::test]
    async fn test_save_replaces_previous() {
        let temp_dir = TempDir::new().unwrap();
        let module = ConfigModule::new(
            temp_dir.path().join("src").join("config.default.js"),
            "defaultConfig",
        );

        module.save(&json!({"x": 1})).await.unwrap();
        module.save(&json!({"y": 2})).await.unwrap();

        let content = std::fs::read_to_string(module.path()).unwrap();
        assert!(content.contains("\"y\": 2"));
        assert!(!content.contains("\"x\""));
    }
}
