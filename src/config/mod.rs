//! JSON runtime configuration for the `grid_capture` binary.
use crate::pipeline::CaptureParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Where the `(cols + 1) × (rows + 1)` label raster is written.
    pub raster_path: PathBuf,
    #[serde(default)]
    pub json_out: Option<PathBuf>,
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    pub output: OutputConfig,
    #[serde(default)]
    pub params: CaptureParams,
}

pub fn parse_config(contents: &str) -> Result<RuntimeConfig, String> {
    serde_json::from_str(contents).map_err(|e| format!("Failed to parse config: {e}"))
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("{e} ({})", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_default_params() {
        let cfg = parse_config(
            r#"{ "input_path": "die.png", "output": { "raster_path": "out.png" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.input_path, PathBuf::from("die.png"));
        assert_eq!(cfg.output.raster_path, PathBuf::from("out.png"));
        assert!(cfg.output.json_out.is_none());
        assert_eq!(cfg.params, CaptureParams::default());
    }

    #[test]
    fn missing_output_is_rejected() {
        let err = parse_config(r#"{ "input_path": "die.png" }"#).unwrap_err();
        assert!(err.contains("output"), "{err}");
    }
}
