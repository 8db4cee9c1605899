//! Runtime settings, resolved once at startup.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Service configuration. Defaults cover local development; a
/// `framegen.toml` next to the working directory or `FRAMEGEN_*`
/// environment variables override them.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Human-readable service name, reported by the root route.
    pub app_name: String,
    pub version: String,
    /// Port the HTTP listener binds on.
    pub port: u16,
    /// Path to the TorchScript bounding-box face detector.
    pub face_model: PathBuf,
    /// Path to the TorchScript facial-landmark estimator.
    pub landmark_model: PathBuf,
    /// Upper bound on faces taken from the landmark model per frame.
    pub max_faces: i64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app_name", "framegen")?
            .set_default("version", env!("CARGO_PKG_VERSION"))?
            .set_default("port", 8000_i64)?
            .set_default("face_model", "models/yolov8n-face.torchscript")?
            .set_default("landmark_model", "models/face_landmarker.pt")?
            .set_default("max_faces", 5_i64)?
            .add_source(File::with_name("framegen").required(false))
            .add_source(Environment::with_prefix("FRAMEGEN"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_local_development() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.app_name, "framegen");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.max_faces, 5);
        assert!(settings.face_model.to_string_lossy().ends_with(".torchscript"));
    }
}
