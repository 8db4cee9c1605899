//! Process-wide application state: settings plus the once-loaded detector
//! backends, constructed before the HTTP listener binds and read-only
//! afterwards.

use anyhow::{bail, Result};
use tracing::info;

use crate::detect::{Detector, FaceBoxModel, LandmarkModel};
use crate::settings::Settings;

/// Everything the request handlers share. One instance is built at startup
/// and injected into every handler via `web::Data`; the models inside it
/// are never reloaded.
#[derive(Debug)]
pub struct AppContext {
    pub settings: Settings,
    /// Backend for the `/vision/yolo` endpoint.
    pub face_box: Detector,
    /// Backend for the `/vision/media` endpoint.
    pub landmark: Detector,
}

impl AppContext {
    /// Validate the model assets and load them. A missing or unloadable
    /// model is fatal: the service must not start without its backends.
    pub fn initialize(settings: Settings) -> Result<Self> {
        for path in [&settings.face_model, &settings.landmark_model] {
            if !path.exists() {
                bail!("model asset not found at {}", path.display());
            }
        }

        info!(path = %settings.face_model.display(), "loading bounding-box face model");
        let face_box = Detector::FaceBox(FaceBoxModel::load(&settings.face_model)?);

        info!(path = %settings.landmark_model.display(), "loading landmark model");
        let landmark = Detector::Landmark(LandmarkModel::load(
            &settings.landmark_model,
            settings.max_faces,
        )?);

        Ok(AppContext {
            settings,
            face_box,
            landmark,
        })
    }
}
