//! Face-detection backends and centroid normalization.
//!
//! Two pretrained TorchScript exports sit behind one capability: give the
//! adapter a decoded frame, get back a list of face centroids. The
//! bounding-box model reports pixel-space boxes; the landmark model reports
//! normalized keypoint sets. Both are reduced to centroids here so the rest
//! of the pipeline never sees the difference.

use std::path::Path;
use std::sync::Mutex;

use tch::{no_grad, CModule, Kind, Tensor};
use thiserror::Error;
use tracing::info;

use crate::codec::DecodedFrame;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to load model from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: tch::TchError,
    },

    #[error("inference failed: {0}")]
    Inference(#[from] tch::TchError),

    #[error("model returned a malformed output tensor (shape {0:?})")]
    MalformedOutput(Vec<i64>),
}

/// Pixel-space center of a detected face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned face bounding box in pixel coordinates, with `x1 < x2` and
/// `y1 < y2`.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Midpoint of the box.
    pub fn centroid(&self) -> Centroid {
        Centroid {
            x: (self.x1 + self.x2) / 2.0,
            y: (self.y1 + self.y2) / 2.0,
        }
    }
}

/// Facial keypoints normalized to `[0, 1]` relative to the frame edges.
#[derive(Debug, Clone)]
pub struct LandmarkSet(pub Vec<(f64, f64)>);

impl LandmarkSet {
    /// Arithmetic mean of the keypoints, scaled to pixel space and rounded
    /// to whole pixels.
    pub fn centroid(&self, width: u32, height: u32) -> Centroid {
        let count = self.0.len() as f64;
        let (sum_x, sum_y) = self
            .0
            .iter()
            .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));

        Centroid {
            x: (sum_x / count * f64::from(width)).round(),
            y: (sum_y / count * f64::from(height)).round(),
        }
    }
}

/// Bounding-box face detector (a TorchScript export of a YOLO-family face
/// model).
///
/// Output contract: a float tensor of `[N, >=5]` rows holding
/// `(x1, y1, x2, y2, confidence, ...)` in pixel coordinates, confidence
/// thresholding and non-max suppression already applied inside the export.
/// A leading batch dimension of 1 is tolerated.
#[derive(Debug)]
pub struct FaceBoxModel {
    model: Mutex<CModule>,
}

impl FaceBoxModel {
    pub fn load(path: &Path) -> Result<Self, DetectError> {
        let model = CModule::load(path).map_err(|source| DetectError::Load {
            path: path.display().to_string(),
            source,
        })?;
        Ok(FaceBoxModel {
            model: Mutex::new(model),
        })
    }

    fn boxes(&self, frame: &DecodedFrame) -> Result<Vec<BoundingBox>, DetectError> {
        let input = frame_to_tensor(frame)?;
        let output = {
            let model = self.model.lock().unwrap();
            no_grad(|| model.forward_ts(&[input]))?
        };

        let output = strip_batch_dim(output, 2);
        let shape = output.size();
        if shape.len() != 2 || shape[1] < 5 {
            return Err(DetectError::MalformedOutput(shape));
        }

        let mut boxes = Vec::with_capacity(shape[0] as usize);
        for row in 0..shape[0] {
            boxes.push(BoundingBox {
                x1: output.double_value(&[row, 0]),
                y1: output.double_value(&[row, 1]),
                x2: output.double_value(&[row, 2]),
                y2: output.double_value(&[row, 3]),
            });
        }
        Ok(boxes)
    }
}

/// Landmark-based face estimator (a TorchScript export of a facial-landmark
/// model).
///
/// Output contract: a `[F, P, 2]` float tensor of keypoints normalized to
/// `[0, 1]`, one row of `P` points per detected face. A leading batch
/// dimension of 1 is tolerated. At most `max_faces` faces are taken per
/// frame.
#[derive(Debug)]
pub struct LandmarkModel {
    model: Mutex<CModule>,
    max_faces: i64,
}

impl LandmarkModel {
    pub fn load(path: &Path, max_faces: i64) -> Result<Self, DetectError> {
        let model = CModule::load(path).map_err(|source| DetectError::Load {
            path: path.display().to_string(),
            source,
        })?;
        Ok(LandmarkModel {
            model: Mutex::new(model),
            max_faces,
        })
    }

    fn landmarks(&self, frame: &DecodedFrame) -> Result<Vec<LandmarkSet>, DetectError> {
        let input = frame_to_tensor(frame)?;
        let output = {
            let model = self.model.lock().unwrap();
            no_grad(|| model.forward_ts(&[input]))?
        };

        let output = strip_batch_dim(output, 3);
        let shape = output.size();
        if shape.len() != 3 || shape[2] != 2 || (shape[0] > 0 && shape[1] == 0) {
            return Err(DetectError::MalformedOutput(shape));
        }

        let faces = shape[0].min(self.max_faces);
        let mut sets = Vec::with_capacity(faces as usize);
        for face in 0..faces {
            let points = (0..shape[1])
                .map(|point| {
                    (
                        output.double_value(&[face, point, 0]),
                        output.double_value(&[face, point, 1]),
                    )
                })
                .collect();
            sets.push(LandmarkSet(points));
        }
        Ok(sets)
    }
}

/// The two detector families behind one capability: a frame in, face
/// centroids out. Selected per endpoint.
#[derive(Debug)]
pub enum Detector {
    /// Bounding-box model; centroid is the box midpoint.
    FaceBox(FaceBoxModel),
    /// Landmark model; centroid is the keypoint mean scaled to pixel space.
    Landmark(LandmarkModel),
}

impl Detector {
    /// Run one inference pass over the frame and normalize the output to
    /// centroids. Zero detected faces is a valid, empty result.
    pub fn centroids(&self, frame: &DecodedFrame) -> Result<Vec<Centroid>, DetectError> {
        let centroids: Vec<Centroid> = match self {
            Detector::FaceBox(model) => model
                .boxes(frame)?
                .iter()
                .map(BoundingBox::centroid)
                .collect(),
            Detector::Landmark(model) => model
                .landmarks(frame)?
                .iter()
                .map(|set| set.centroid(frame.width(), frame.height()))
                .collect(),
        };

        if centroids.is_empty() {
            info!("no faces were detected in the frame");
        }
        Ok(centroids)
    }

    /// Short backend name used in logs and liveness probes.
    pub fn name(&self) -> &'static str {
        match self {
            Detector::FaceBox(_) => "yolo",
            Detector::Landmark(_) => "mediapipe",
        }
    }
}

/// Load the frame's compressed bytes into the CHW float tensor the exports
/// expect: values in `[0, 1]`, leading batch dimension of 1.
fn frame_to_tensor(frame: &DecodedFrame) -> Result<Tensor, tch::TchError> {
    let image = tch::vision::image::load_from_memory(&frame.bytes)?;
    Ok((image.to_kind(Kind::Float) / 255.).unsqueeze(0))
}

/// Some exports keep the batch dimension on their output; drop it when
/// present so extraction sees the documented shape.
fn strip_batch_dim(output: Tensor, expected_dims: usize) -> Tensor {
    let shape = output.size();
    if shape.len() == expected_dims + 1 && shape[0] == 1 {
        output.squeeze_dim(0)
    } else {
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_centroid_is_the_midpoint() {
        let bbox = BoundingBox {
            x1: 10.0,
            y1: 20.0,
            x2: 30.0,
            y2: 60.0,
        };
        assert_eq!(bbox.centroid(), Centroid { x: 20.0, y: 40.0 });
    }

    #[test]
    fn box_centroid_is_exact_on_odd_spans() {
        let bbox = BoundingBox {
            x1: 0.0,
            y1: 0.0,
            x2: 5.0,
            y2: 7.0,
        };
        assert_eq!(bbox.centroid(), Centroid { x: 2.5, y: 3.5 });
    }

    #[test]
    fn landmark_centroid_scales_and_rounds() {
        let set = LandmarkSet(vec![(0.25, 0.4), (0.35, 0.6), (0.3, 0.5)]);
        // mean x = 0.3, mean y = 0.5
        assert_eq!(set.centroid(640, 480), Centroid { x: 192.0, y: 240.0 });
    }

    #[test]
    fn single_point_set_maps_straight_to_pixels() {
        let set = LandmarkSet(vec![(0.5, 0.5)]);
        assert_eq!(set.centroid(100, 50), Centroid { x: 50.0, y: 25.0 });
    }
}
