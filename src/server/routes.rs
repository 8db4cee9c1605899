//! Route handlers. The vision endpoints orchestrate codec → detector →
//! annotator → codec for each inbound frame; the remaining routes are
//! liveness probes for the frontends.

use actix_web::{get, post, web, Responder};
use anyhow::anyhow;
use image::ImageOutputFormat;
use tracing::{error, info, warn};

use super::protocol::{FrameRequest, FrameResponse, HealthCheck, StatusMessage};
use super::WebError;
use crate::annotate;
use crate::codec;
use crate::context::AppContext;
use crate::detect::Detector;

type Result<T> = std::result::Result<T, WebError>;

/// Marker radius for box-derived centroids.
const YOLO_RADIUS: i32 = 25;

/// Marker radius for landmark-derived centroids. These sit in the middle of
/// the face, so the marker is sized to ring it.
const MEDIA_RADIUS: i32 = 100;

/// Frame generation backed by the bounding-box face detector.
#[post("/yolo")]
pub async fn yolo_frame_gen(
    req: web::Json<FrameRequest>,
    ctx: web::Data<AppContext>,
) -> Result<impl Responder> {
    frame_gen(req.into_inner(), ctx, |ctx| &ctx.face_box, YOLO_RADIUS).await
}

/// Frame generation backed by the facial-landmark estimator.
#[post("/media")]
pub async fn media_frame_gen(
    req: web::Json<FrameRequest>,
    ctx: web::Data<AppContext>,
) -> Result<impl Responder> {
    frame_gen(req.into_inner(), ctx, |ctx| &ctx.landmark, MEDIA_RADIUS).await
}

/// The shared request pipeline: parse → decode → detect → annotate →
/// re-encode. The detector and marker radius are the only things that
/// differ between the two vision endpoints.
async fn frame_gen(
    req: FrameRequest,
    ctx: web::Data<AppContext>,
    pick: fn(&AppContext) -> &Detector,
    radius: i32,
) -> Result<web::Json<FrameResponse>> {
    let input = req
        .b64_input
        .ok_or_else(|| WebError::input(anyhow!("payload is missing b64_input")))?;

    let mut frame = codec::decode(&input).map_err(|err| {
        warn!("rejecting frame: {err}");
        WebError::input(err)
    })?;
    info!(
        detector = pick(&ctx).name(),
        width = frame.width(),
        height = frame.height(),
        "decoded inbound frame"
    );

    // Inference and drawing are CPU-bound; keep them off the async workers.
    let b64_output = web::block(move || -> Result<String> {
        let detector = pick(&ctx);
        let centroids = detector.centroids(&frame).map_err(|err| {
            error!(
                detector = detector.name(),
                width = frame.width(),
                height = frame.height(),
                "inference failed: {err}"
            );
            WebError::inference(err)
        })?;

        annotate::draw_centroids(&mut frame.pixels, &centroids, radius);
        Ok(codec::encode(&frame.pixels, ImageOutputFormat::Png)?)
    })
    .await
    .map_err(|err| WebError::inference(anyhow!(err)))??;

    info!("finished serving frame generation request");
    Ok(web::Json(FrameResponse { b64_output }))
}

/// Liveness probe for the bounding-box backend.
#[get("/yolo")]
pub async fn yolo_active() -> impl Responder {
    web::Json(StatusMessage {
        message: "yolo backend active".into(),
    })
}

/// Liveness probe for the landmark backend.
#[get("/media")]
pub async fn media_active() -> impl Responder {
    web::Json(StatusMessage {
        message: "mediapipe backend active".into(),
    })
}

/// Health check under the `/api` scope.
#[get("/")]
pub async fn health_check() -> impl Responder {
    web::Json(HealthCheck {
        health: "ok".into(),
    })
}

/// Root banner, kept for frontends that probe the service by name.
#[get("/")]
pub async fn home(ctx: web::Data<AppContext>) -> impl Responder {
    web::Json(StatusMessage {
        message: format!("Running on {}", ctx.settings.app_name),
    })
}
