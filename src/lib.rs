//! framegen: an HTTP service that runs pretrained face detectors over
//! base64-encoded camera frames and returns each frame with a marker drawn
//! at every detected face.
//!
//! The pipeline per request is codec → detector adapter → annotator →
//! codec; see the individual modules. Models are loaded once at startup
//! into an [`context::AppContext`] shared by all handlers.

pub mod annotate;
pub mod codec;
pub mod context;
pub mod detect;
pub mod server;
pub mod settings;

/// Helpers shared by the test suites.
pub mod util {
    pub mod test {
        use image::{ImageOutputFormat, Rgb, RgbImage};
        use once_cell::sync::Lazy;

        /// A small grey frame with a dark square in it: enough structure
        /// for the codec round-trip and annotation tests without shipping
        /// a fixture file.
        pub static TEST_FRAME: Lazy<RgbImage> = Lazy::new(|| {
            RgbImage::from_fn(64, 48, |x, y| {
                if (16..32).contains(&x) && (16..32).contains(&y) {
                    Rgb([40, 40, 40])
                } else {
                    Rgb([200, 200, 200])
                }
            })
        });

        /// Base64 PNG of [`TEST_FRAME`], as a client would send it.
        pub fn test_frame_b64() -> String {
            crate::codec::encode(&TEST_FRAME, ImageOutputFormat::Png).unwrap()
        }
    }
}
