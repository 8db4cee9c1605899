//! Placeholder frame generation: draw a marker circle at each detected face
//! centroid. The real filter pipeline will replace this.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::detect::Centroid;

/// Marker outline color.
pub const OUTLINE: Rgb<u8> = Rgb([255, 0, 0]);

/// Marker stroke width in pixels.
pub const STROKE_WIDTH: i32 = 10;

/// Draw an unfilled circle of `radius` pixels centered at each centroid,
/// mutating the buffer in place. Does nothing for an empty centroid list.
///
/// The radius is cosmetic and chosen per endpoint: box-derived centroids
/// get a small marker, landmark-derived ones a large ring around the face.
pub fn draw_centroids(pixels: &mut RgbImage, centroids: &[Centroid], radius: i32) {
    for centroid in centroids {
        let center = (centroid.x.round() as i32, centroid.y.round() as i32);
        // A hollow circle is one pixel wide; step the radius inward to get
        // the full stroke.
        for step in 0..STROKE_WIDTH.min(radius) {
            draw_hollow_circle_mut(pixels, center, radius - step, OUTLINE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::TEST_FRAME;

    #[test]
    fn empty_centroid_list_is_a_noop() {
        let mut pixels = TEST_FRAME.clone();
        draw_centroids(&mut pixels, &[], 25);
        assert_eq!(pixels.as_raw(), TEST_FRAME.as_raw());
    }

    #[test]
    fn marker_ring_lands_on_the_outline_color() {
        let mut pixels = RgbImage::from_pixel(64, 64, Rgb([0, 0, 0]));
        draw_centroids(&mut pixels, &[Centroid { x: 32.0, y: 32.0 }], 20);

        // Cardinal points of the outer ring.
        assert_eq!(*pixels.get_pixel(52, 32), OUTLINE);
        assert_eq!(*pixels.get_pixel(12, 32), OUTLINE);
        assert_eq!(*pixels.get_pixel(32, 52), OUTLINE);
        assert_eq!(*pixels.get_pixel(32, 12), OUTLINE);
        // The center stays untouched.
        assert_eq!(*pixels.get_pixel(32, 32), Rgb([0, 0, 0]));
    }

    #[test]
    fn stroke_fills_inward_from_the_radius() {
        let mut pixels = RgbImage::from_pixel(64, 64, Rgb([0, 0, 0]));
        draw_centroids(&mut pixels, &[Centroid { x: 32.0, y: 32.0 }], 20);

        // Rings are drawn at radii 20 down to 11; radius 10 is inside the
        // stroke and stays black.
        for ring in 11..=20 {
            assert_eq!(*pixels.get_pixel(32 + ring, 32), OUTLINE);
        }
        assert_eq!(*pixels.get_pixel(32 + 10, 32), Rgb([0, 0, 0]));
    }

    #[test]
    fn centroids_near_the_border_do_not_panic() {
        let mut pixels = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        let centroids = [
            Centroid { x: 0.0, y: 0.0 },
            Centroid { x: 31.0, y: 31.0 },
            Centroid { x: -5.0, y: 40.0 },
        ];
        draw_centroids(&mut pixels, &centroids, 25);
    }
}
