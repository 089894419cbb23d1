// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes the affine
//! relationship between the integral pixel plane of the output image
//! and the region of the complex plane being visualized: which point
//! sits at the centre of the image, how many world units one pixel
//! spans, and how far the whole frame is rotated about its centre.

use num::Complex;

/// Maps output pixel coordinates to points on the complex plane.  The
/// mapping is a translation to the image centre, a rotation about it,
/// a uniform scale, and a final translation to the focal point, in
/// that order.  A Viewport is immutable once constructed and the
/// mapping is a pure function, so the same value can be read from any
/// number of worker threads at once.
#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    /// The point on the complex plane that the centre pixel maps to.
    pub location: Complex<f64>,
    /// World units spanned by one pixel.
    pub scale: f64,
    /// Rotation about the centre of the image, in radians.
    pub rotation: f64,
    /// Width of the output image in pixels.
    pub width: u32,
    /// Height of the output image in pixels.
    pub height: u32,
}

impl Viewport {
    /// Translate a pixel coordinate to a point on the complex plane.
    /// Fractional pixel coordinates are expected; supersampling feeds
    /// subpixel offsets straight through here.  The rotation is
    /// applied in pixel space, before the scale; since the scale is
    /// uniform on both axes the frame rotates without shearing.
    pub fn point_at(&self, px: f64, py: f64) -> Complex<f64> {
        // move the origin to the centre of the image
        let x = px - f64::from(self.width) / 2.0;
        let y = py - f64::from(self.height) / 2.0;

        // rotate
        let (sin_rt, cos_rt) = self.rotation.sin_cos();
        let xr = x * cos_rt - y * sin_rt;
        let yr = x * sin_rt + y * cos_rt;

        // scale, then move to the focal point
        Complex::new(
            xr * self.scale + self.location.re,
            yr * self.scale + self.location.im,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(location: Complex<f64>, rotation: f64) -> Viewport {
        Viewport {
            location,
            scale: 0.01,
            rotation,
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn centre_pixel_maps_to_location() {
        // exact for any location and rotation: the centre offset is
        // zero before the rotation and scale ever touch it
        for &rotation in &[0.0, 0.3, 1.0, 3.9] {
            let view = viewport(Complex::new(-0.5, 0.25), rotation);
            assert_eq!(view.point_at(320.0, 240.0), view.location);
        }
    }

    #[test]
    fn one_pixel_step_is_one_scale_unit() {
        let view = viewport(Complex::new(0.0, 0.0), 0.0);
        let step = view.point_at(321.0, 240.0);
        assert_eq!(step.re, view.scale);
        assert_eq!(step.im, 0.0);
    }

    #[test]
    fn half_turn_negates_the_offset() {
        use std::f64::consts::PI;
        let view = viewport(Complex::new(0.0, 0.0), PI);
        let step = view.point_at(321.0, 240.0);
        assert_eq!(step.re, -view.scale);
        assert!(step.im.abs() < 1e-12);
    }

    #[test]
    fn fractional_pixels_land_between_integral_ones() {
        let view = viewport(Complex::new(0.0, 0.0), 0.0);
        let whole = view.point_at(320.0, 240.0);
        let half = view.point_at(320.5, 240.0);
        assert_eq!(whole.re, 0.0);
        assert_eq!(half.re, view.scale / 2.0);
    }
}
