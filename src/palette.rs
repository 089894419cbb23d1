// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Palette struct, the banded color-mapping strategy: a
//! fixed ramp of colors swept through HSV space, indexed by the escape
//! time folded into a triangle wave.  Unlike the color wheel it takes
//! no stops from the user, just a band count and a smoothing
//! subdivision, which makes it the quick way to get a presentable
//! render before hand-tuning a wheel.

use image::Rgba;

/// Convert a color from HSV space to RGB.  Hue is in degrees within
/// [0, 360); saturation and value lie in [0, 1].
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgba<u8> {
    let hh = h / 60.0;
    let sector = (hh as usize) % 6;
    let ff = hh - hh.floor();

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * ff);
    let t = v * (1.0 - s * (1.0 - ff));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgba([
        (255.0 * r) as u8,
        (255.0 * g) as u8,
        (255.0 * b) as u8,
        255,
    ])
}

/// The banded color-mapping strategy.  [`generate`] precomputes
/// `length · smooth_scale` colors along an HSV ramp; [`color_at`]
/// folds the escape time into a triangle wave with period
/// `2 · length`, so the bands run down the ramp and back up instead of
/// cutting off at the end.  The `smooth_scale` subdivides each band so
/// smoothed (fractional) iteration values do not posterize.  Same
/// contract as the color wheel: generate once, then the ramp is
/// immutable and lookups are lock-free from any thread.
///
/// [`generate`]: #method.generate
/// [`color_at`]: #method.color_at
#[derive(Clone, Debug)]
pub struct Palette {
    /// Number of whole color bands on the ramp.
    pub length: usize,
    /// Subdivisions per band for smoothed iteration values.
    pub smooth_scale: usize,
    /// The color returned for interior (never-escaping) points.
    pub inf_color: Rgba<u8>,
    palette: Vec<Rgba<u8>>,
}

impl Palette {
    /// Constructor.  The ramp is not built yet; `generate` must run
    /// before any `color_at` lookup.
    pub fn new(length: usize, smooth_scale: usize, inf_color: Rgba<u8>) -> Palette {
        Palette {
            length,
            smooth_scale,
            inf_color,
            palette: Vec::new(),
        }
    }

    /// Build the ramp: a sweep from white through the green-blue hues
    /// toward black as the normalized position advances.  Runs once,
    /// single-threaded, before any lookup.
    pub fn generate(&mut self) {
        let len = self.length * self.smooth_scale;
        self.palette = (0..len)
            .map(|i| {
                let n = i as f64 / len as f64;
                hsv_to_rgb(60.0 + 120.0 * n, n, 1.0 - n)
            })
            .collect();
    }

    /// Look up the color for an escape time.  Interior points (the
    /// infinite sentinel, or NaN) get `inf_color`; negative values
    /// clamp to zero.  Otherwise the time is folded into a triangle
    /// wave: `|1 − 2·frac(itr / 2·length)|` runs 1 → 0 → 1 over each
    /// period, and scales to a ramp index.  The crest of the wave
    /// lands one slot past the end of the ramp; it is clamped back.
    pub fn color_at(&self, itr: f64) -> Rgba<u8> {
        if itr.is_nan() || itr.is_infinite() {
            return self.inf_color;
        }
        let itr = if itr < 0.0 { 0.0 } else { itr };

        let f = (itr / (2.0 * self.length as f64)).fract();
        let mut idx = ((1.0 - 2.0 * f).abs() * self.palette.len() as f64) as usize;
        if idx >= self.palette.len() {
            idx = self.palette.len() - 1;
        }
        self.palette[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::INFINITY;

    const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

    fn palette() -> Palette {
        let mut palette = Palette::new(16, 4, MAGENTA);
        palette.generate();
        palette
    }

    #[test]
    fn hsv_primaries_convert_exactly() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgba([255, 0, 0, 255]));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgba([0, 255, 0, 255]));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgba([0, 0, 255, 255]));
        assert_eq!(hsv_to_rgb(0.0, 0.0, 1.0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn interior_sentinel_gets_the_interior_color() {
        let palette = palette();
        assert_eq!(palette.color_at(INFINITY), MAGENTA);
        assert_eq!(palette.color_at(::std::f64::NAN), MAGENTA);
    }

    #[test]
    fn the_wave_crest_stays_in_bounds() {
        let palette = palette();
        // itr = 0 puts the triangle wave at its crest, exactly one
        // past the last ramp slot
        assert_eq!(palette.color_at(0.0), palette.color_at(32.0));
    }

    #[test]
    fn bands_repeat_with_period_twice_the_length() {
        let palette = palette();
        for &x in &[0.25, 5.0, 13.5] {
            assert_eq!(palette.color_at(x), palette.color_at(x + 32.0));
            assert_eq!(palette.color_at(x), palette.color_at(x + 96.0));
        }
    }

    #[test]
    fn the_wave_is_symmetric_about_the_band_length() {
        let palette = palette();
        for &d in &[2.0, 4.0, 7.5] {
            assert_eq!(palette.color_at(16.0 - d), palette.color_at(16.0 + d));
        }
    }

    #[test]
    fn smoothing_subdivides_the_bands() {
        let mut coarse = Palette::new(16, 1, MAGENTA);
        coarse.generate();
        let fine = palette();
        // within one band the coarse ramp is flat while the fine one
        // moves
        assert_eq!(coarse.color_at(16.0), coarse.color_at(16.2));
        assert!(fine.color_at(16.0) != fine.color_at(19.9));
    }
}
