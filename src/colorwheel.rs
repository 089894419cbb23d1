// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the ColorWheel struct, which maps an escape time to a
//! display color.  The wheel is a circular ramp: user-supplied color
//! stops sit at angles around a circle, the gaps between them are
//! filled by linear interpolation into a discrete palette, and escape
//! times are wound around the circle so that values beyond one full
//! cycle wrap back through the same sequence.  That wrap is what
//! produces the characteristic banded fractal coloring.

use image::Rgba;
use std::cmp::Ordering;
use std::f64::consts::PI;

/// One color stop on the wheel: a color pinned at an angle around the
/// circle, in radians within [0, 2π).
#[derive(Copy, Clone, Debug)]
pub struct ColorNode {
    /// The color at this stop.
    pub color: Rgba<u8>,
    /// The angle of this stop, radians.
    pub angle: f64,
}

/// A circular color ramp.  Call [`generate`] once to build the
/// discrete palette, then [`color_at`] any number of times from any
/// number of threads; the palette is immutable after generation, which
/// is what makes concurrent lookups safe without locks.
///
/// [`generate`]: #method.generate
/// [`color_at`]: #method.color_at
#[derive(Clone, Debug)]
pub struct ColorWheel {
    /// Iteration-to-angle scale: an escape time of `radius` sweeps one
    /// radian, so the wheel repeats every `radius · 2π` iterations.
    pub radius: f64,
    /// Number of discrete colors in the generated palette.
    pub palette_size: usize,
    /// The color returned for interior (never-escaping) points.
    pub inf_color: Rgba<u8>,
    nodes: Vec<ColorNode>,
    palette: Vec<Rgba<u8>>,
}

// Interpolate between two colors channel-by-channel.  The 8-bit
// channels are widened to 16 bits for the interpolation and truncated
// back down on the way out.
fn lerp(from: Rgba<u8>, to: Rgba<u8>, t: f64) -> Rgba<u8> {
    let mut out = [0u8; 4];
    for ch in 0..4 {
        let a = f64::from(u16::from(from[ch]) * 257);
        let b = f64::from(u16::from(to[ch]) * 257);
        out[ch] = (((a + (b - a) * t) as u32) / 257) as u8;
    }
    Rgba(out)
}

impl ColorWheel {
    /// Constructor.  The palette is not built yet; `generate` must run
    /// before any `color_at` lookup.
    pub fn new(
        radius: f64,
        palette_size: usize,
        inf_color: Rgba<u8>,
        nodes: Vec<ColorNode>,
    ) -> ColorWheel {
        ColorWheel {
            radius,
            palette_size,
            inf_color,
            nodes,
            palette: Vec::new(),
        }
    }

    /// The color stops this wheel was built from.
    pub fn nodes(&self) -> &[ColorNode] {
        &self.nodes
    }

    /// Build the discrete palette.  Runs once, single-threaded, before
    /// any lookups begin; this is the one synchronization barrier in
    /// the render pipeline, and `Renderer::new` enforces it by
    /// generating the wheel before any worker exists.
    ///
    /// Stops are sorted by angle and each consecutive pair (the last
    /// wrapping around to the first, one full turn later) fills the
    /// palette slots whose angle falls in the half-open span between
    /// them.  A span that contains no slot positions, including the
    /// zero-width span between two stops pinned at the same angle,
    /// writes nothing; that is valid, not an error.
    pub fn generate(&mut self) {
        let size = self.palette_size;
        let step = 2.0 * PI / size as f64;
        // a stop with a non-finite angle has no place on the circle;
        // drop it rather than let NaN poison the sort and the spans
        let mut nodes: Vec<ColorNode> = self
            .nodes
            .iter()
            .filter(|node| node.angle.is_finite())
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.angle.partial_cmp(&b.angle).unwrap_or(Ordering::Equal));

        self.palette = vec![Rgba([0, 0, 0, 255]); size];
        for i in 0..nodes.len() {
            let from = nodes[i];
            let (to_color, to_angle) = if i + 1 == nodes.len() {
                (nodes[0].color, nodes[0].angle + 2.0 * PI)
            } else {
                (nodes[i + 1].color, nodes[i + 1].angle)
            };

            let first = (from.angle / step).ceil() as usize;
            let last = (to_angle / step).ceil() as usize;
            for slot in first..last {
                let t = (slot as f64 * step - from.angle) / (to_angle - from.angle);
                self.palette[slot % size] = lerp(from.color, to_color, t);
            }
        }
    }

    /// Look up the color for an escape time.  Interior points (the
    /// infinite sentinel, or NaN out of a degenerate smoothing term)
    /// get `inf_color`; negative values clamp to zero.  Everything
    /// else is wound onto the wheel: `angle = (itr / radius) mod 2π`,
    /// rounded to the nearest palette slot, with a full turn wrapping
    /// back to slot zero.
    pub fn color_at(&self, itr: f64) -> Rgba<u8> {
        if itr.is_nan() || itr.is_infinite() {
            return self.inf_color;
        }
        let itr = if itr < 0.0 { 0.0 } else { itr };

        let angle = (itr / self.radius) % (2.0 * PI);
        let step = 2.0 * PI / self.palette_size as f64;
        let mut idx = (angle / step).round() as usize;
        if idx >= self.palette_size {
            idx = 0;
        }
        self.palette[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::INFINITY;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn wheel(nodes: Vec<ColorNode>) -> ColorWheel {
        let mut wheel = ColorWheel::new(10.0, 256, BLACK, nodes);
        wheel.generate();
        wheel
    }

    #[test]
    fn single_stop_fills_the_whole_wheel() {
        let wheel = wheel(vec![ColorNode {
            color: WHITE,
            angle: 0.0,
        }]);
        assert_eq!(wheel.color_at(0.0), WHITE);
        assert_eq!(wheel.color_at(17.3), WHITE);
        assert_eq!(wheel.color_at(10.0 * PI), WHITE);
    }

    #[test]
    fn interior_sentinel_gets_the_interior_color() {
        let wheel = wheel(vec![ColorNode {
            color: WHITE,
            angle: 0.0,
        }]);
        assert_eq!(wheel.color_at(INFINITY), BLACK);
        assert_eq!(wheel.color_at(::std::f64::NAN), BLACK);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let wheel = wheel(vec![
            ColorNode {
                color: RED,
                angle: 0.0,
            },
            ColorNode {
                color: BLUE,
                angle: PI,
            },
        ]);
        assert_eq!(wheel.color_at(-3.0), wheel.color_at(0.0));
    }

    #[test]
    fn full_cycles_wrap_to_the_same_color() {
        let wheel = wheel(vec![
            ColorNode {
                color: RED,
                angle: 0.0,
            },
            ColorNode {
                color: BLUE,
                angle: PI,
            },
        ]);
        // one full turn of the wheel is radius * 2π iterations
        let period = 10.0 * 2.0 * PI;
        for &x in &[0.5, 3.0, 11.7] {
            assert_eq!(wheel.color_at(x), wheel.color_at(x + period));
            assert_eq!(wheel.color_at(x), wheel.color_at(x + 3.0 * period));
        }
    }

    #[test]
    fn opposite_stops_interpolate_halfway() {
        let mut wheel = ColorWheel::new(
            1.0,
            4,
            BLACK,
            vec![
                ColorNode {
                    color: RED,
                    angle: 0.0,
                },
                ColorNode {
                    color: BLUE,
                    angle: PI,
                },
            ],
        );
        wheel.generate();
        // slots sit at 0, π/2, π and 3π/2
        assert_eq!(wheel.color_at(0.0), RED);
        assert_eq!(wheel.color_at(PI), BLUE);
        assert_eq!(wheel.color_at(PI / 2.0), Rgba([127, 0, 127, 255]));
    }

    #[test]
    fn a_nan_angle_does_not_abort_generation() {
        let wheel = wheel(vec![
            ColorNode {
                color: RED,
                angle: ::std::f64::NAN,
            },
            ColorNode {
                color: BLUE,
                angle: 1.0,
            },
        ]);
        // the NaN stop's spans are empty; the finite stop still covers
        // the wheel through its wrap segment
        assert_eq!(wheel.color_at(INFINITY), BLACK);
        assert_eq!(wheel.color_at(20.0), BLUE);
    }

    #[test]
    fn coincident_stops_are_not_an_error() {
        let wheel = wheel(vec![
            ColorNode {
                color: RED,
                angle: 1.0,
            },
            ColorNode {
                color: BLUE,
                angle: 1.0,
            },
        ]);
        // all slots still get written by the surviving wrap segment
        assert!(wheel.color_at(2.0)[3] == 255);
    }
}
