// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the ColorMap enum, the seam between the renderer and the
//! two color-mapping strategies.  The render loop only ever needs two
//! things from a coloring scheme: build your lookup table once, then
//! answer `color_at` for any escape time; this enum is that surface,
//! dispatched over the wheel and the banded palette.

use image::Rgba;

use colorwheel::ColorWheel;
use palette::Palette;

/// Which color-mapping strategy a render uses: the circular
/// interpolated [`ColorWheel`] built from user-supplied stops, or the
/// self-contained banded [`Palette`].
///
/// [`ColorWheel`]: ../colorwheel/struct.ColorWheel.html
/// [`Palette`]: ../palette/struct.Palette.html
#[derive(Clone, Debug)]
pub enum ColorMap {
    /// The circular wheel of interpolated color stops.
    Wheel(ColorWheel),
    /// The banded HSV ramp.
    Banded(Palette),
}

impl ColorMap {
    /// Build the underlying lookup table.  Runs once, single-threaded,
    /// before any worker exists; after that the map is immutable and
    /// `color_at` is safe from any thread.
    pub fn generate(&mut self) {
        match *self {
            ColorMap::Wheel(ref mut wheel) => wheel.generate(),
            ColorMap::Banded(ref mut palette) => palette.generate(),
        }
    }

    /// Look up the color for an escape time.
    pub fn color_at(&self, itr: f64) -> Rgba<u8> {
        match *self {
            ColorMap::Wheel(ref wheel) => wheel.color_at(itr),
            ColorMap::Banded(ref palette) => palette.color_at(itr),
        }
    }
}
