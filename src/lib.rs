#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! An escape-time fractal takes a point on the complex plane and
//! repeatedly applies a formula to it, measuring how many steps the
//! resulting orbit takes to exceed a bailout radius.  That (possibly
//! fractional, possibly infinite) step count is what gets painted.
//!
//! The crate is built from four small pieces.  A [`Viewport`] maps
//! output pixel coordinates to points on the complex plane (translate,
//! rotate, scale).  A [`Generator`] holds one of the supported formula
//! families (Mandelbrot, Julia, Newton) and measures the escape time of
//! a single point.  A [`ColorMap`] turns an escape time into a color,
//! either through a [`ColorWheel`] (a circular, wrap-around ramp of
//! interpolated color stops) or a banded [`Palette`] (a fixed HSV ramp
//! folded by a triangle wave).  The [`Renderer`] ties them together:
//! it partitions the
//! image into row bands, hands each band to a worker thread, and
//! reports progress through an atomic counter that the caller may poll
//! at any rate.
//!
//! [`Viewport`]: struct.Viewport.html
//! [`Generator`]: struct.Generator.html
//! [`ColorMap`]: enum.ColorMap.html
//! [`ColorWheel`]: struct.ColorWheel.html
//! [`Palette`]: struct.Palette.html
//! [`Renderer`]: struct.Renderer.html

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod colormap;
pub mod colorwheel;
pub mod config;
pub mod errors;
pub mod generator;
pub mod palette;
pub mod renderer;
pub mod viewport;

pub use colormap::ColorMap;
pub use colorwheel::{ColorNode, ColorWheel};
pub use errors::FractalError;
pub use palette::Palette;
pub use generator::{Formula, Generator, Polynomial};
pub use renderer::{RenderJob, Renderer};
pub use viewport::Viewport;
