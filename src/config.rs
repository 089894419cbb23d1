// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Loading of render files.  A render file is a JSON document
//! describing one render end to end: the fractal family and its
//! parameters, the viewport, and one of the two coloring schemes (a
//! `color_wheel` of stops, or a self-contained banded `palette`).
//! Everything here
//! runs before the first worker thread exists; a file that parses and
//! builds cleanly yields a [`Renderer`] whose per-pixel operations
//! cannot fail.
//!
//! Complex numbers appear in render files as a small textual grammar:
//! whitespace-separated signed terms, each a bare real or an
//! `i`-suffixed imaginary, summed left to right.  `"0.5 - 2 + 12i - 3
//! + 0.1i"` reads as `-4.5 + 12.1i`.
//!
//! [`Renderer`]: ../renderer/struct.Renderer.html

use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;

use failure::Error;
use image::Rgba;
use num::Complex;
use serde_json;

use colormap::ColorMap;
use colorwheel::{ColorNode, ColorWheel};
use errors::FractalError;
use generator::{Formula, Generator, Polynomial};
use palette::Palette;
use renderer::Renderer;
use viewport::Viewport;

/// The `fractal` section of a render file.
#[derive(Debug, Deserialize)]
pub struct FractalSection {
    /// Family tag: `"Mandelbrot"`, `"Julia"` or `"Newton"`.
    #[serde(rename = "type")]
    pub family: String,
    /// Escape threshold on the orbit magnitude.
    pub bailout: f64,
    /// Iteration cap beyond which a point counts as interior.
    pub max_iterations: u32,
    /// Julia's fixed parameter, as a complex literal.  Required for
    /// Julia, ignored elsewhere.
    #[serde(default)]
    pub c: Option<String>,
    /// Newton's polynomial, coefficients in ascending order of degree.
    /// Required for Newton, ignored elsewhere.
    #[serde(default)]
    pub polynomial: Option<Vec<f64>>,
}

/// The `viewport` section of a render file.
#[derive(Debug, Deserialize)]
pub struct ViewportSection {
    /// Centre of the view, as a complex literal.
    pub location: String,
    /// World units per pixel.
    pub scale: f64,
    /// Rotation about the centre, radians.
    #[serde(default)]
    pub rotation: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Supersampling factor; 1 means one sample per pixel.
    #[serde(default = "default_multisample")]
    pub multisample: u32,
}

/// One color entry: an RGBA quad, plus the angle (degrees) at which it
/// sits on the wheel.  The angle is meaningless for `inf_color` and
/// defaults to zero.
#[derive(Debug, Deserialize)]
pub struct ColorSection {
    /// Red channel, 0-255.
    pub red: u8,
    /// Green channel, 0-255.
    pub green: u8,
    /// Blue channel, 0-255.
    pub blue: u8,
    /// Alpha channel, 0-255; defaults to opaque.
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    /// Position on the wheel, degrees.  Converted to radians at load.
    #[serde(default)]
    pub angle: f64,
}

/// The `color_wheel` section of a render file.
#[derive(Debug, Deserialize)]
pub struct ColorWheelSection {
    /// Iteration-to-angle scale factor.
    pub radius: f64,
    /// Number of discrete palette entries to precompute.
    pub resolution: usize,
    /// The color stops, in any order.
    pub colors: Vec<ColorSection>,
    /// The color for interior points.
    pub inf_color: ColorSection,
}

/// The `palette` section of a render file, the banded alternative to
/// a color wheel.
#[derive(Debug, Deserialize)]
pub struct PaletteSection {
    /// Number of color bands.
    pub size: usize,
    /// Subdivisions per band for smoothed iteration values.
    #[serde(default = "default_smooth_scale")]
    pub smooth_scale: usize,
    /// The color for interior points; its angle field is ignored.
    pub inf_color: ColorSection,
}

/// A whole parsed render file.  Exactly one of the two color sections
/// must be present.
#[derive(Debug, Deserialize)]
pub struct RenderFile {
    /// Which fractal to render, and with what parameters.
    pub fractal: FractalSection,
    /// Where on the complex plane to look.
    pub viewport: ViewportSection,
    /// Color via a wheel of interpolated stops.
    #[serde(default)]
    pub color_wheel: Option<ColorWheelSection>,
    /// Color via the banded HSV ramp.
    #[serde(default)]
    pub palette: Option<PaletteSection>,
}

fn default_multisample() -> u32 {
    1
}

fn default_smooth_scale() -> usize {
    1
}

fn default_alpha() -> u8 {
    255
}

fn deg_to_rad(deg: f64) -> f64 {
    PI * deg / 180.0
}

impl ColorSection {
    fn rgba(&self) -> Rgba<u8> {
        Rgba([self.red, self.green, self.blue, self.alpha])
    }
}

/// Parse the complex-number grammar used in render files.  Terms are
/// separated by whitespace; a bare `+` or `-` sets the sign for the
/// terms that follow it, and a trailing `i` marks an imaginary term.
/// Real and imaginary terms may come in any order and are summed left
/// to right.
pub fn parse_complex(s: &str) -> Result<Complex<f64>, FractalError> {
    let mut re = 0.0;
    let mut im = 0.0;
    let mut sign = 1.0;

    for term in s.split_whitespace() {
        match term {
            "+" => sign = 1.0,
            "-" => sign = -1.0,
            _ => {
                let (digits, imaginary) = if term.ends_with('i') {
                    (&term[..term.len() - 1], true)
                } else {
                    (term, false)
                };
                let value: f64 = digits
                    .parse()
                    .map_err(|_| FractalError::MalformedComplex(s.to_string()))?;
                if imaginary {
                    im += sign * value;
                } else {
                    re += sign * value;
                }
            }
        }
    }
    Ok(Complex::new(re, im))
}

impl RenderFile {
    /// Read and parse a render file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RenderFile, Error> {
        let file = File::open(path)?;
        let parsed: RenderFile = serde_json::from_reader(file)?;
        Ok(parsed)
    }

    /// Build the renderer this file describes.  All the configuration
    /// errors of the taxonomy surface here: an unknown family tag, a
    /// malformed complex literal, a family parameter that is missing,
    /// or a structurally valid but unrenderable configuration.
    pub fn build(&self) -> Result<Renderer, Error> {
        let formula = match self.fractal.family.as_str() {
            "Mandelbrot" => Formula::Mandelbrot,
            "Julia" => {
                let c = self.fractal.c.as_ref().ok_or_else(|| {
                    FractalError::MissingParameter("Julia".to_string(), "c".to_string())
                })?;
                Formula::Julia {
                    c: parse_complex(c)?,
                }
            }
            "Newton" => {
                let coeffs = self.fractal.polynomial.as_ref().ok_or_else(|| {
                    FractalError::MissingParameter("Newton".to_string(), "polynomial".to_string())
                })?;
                Formula::newton(Polynomial::new(coeffs.clone()))
            }
            other => return Err(FractalError::UnknownFractal(other.to_string()).into()),
        };

        let generator = Generator {
            bailout: self.fractal.bailout,
            max_iterations: self.fractal.max_iterations,
            formula,
        };

        let viewport = Viewport {
            location: parse_complex(&self.viewport.location)?,
            scale: self.viewport.scale,
            rotation: self.viewport.rotation,
            width: self.viewport.width,
            height: self.viewport.height,
        };

        let color_map = match (&self.color_wheel, &self.palette) {
            (Some(wheel), None) => {
                let nodes = wheel
                    .colors
                    .iter()
                    .map(|color| ColorNode {
                        color: color.rgba(),
                        angle: deg_to_rad(color.angle),
                    })
                    .collect();
                ColorMap::Wheel(ColorWheel::new(
                    wheel.radius,
                    wheel.resolution,
                    wheel.inf_color.rgba(),
                    nodes,
                ))
            }
            (None, Some(palette)) => ColorMap::Banded(Palette::new(
                palette.size,
                palette.smooth_scale,
                palette.inf_color.rgba(),
            )),
            (Some(_), Some(_)) => {
                return Err(FractalError::InvalidConfig(
                    "a render file takes a color_wheel or a palette, not both".to_string(),
                )
                .into())
            }
            (None, None) => {
                return Err(FractalError::InvalidConfig(
                    "a render file needs a color_wheel or a palette section".to_string(),
                )
                .into())
            }
        };

        Ok(Renderer::new(
            viewport,
            generator,
            color_map,
            self.viewport.multisample,
        )?)
    }
}

/// Load a render file and build its renderer in one step.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Renderer, Error> {
    RenderFile::from_path(path)?.build()
}
