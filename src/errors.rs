// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types for the configuration boundary.  Everything here is
//! detected before a render starts; the core operations (viewport
//! transform, escape iteration, color lookup) are total functions over
//! their validated inputs and raise no errors of their own.

/// A configuration problem that prevents a render from starting.
#[derive(Debug, Fail, PartialEq)]
pub enum FractalError {
    /// The fractal-family tag in the render file is not one we know.
    #[fail(display = "unknown fractal type: {}", _0)]
    UnknownFractal(String),

    /// A complex-number literal did not parse.
    #[fail(display = "malformed complex literal: {:?}", _0)]
    MalformedComplex(String),

    /// A formula family was selected without a parameter it requires,
    /// like Julia's `c` or Newton's polynomial.
    #[fail(display = "{} fractals require the {:?} parameter", _0, _1)]
    MissingParameter(String, String),

    /// A structurally valid render file describes an unrenderable
    /// configuration (zero-sized image, empty color wheel, and so on).
    #[fail(display = "invalid render configuration: {}", _0)]
    InvalidConfig(String),
}
