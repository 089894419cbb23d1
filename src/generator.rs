// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Generator struct, which measures the escape time of a
//! single point on the complex plane, and the Formula enum describing
//! the supported recurrence families.  Each call to
//! [`Generator::escape_at`] builds its own [`Orbit`] state, so a
//! Generator is stateless between calls and may be shared freely
//! across worker threads.
//!
//! [`Generator::escape_at`]: struct.Generator.html#method.escape_at
//! [`Orbit`]: struct.Orbit.html

use num::Complex;
use std::f64::consts::LN_2;

/// A polynomial with real coefficients, stored in ascending order of
/// degree (`coeffs[k]` multiplies `z^k`).  Used by the Newton formula,
/// which needs both the polynomial and its derivative.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Constructor.  Takes coefficients in ascending order of degree,
    /// so `z^3 - 1` is `Polynomial::new(vec![-1.0, 0.0, 0.0, 1.0])`.
    pub fn new(coeffs: Vec<f64>) -> Polynomial {
        Polynomial { coeffs }
    }

    /// The degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Evaluate the polynomial at a complex point, by Horner's rule.
    pub fn eval(&self, z: Complex<f64>) -> Complex<f64> {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex::new(0.0, 0.0), |acc, &c| acc * z + c)
    }

    /// The first derivative, as a new polynomial.
    pub fn derivative(&self) -> Polynomial {
        Polynomial {
            coeffs: self
                .coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &c)| (k as f64) * c)
                .collect(),
        }
    }
}

/// The recurrence families the renderer knows how to iterate.  The
/// family is selected once, at configuration time; per-pixel
/// evaluation just matches on the variant rather than re-dispatching
/// through a name lookup.
#[derive(Clone, Debug)]
pub enum Formula {
    /// z₀ = 0, c = the input point, z ← z² + c.  The smoothed
    /// iteration count uses the classic `n + 1 − ln(ln|z|)/ln 2` term,
    /// which needs the bailout to be greater than 1 (2 or more is the
    /// usual choice) so the inner logarithm stays positive.
    Mandelbrot,
    /// z₀ = the input point, c fixed, z ← z² + c.
    Julia {
        /// The fixed parameter of the Julia set.
        c: Complex<f64>,
    },
    /// Newton's method on a polynomial, z ← z − P(z)/P′(z).  The
    /// escape probe is 1/P(z) rather than the orbit itself: the orbit
    /// converges toward a root, so the probe blows up as P(z)
    /// approaches zero.  The bailout should be very large (1e6 or so),
    /// since it bounds the reciprocal rather than an escape radius.
    Newton {
        /// The polynomial P.
        poly: Polynomial,
        /// P′, kept alongside P so it is not recomputed per step.
        deriv: Polynomial,
    },
}

impl Formula {
    /// Build the Newton variant from a polynomial, deriving P′ from
    /// its coefficients.
    pub fn newton(poly: Polynomial) -> Formula {
        let deriv = poly.derivative();
        Formula::Newton { poly, deriv }
    }

    /// Start a fresh orbit of this formula at the given point.
    pub fn orbit(&self, point: Complex<f64>) -> Orbit {
        let (z, c) = match *self {
            Formula::Mandelbrot => (Complex::new(0.0, 0.0), point),
            Formula::Julia { c } => (point, c),
            Formula::Newton { .. } => (point, Complex::new(0.0, 0.0)),
        };
        Orbit {
            formula: self,
            z,
            c,
        }
    }

    // Post-process an accumulated iteration weight once the orbit has
    // escaped.  `z` is the final escape probe.
    fn normalize(&self, n: f64, z: Complex<f64>) -> f64 {
        match *self {
            Formula::Mandelbrot => n + 1.0 - z.norm().ln().ln() / LN_2,
            Formula::Julia { .. } => n + (-z.norm()).exp(),
            Formula::Newton { .. } => n,
        }
    }
}

/// The mutable state of one orbit: the current value, the fixed
/// parameter, and the formula that advances it.  Constructed fresh for
/// every `escape_at` call, so no two evaluations ever share state.
pub struct Orbit<'a> {
    formula: &'a Formula,
    z: Complex<f64>,
    c: Complex<f64>,
}

impl<'a> Orbit<'a> {
    /// Advance the orbit one step.  Returns the escape probe (the
    /// value whose magnitude is tested against the bailout) and the
    /// weight this step contributes to the iteration count.
    pub fn advance(&mut self) -> (Complex<f64>, f64) {
        match *self.formula {
            Formula::Mandelbrot => {
                self.z = self.z * self.z + self.c;
                (self.z, 1.0)
            }
            Formula::Julia { .. } => {
                let prev = self.z;
                self.z = self.z * self.z + self.c;
                (self.z, (-prev.norm()).exp())
            }
            Formula::Newton { ref poly, ref deriv } => {
                self.z = self.z - poly.eval(self.z) / deriv.eval(self.z);
                (poly.eval(self.z).inv(), 1.0)
            }
        }
    }
}

/// Measures escape times.  Holds the formula family plus the bailout
/// radius and the iteration cap; carries no mutable state of its own.
#[derive(Clone, Debug)]
pub struct Generator {
    /// The orbit magnitude beyond which a point counts as escaped.
    pub bailout: f64,
    /// The iteration cap; orbits still bounded at this depth are
    /// treated as interior.
    pub max_iterations: u32,
    /// The recurrence family being iterated.
    pub formula: Formula,
}

impl Generator {
    /// A Mandelbrot set generator.
    pub fn mandelbrot(bailout: f64, max_iterations: u32) -> Generator {
        Generator {
            bailout,
            max_iterations,
            formula: Formula::Mandelbrot,
        }
    }

    /// A Julia set generator for f(z) = z² + c.
    pub fn julia(c: Complex<f64>, bailout: f64, max_iterations: u32) -> Generator {
        Generator {
            bailout,
            max_iterations,
            formula: Formula::Julia { c },
        }
    }

    /// A Newton fractal generator for the given polynomial.
    pub fn newton(poly: Polynomial, bailout: f64, max_iterations: u32) -> Generator {
        Generator {
            bailout,
            max_iterations,
            formula: Formula::newton(poly),
        }
    }

    /// The number of iterations until the orbit of `point` escapes the
    /// bailout radius, smoothed by the formula's normalisation, or
    /// positive infinity if the orbit is still bounded after
    /// `max_iterations` steps.  Infinity is the interior sentinel: a
    /// capped count is never returned as a finite number, so it cannot
    /// alias with a real escape time.  Deterministic and side-effect
    /// free; identical inputs give bit-identical results.
    pub fn escape_at(&self, point: Complex<f64>) -> f64 {
        let mut orbit = self.formula.orbit(point);
        let mut probe = Complex::new(0.0, 0.0);
        let mut weight = 0.0;
        let mut itr = 0;

        while probe.norm() < self.bailout {
            if itr == self.max_iterations {
                return ::std::f64::INFINITY;
            }
            let (z, w) = orbit.advance();
            probe = z;
            weight += w;
            itr += 1;
        }
        self.formula.normalize(weight, probe)
    }
}
