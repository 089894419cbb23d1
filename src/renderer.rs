// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Renderer struct, the scheduler that turns a viewport,
//! a generator and a color map into a finished image.  The output is
//! partitioned into contiguous row bands, one per worker thread; each
//! band is a disjoint mutable slice of the shared pixel buffer, so
//! every pixel is written exactly once and no locking is needed on the
//! buffer at all.  The only value all workers mutate is the progress
//! counter, an atomic increment per finished pixel that the caller
//! polls through [`RenderJob`]; a slow observer can never stall the
//! compute path.
//!
//! [`RenderJob`]: struct.RenderJob.html

use std::cmp;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam;
use image::RgbaImage;
use itertools::iproduct;

use colormap::ColorMap;
use errors::FractalError;
use generator::{Formula, Generator};
use viewport::Viewport;

/// Renders escape-time fractals onto an RGBA pixel buffer.
/// Construction validates the whole configuration and generates the
/// color map, so by the time a `Renderer` exists every per-pixel
/// operation is a total function and rendering itself cannot fail.
#[derive(Debug)]
pub struct Renderer {
    viewport: Viewport,
    generator: Generator,
    color_map: Arc<ColorMap>,
    multisample: u32,
}

/// A render in flight.  `Renderer::render` returns one of these
/// immediately; the image must not be read until the job reports
/// completion.  There is no cancellation: once started, a render runs
/// to the end.
pub struct RenderJob {
    done: Arc<AtomicUsize>,
    total: usize,
    finished: Arc<AtomicBool>,
    image: Arc<Mutex<Option<RgbaImage>>>,
    coordinator: thread::JoinHandle<()>,
}

impl RenderJob {
    /// The fraction of pixels completed so far, and whether the render
    /// has finished.  Safe to call repeatedly, at any rate, while the
    /// workers run; the fraction never decreases between calls and is
    /// exactly 1.0 once the done flag is up.
    pub fn progress(&self) -> (f64, bool) {
        // the flag is read before the counter: an acquire load that
        // sees true is ordered after the coordinator's release store,
        // which in turn follows every worker increment, so the counter
        // read below cannot lag the final count
        let finished = self.finished.load(Ordering::Acquire);
        let done = self.done.load(Ordering::Relaxed);
        (done as f64 / self.total as f64, finished)
    }

    /// Take the finished image if the render is complete, or None if
    /// the workers are still going or the image has already been
    /// handed out.
    pub fn try_image(&self) -> Option<RgbaImage> {
        if !self.finished.load(Ordering::Acquire) {
            return None;
        }
        self.image.lock().unwrap().take()
    }

    /// Block until the render finishes and hand back the image.  The
    /// image leaves the job exactly once: if an earlier `try_image`
    /// already claimed it, this returns None.
    pub fn wait(self) -> Option<RgbaImage> {
        self.coordinator.join().unwrap();
        let mut slot = self.image.lock().unwrap();
        slot.take()
    }
}

// Render one contiguous band of rows into its slice of the pixel
// buffer, bumping the shared counter once per finished pixel.
fn render_band(
    band: &mut [u8],
    first_row: usize,
    viewport: &Viewport,
    generator: &Generator,
    map: &ColorMap,
    multisample: u32,
    done: &AtomicUsize,
) {
    let width = viewport.width as usize;
    let stride = width * 4;
    let rows = band.len() / stride;
    let subdiv = f64::from(multisample);
    let samples = multisample * multisample;

    for row in 0..rows {
        let y = (first_row + row) as f64;
        for x in 0..width {
            let mut sums = [0u32; 4];
            for (sy, sx) in iproduct!(0..multisample, 0..multisample) {
                let px = x as f64 + f64::from(sx) / subdiv;
                let py = y + f64::from(sy) / subdiv;
                let itr = generator.escape_at(viewport.point_at(px, py));
                let color = map.color_at(itr);
                for ch in 0..4 {
                    sums[ch] += u32::from(color[ch]);
                }
            }
            let offset = row * stride + x * 4;
            for ch in 0..4 {
                // truncating average over the subsample grid
                band[offset + ch] = (sums[ch] / samples) as u8;
            }
            done.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Renderer {
    /// Constructor.  Rejects every configuration the render loop is
    /// not total over, and generates the color map's lookup table so
    /// that it is immutable before the first worker could possibly
    /// look at it.
    pub fn new(
        viewport: Viewport,
        generator: Generator,
        mut color_map: ColorMap,
        multisample: u32,
    ) -> Result<Renderer, FractalError> {
        if viewport.width == 0 || viewport.height == 0 {
            return Err(FractalError::InvalidConfig(
                "viewport dimensions must be non-zero".to_string(),
            ));
        }
        if multisample == 0 {
            return Err(FractalError::InvalidConfig(
                "multisampling factor must be at least 1".to_string(),
            ));
        }
        if generator.max_iterations == 0 {
            return Err(FractalError::InvalidConfig(
                "maximum iteration count must be at least 1".to_string(),
            ));
        }
        if generator.bailout <= 0.0 {
            return Err(FractalError::InvalidConfig(
                "bailout radius must be positive".to_string(),
            ));
        }
        // the smoothing term takes ln(ln|z|) with |z| at least the
        // bailout, so the bailout must exceed 1 for it to be defined
        if let Formula::Mandelbrot = generator.formula {
            if generator.bailout <= 1.0 {
                return Err(FractalError::InvalidConfig(
                    "Mandelbrot bailout must be greater than 1 (2 is conventional)".to_string(),
                ));
            }
        }
        if let Formula::Newton { ref poly, .. } = generator.formula {
            if poly.degree() < 1 {
                return Err(FractalError::InvalidConfig(
                    "Newton fractals need a polynomial of degree at least 1".to_string(),
                ));
            }
        }
        match color_map {
            ColorMap::Wheel(ref wheel) => {
                if wheel.palette_size == 0 {
                    return Err(FractalError::InvalidConfig(
                        "color wheel resolution must be at least 1".to_string(),
                    ));
                }
                if wheel.nodes().is_empty() {
                    return Err(FractalError::InvalidConfig(
                        "color wheel needs at least one color stop".to_string(),
                    ));
                }
                if wheel.nodes().iter().any(|node| !node.angle.is_finite()) {
                    return Err(FractalError::InvalidConfig(
                        "color stop angles must be finite".to_string(),
                    ));
                }
            }
            ColorMap::Banded(ref palette) => {
                if palette.length == 0 || palette.smooth_scale == 0 {
                    return Err(FractalError::InvalidConfig(
                        "palette size and smoothing scale must be at least 1".to_string(),
                    ));
                }
            }
        }

        color_map.generate();
        Ok(Renderer {
            viewport,
            generator,
            color_map: Arc::new(color_map),
            multisample,
        })
    }

    /// Begin rendering on `threads` worker threads and return at once;
    /// poll the returned job for completion.  The image is split into
    /// row bands sized as evenly as possible, with any remainder rows
    /// folded into the last band.  A thread count of zero is treated
    /// as one, and counts beyond the row count are clamped so no
    /// worker sits on an empty band.
    pub fn render(&self, threads: usize) -> RenderJob {
        let viewport = self.viewport;
        let generator = self.generator.clone();
        let map = self.color_map.clone();
        let multisample = self.multisample;

        let width = viewport.width as usize;
        let height = viewport.height as usize;
        let total = width * height;
        let workers = cmp::min(cmp::max(threads, 1), height);

        let done = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));
        let image = Arc::new(Mutex::new(None));

        let worker_done = done.clone();
        let coordinator_finished = finished.clone();
        let coordinator_image = image.clone();

        debug!(
            "partitioning {}x{} into {} row bands for {} requested threads",
            width, height, workers, threads
        );

        let coordinator = thread::spawn(move || {
            let stride = width * 4;
            let base = height / workers;
            let mut buffer = vec![0u8; total * 4];

            crossbeam::scope(|spawner| {
                let generator = &generator;
                let map = &map;
                // the first workers - 1 bands hold exactly `base` rows;
                // the last band picks up the remainder
                let (head, tail) = buffer.split_at_mut((workers - 1) * base * stride);
                let mut bands: Vec<&mut [u8]> = head.chunks_mut(base * stride).collect();
                bands.push(tail);

                for (index, band) in bands.into_iter().enumerate() {
                    let done = worker_done.clone();
                    spawner.spawn(move |_| {
                        render_band(
                            band,
                            index * base,
                            &viewport,
                            generator,
                            map,
                            multisample,
                            &done,
                        );
                    });
                }
            })
            .unwrap();

            let image = RgbaImage::from_raw(viewport.width, viewport.height, buffer).unwrap();
            *coordinator_image.lock().unwrap() = Some(image);
            coordinator_finished.store(true, Ordering::Release);
        });

        RenderJob {
            done,
            total,
            finished,
            image,
            coordinator,
        }
    }
}
