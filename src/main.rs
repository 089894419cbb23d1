// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate escapetime;
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use escapetime::config;
use escapetime::FractalError;
use failure::Error;
use image::jpeg::JPEGEncoder;
use image::png::PNGEncoder;
use image::{ColorType, RgbaImage};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const RENDER_FILE: &str = "render_file";
const OUTPUT: &str = "output";
const THREADS: &str = "threads";
const QUALITY: &str = "image-quality";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("escapetime")
        .version("0.1.0")
        .about("Escape-time fractal renderer")
        .arg(
            Arg::with_name(RENDER_FILE)
                .required(true)
                .takes_value(true)
                .help("JSON render file describing the fractal, viewport and colors"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output image filename; defaults to the render file with a .png extension"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("0")
                .validator(move |s| {
                    validate_range(
                        &s,
                        0,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 0 and {}", max_threads),
                    )
                })
                .help("Number of rendering threads; 0 means one per CPU"),
        )
        .arg(
            Arg::with_name(QUALITY)
                .required(false)
                .long(QUALITY)
                .short("q")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100,
                        "Could not parse image quality",
                        "Image quality must be between 1 and 100",
                    )
                })
                .help("Image quality, where applicable (JPEG output)"),
        )
        .get_matches()
}

fn write_image(filename: &str, img: &RgbaImage, quality: u8) -> Result<(), Error> {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    let mut output = File::create(filename)?;
    match extension.as_str() {
        "png" => {
            PNGEncoder::new(output).encode(img, img.width(), img.height(), ColorType::RGBA(8))?
        }
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel; flatten to RGB first
            let rgb: Vec<u8> = img.pixels().flat_map(|p| vec![p[0], p[1], p[2]]).collect();
            JPEGEncoder::new_with_quality(&mut output, quality).encode(
                &rgb,
                img.width(),
                img.height(),
                ColorType::RGB(8),
            )?
        }
        other => {
            return Err(
                FractalError::InvalidConfig(format!("unsupported image format: {}", other)).into(),
            )
        }
    }
    Ok(())
}

fn run() -> Result<(), Error> {
    let matches = args();
    let render_path = matches.value_of(RENDER_FILE).unwrap();
    let output = match matches.value_of(OUTPUT) {
        Some(name) => name.to_string(),
        None => Path::new(render_path)
            .with_extension("png")
            .to_string_lossy()
            .into_owned(),
    };
    let mut threads = usize::from_str(matches.value_of(THREADS).unwrap())?;
    if threads == 0 {
        threads = num_cpus::get();
    }
    let quality = u8::from_str(matches.value_of(QUALITY).unwrap())?;

    let renderer = config::load(render_path)?;
    info!("rendering {} on {} threads", render_path, threads);

    let started = Instant::now();
    let job = renderer.render(threads);
    loop {
        let (fraction, finished) = job.progress();
        print!("\r{:5.1}%", 100.0 * fraction);
        io::stdout().flush()?;
        if finished {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
    let img = job
        .wait()
        .expect("render job already surrendered its image");
    println!("\rfinished rendering in {:.1?}", started.elapsed());

    write_image(&output, &img, quality)?;
    info!("wrote {}", output);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
