// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const SMALL_MANDELBROT: &str = r#"{
    "fractal": {"type": "Mandelbrot", "bailout": 2.0, "max_iterations": 40},
    "viewport": {"location": "-0.5", "scale": 0.1875, "width": 16, "height": 16},
    "color_wheel": {
        "radius": 10.0,
        "resolution": 256,
        "colors": [{"red": 255, "green": 255, "blue": 255, "angle": 0.0}],
        "inf_color": {"red": 0, "green": 0, "blue": 0}
    }
}"#;

#[test]
fn refuses_to_run_without_a_render_file() {
    Command::cargo_bin("escapetime")
        .unwrap()
        .assert()
        .failure();
}

#[test]
fn reports_unknown_fractal_types_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let render = dir.path().join("spiral.json");
    fs::write(
        &render,
        SMALL_MANDELBROT.replace("Mandelbrot", "Spirograph"),
    )
    .unwrap();

    Command::cargo_bin("escapetime")
        .unwrap()
        .arg(&render)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown fractal type: Spirograph"));
}

#[test]
fn renders_a_small_png_next_to_the_render_file() {
    let dir = tempfile::tempdir().unwrap();
    let render = dir.path().join("mandel.json");
    fs::write(&render, SMALL_MANDELBROT).unwrap();

    Command::cargo_bin("escapetime")
        .unwrap()
        .arg(&render)
        .args(&["-t", "1"])
        .assert()
        .success();

    let output = dir.path().join("mandel.png");
    assert!(output.exists());
    // PNG magic bytes
    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn renders_from_a_banded_palette_render_file() {
    let dir = tempfile::tempdir().unwrap();
    let render = dir.path().join("banded.json");
    fs::write(
        &render,
        r#"{
            "fractal": {"type": "Mandelbrot", "bailout": 2.0, "max_iterations": 40},
            "viewport": {"location": "-0.5", "scale": 0.1875, "width": 16, "height": 16},
            "palette": {"size": 16, "smooth_scale": 4,
                        "inf_color": {"red": 0, "green": 0, "blue": 0}}
        }"#,
    )
    .unwrap();

    Command::cargo_bin("escapetime")
        .unwrap()
        .arg(&render)
        .args(&["-t", "1"])
        .assert()
        .success();
    assert!(dir.path().join("banded.png").exists());
}

#[test]
fn rejects_an_unsupported_output_format() {
    let dir = tempfile::tempdir().unwrap();
    let render = dir.path().join("mandel.json");
    fs::write(&render, SMALL_MANDELBROT).unwrap();

    Command::cargo_bin("escapetime")
        .unwrap()
        .arg(&render)
        .args(&["-o", dir.path().join("mandel.gif").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported image format"));
}
