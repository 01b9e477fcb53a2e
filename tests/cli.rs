use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{DynamicImage, ImageFormat};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bmp2png-cli-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn bmp2png(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bmp2png"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn write_sample_bmp(path: &Path) -> DynamicImage {
    let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(64, 64, |x, y| {
        image::Rgb([(x * 3) as u8, 255 - (y * 2) as u8, (x ^ y) as u8])
    }));
    img.save_with_format(path, ImageFormat::Bmp).unwrap();
    img
}

#[test]
fn test_usage() {
    let dir = scratch_dir("usage");
    for args in [vec![], vec!["a.bmp"], vec!["a.bmp", "b.png", "c.png"]] {
        let output = bmp2png(&dir, &args);
        assert_eq!(output.status.code(), Some(1));

        let out = stdout(&output);
        assert!(out.starts_with("Usage: "), "{}", out);
        assert!(out.ends_with(" input.bmp output.png\n"), "{}", out);
        assert_eq!(out.lines().count(), 1);
    }
    assert!(!dir.join("b.png").exists());
    assert!(!dir.join("c.png").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_convert_sample() {
    let dir = scratch_dir("sample");
    let img = write_sample_bmp(&dir.join("sample.bmp"));

    let output = bmp2png(&dir, &["sample.bmp", "sample.png"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "Converted sample.bmp to sample.png\n");

    let png = image::open(dir.join("sample.png")).unwrap();
    assert_eq!(png.to_rgb8(), img.to_rgb8());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_convert_absolute_paths() {
    let dir = scratch_dir("absolute");
    let input = dir.join("in.bmp");
    let target = dir.join("out.png");
    write_sample_bmp(&input);

    let output = bmp2png(&dir, &[input.to_str().unwrap(), target.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), format!("Converted {} to {}\n", input.display(), target.display()));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_input() {
    let dir = scratch_dir("missing");

    let output = bmp2png(&dir, &["nope.bmp", "out.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Error: "));
    assert!(!dir.join("out.png").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unwritable_output() {
    let dir = scratch_dir("unwritable");
    write_sample_bmp(&dir.join("sample.bmp"));

    let output = bmp2png(&dir, &["sample.bmp", "no/such/dir/out.png"]);
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.starts_with("Error: "));
    assert!(out.len() > "Error: \n".len());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_corrupt_input() {
    let dir = scratch_dir("corrupt");
    fs::write(dir.join("broken.bmp"), b"BM but nothing else that makes sense").unwrap();

    let output = bmp2png(&dir, &["broken.bmp", "out.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Error: "));
    assert!(!dir.join("out.png").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_repeated_conversion() {
    let dir = scratch_dir("repeat");
    write_sample_bmp(&dir.join("sample.bmp"));

    assert!(bmp2png(&dir, &["sample.bmp", "sample.png"]).status.success());
    let first = image::open(dir.join("sample.png")).unwrap();

    assert!(bmp2png(&dir, &["sample.bmp", "sample.png"]).status.success());
    let second = image::open(dir.join("sample.png")).unwrap();

    assert_eq!(first.to_rgba8(), second.to_rgba8());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_logging_stays_off_stdout() {
    let dir = scratch_dir("logging");
    write_sample_bmp(&dir.join("sample.bmp"));

    let output = Command::new(env!("CARGO_BIN_EXE_bmp2png"))
        .current_dir(&dir)
        .env("RUST_LOG", "debug")
        .args(["sample.bmp", "sample.png"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Converted sample.bmp to sample.png\n");
    assert!(!output.stderr.is_empty());
    fs::remove_dir_all(&dir).unwrap();
}
