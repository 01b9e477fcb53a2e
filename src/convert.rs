use std::fs;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::*;

/// Decode `input`, guessing the format from the file content first and the
/// extension second.
pub fn decode(input: &Path) -> Result<DynamicImage, ConvertError> {
    let reader = ImageReader::open(input)?.with_guessed_format()?;
    debug!("Guessed format of {}: {:?}", input.display(), reader.format());

    let img = reader.decode()?;
    info!("Decoded {}: {}x{} {:?}", input.display(), img.width(), img.height(), img.color());
    Ok(img)
}

/// Write `img` as a PNG with the encoder defaults. A file this call created
/// or truncated is removed again if the encoding fails.
pub fn encode(img: &DynamicImage, output: &Path) -> Result<(), ConvertError> {
    let file = File::create(output)?;
    let mut buf = BufWriter::new(file);

    let written = img.write_to(&mut buf, ImageFormat::Png)
        .map_err(ConvertError::from)
        .and_then(|_| buf.flush().map_err(ConvertError::from));

    if let Err(e) = written {
        drop(buf);
        remove_partial(output);
        return Err(e);
    }
    Ok(())
}

fn remove_partial(output: &Path) {
    match fs::remove_file(output) {
        Ok(()) => debug!("Removed partial output {}", output.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Cannot remove partial output {}: {}", output.display(), e),
    }
}

/// Decode `input` and write it to `output` as PNG. Returns the image
/// dimensions.
pub fn convert(input: &Path, output: &Path) -> Result<(u32, u32), ConvertError> {
    let img = decode(input)?;
    encode(&img, output)?;
    info!("Wrote {}", output.display());
    Ok(img.dimensions())
}

#[cfg(test)]
fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("bmp2png-convert-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[cfg(test)]
fn sample_image() -> DynamicImage {
    DynamicImage::ImageRgb8(image::RgbImage::from_fn(64, 64, |x, y| {
        image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
    }))
}

#[test]
fn test_convert_bmp() {
    let dir = scratch_dir("bmp");
    let input = dir.join("sample.bmp");
    let output = dir.join("sample.png");
    sample_image().save_with_format(&input, ImageFormat::Bmp).unwrap();

    assert_eq!(convert(&input, &output).unwrap(), (64, 64));

    let png = image::open(&output).unwrap();
    assert_eq!(png.to_rgb8(), sample_image().to_rgb8());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_convert_with_misleading_extension() {
    let dir = scratch_dir("extension");
    let input = dir.join("really_a_bmp.png");
    let output = dir.join("out.png");
    sample_image().save_with_format(&input, ImageFormat::Bmp).unwrap();

    convert(&input, &output).unwrap();
    assert_eq!(image::open(&output).unwrap().to_rgb8(), sample_image().to_rgb8());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_convert_in_place() {
    let dir = scratch_dir("in-place");
    let path = dir.join("sample.bmp");
    sample_image().save_with_format(&path, ImageFormat::Bmp).unwrap();

    convert(&path, &path).unwrap();
    let reader = ImageReader::open(&path).unwrap().with_guessed_format().unwrap();
    assert_eq!(reader.format(), Some(ImageFormat::Png));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_input() {
    let dir = scratch_dir("missing");
    let output = dir.join("out.png");

    let err = convert(&dir.join("nope.bmp"), &output).unwrap_err();
    assert!(matches!(err, ConvertError::Conversion(_)));
    assert!(!output.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_corrupt_input() {
    let dir = scratch_dir("corrupt");
    let input = dir.join("garbage.bmp");
    let output = dir.join("out.png");
    fs::write(&input, b"this is not an image at all").unwrap();

    assert!(convert(&input, &output).is_err());
    assert!(!output.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_output_directory() {
    let dir = scratch_dir("no-dir");
    let input = dir.join("sample.bmp");
    let output = dir.join("missing").join("out.png");
    sample_image().save_with_format(&input, ImageFormat::Bmp).unwrap();

    assert!(convert(&input, &output).is_err());
    assert!(!dir.join("missing").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_remove_partial_ignores_missing_file() {
    let dir = scratch_dir("remove");
    remove_partial(&dir.join("never-written.png"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failed_encode_removes_output() {
    let dir = scratch_dir("encode-fails");
    let output = dir.join("out.png");
    fs::write(&output, b"previous content").unwrap();

    // the png encoder has no 32-bit float color type
    let img = DynamicImage::ImageRgb32F(image::Rgb32FImage::new(4, 4));
    let err = encode(&img, &output).unwrap_err();
    assert!(matches!(err, ConvertError::Conversion(_)));
    assert!(!output.exists());
    fs::remove_dir_all(&dir).unwrap();
}
