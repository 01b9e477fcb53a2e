use std::fmt;
use std::fmt::Display;

#[derive(Debug)]
pub struct UsageError {
    pub program: String,
}

impl Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Usage: {} input.bmp output.png", self.program)
    }
}

impl std::error::Error for UsageError {

}

/// Any failure while decoding, encoding or checking an image. Only the
/// description of the underlying cause is kept.
#[derive(Debug)]
pub struct ConversionError {
    pub str: String,
}

impl ConversionError {
    pub fn new(s: &str) -> Self {
        ConversionError {
            str: String::from(s)
        }
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.str)
    }
}

impl std::error::Error for ConversionError {

}

#[derive(Debug)]
pub enum ConvertError {
    Usage(UsageError),
    Conversion(ConversionError),
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Usage(e) => write!(f, "{}", e),
            ConvertError::Conversion(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConvertError {

}

impl From<UsageError> for ConvertError {
    fn from(e: UsageError) -> Self {
        ConvertError::Usage(e)
    }
}

impl From<ConversionError> for ConvertError {
    fn from(e: ConversionError) -> Self {
        ConvertError::Conversion(e)
    }
}

impl From<image::ImageError> for ConvertError {
    fn from(e: image::ImageError) -> Self {
        ConvertError::Conversion(ConversionError {
            str: e.to_string()
        })
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(e: std::io::Error) -> Self {
        ConvertError::Conversion(ConversionError {
            str: e.to_string()
        })
    }
}

#[test]
fn test_usage_message() {
    let e: ConvertError = UsageError { program: String::from("bmp2png") }.into();
    assert_eq!(e.to_string(), "Usage: bmp2png input.bmp output.png");
}

#[test]
fn test_io_error_description_is_kept() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let e: ConvertError = io.into();
    assert!(matches!(e, ConvertError::Conversion(_)));
    assert_eq!(e.to_string(), "no such file");
}

#[test]
fn test_image_error_description_is_kept() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
    let e: ConvertError = image::ImageError::IoError(io).into();
    assert!(matches!(e, ConvertError::Conversion(_)));
    assert_eq!(e.to_string(), "permission denied");
}
