use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{ConvertError, UsageError};

/// Shown in the usage line when the OS gives no program name.
const DEFAULT_PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, PartialEq)]
pub struct Arguments {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Parse the full argument list, program name included. Anything other than
/// exactly two operands is a usage error.
pub fn parse_args<I: IntoIterator<Item = OsString>>(args: I) -> Result<Arguments, ConvertError> {
    let mut args = args.into_iter();
    let program = args.next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from(DEFAULT_PROGRAM_NAME));
    let operands: Vec<OsString> = args.collect();

    match <[OsString; 2]>::try_from(operands) {
        Ok([input, output]) => Ok(Arguments {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
        }),
        Err(operands) => {
            debug!("Expected 2 arguments, got {}", operands.len());
            Err(UsageError { program }.into())
        }
    }
}

#[cfg(test)]
fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn test_two_operands() {
    let args = parse_args(os_args(&["bmp2png", "in.bmp", "out.png"])).unwrap();
    assert_eq!(args, Arguments {
        input: PathBuf::from("in.bmp"),
        output: PathBuf::from("out.png"),
    });
}

#[test]
fn test_wrong_operand_count() {
    for args in [
        vec!["./convert"],
        vec!["./convert", "in.bmp"],
        vec!["./convert", "in.bmp", "out.png", "extra"],
    ] {
        match parse_args(os_args(&args)) {
            Err(ConvertError::Usage(e)) => {
                assert_eq!(e.to_string(), "Usage: ./convert input.bmp output.png")
            }
            other => panic!("expected usage error, got {:?}", other),
        }
    }
}

#[test]
fn test_missing_program_name() {
    let err = parse_args(Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Usage: bmp2png input.bmp output.png");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_path() {
    use std::os::unix::ffi::OsStringExt;

    let raw = OsString::from_vec(vec![b'i', 0xff, b'.', b'b', b'm', b'p']);
    let args = parse_args(vec![OsString::from("bmp2png"), raw.clone(), OsString::from("o.png")]).unwrap();
    assert_eq!(args.input.into_os_string(), raw);
}
