#[macro_use]
extern crate log;

mod cli;
mod convert;
mod error;

use std::process;

use crate::error::ConvertError;

fn run() -> Result<String, ConvertError> {
    let args = cli::parse_args(std::env::args_os())?;
    let (width, height) = convert::convert(&args.input, &args.output)?;
    debug!("Converted a {}x{} image", width, height);

    Ok(format!("Converted {} to {}", args.input.display(), args.output.display()))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(msg) => println!("{}", msg),
        Err(ConvertError::Usage(e)) => {
            println!("{}", e);
            process::exit(1);
        }
        Err(ConvertError::Conversion(e)) => {
            println!("Error: {}", e);
            process::exit(1);
        }
    }
}
