use std::{env, fs, io, path::PathBuf};

use brine_equal_compiler::{error::KiwiError, generate_rust, GeneratorConfig};

const SCHEMA: &str = "schema/example.kiwi";

fn main() -> Result<(), KiwiError> {
    println!("cargo:rerun-if-changed={}", SCHEMA);

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))?;

    let text = fs::read_to_string(SCHEMA)?;
    let code = generate_rust(&text, &GeneratorConfig::default())?;
    fs::write(out_dir.join("example.rs"), code)?;
    Ok(())
}
