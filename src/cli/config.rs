//! `pingmon config init`

use crate::cli::ConfigInitArgs;
use crate::config::ConfigError;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../pingmon.example.toml");

/// Write the annotated example configuration to `args.output`.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    write_example_config(&args.output, args.force)?;

    println!("✓ Configuration file created: {}", args.output.display());
    println!("  Set [endpoint] http_url to your ping service, then run `pingmon watch`.");

    Ok(())
}

/// Without `force` the file is created exclusively, so an existing file is
/// never truncated.
fn write_example_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => ConfigError::validation(
            "output",
            format!("{} already exists, use --force to overwrite", path.display()),
        ),
        _ => ConfigError::Io(e),
    })?;
    file.write_all(EXAMPLE_CONFIG.as_bytes())?;
    Ok(())
}
