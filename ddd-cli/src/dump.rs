use anyhow::{Context, Result};
use std::path::Path;
use tacho_ir::UnmarshalOptions;

use crate::{DumpFormat, parse_input, read_input};

pub fn run_dump(input: &Path, format: DumpFormat, output: Option<&Path>, options: &UnmarshalOptions) -> Result<()> {
    let data = read_input(input)?;
    let file = parse_input(input, &data, options)?;

    let text = match format {
        DumpFormat::Json => serde_json::to_string_pretty(&file).context("serialising JSON")?,
        DumpFormat::Yaml => serde_yaml::to_string(&file).context("serialising YAML")?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
            log::info!("Written: {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
