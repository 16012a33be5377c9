//! Config command

use crate::app::{ConfigAction, ConfigArgs, OutputFormat};
use anyhow::Result;
use reqlens_core::Config;

pub fn run(args: ConfigArgs, config: &Config, format: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let redacted = config.redacted();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&redacted)?),
                OutputFormat::Cli => print!("{}", serde_yaml::to_string(&redacted)?),
            }
        }
        ConfigAction::Path => println!("{}", Config::default_path().display()),
    }
    Ok(())
}
