//! Configuration view and validation commands — `adctl config`.

use anyhow::Result;

use adctl::config::{AdctlToml, Config};

use super::super::ConfigCommands;

pub fn cmd_config(config: &Config, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &config.config_path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("adctl Configuration");
            println!("===================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No adctl.toml found at {}", config_path.display());
                println!("Using default configuration.");
            }
            println!();

            let toml = &config.toml;
            println!("[backend]");
            println!("  url = \"{}\"", toml.backend.url);
            match toml.backend.timeout_secs {
                Some(secs) => println!("  timeout_secs = {}", secs),
                None => println!("  timeout_secs = (none)"),
            }
            println!();
            println!("[bulk]");
            println!("  delay_ms = {}", toml.bulk.delay_ms);
            println!("  duplicate_delay_ms = {}", toml.bulk.duplicate_delay_ms);
            println!("  min_selection = {}", toml.bulk.min_selection);
            println!("  reconcile_on_failure = {}", toml.bulk.reconcile_on_failure);
            println!();
            println!("[logging]");
            match &toml.logging.dir {
                Some(dir) => println!("  dir = \"{}\"", dir.display()),
                None => println!("  dir = (stderr only)"),
            }
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  backend_url = \"{}\"", config.backend_url);
            println!("  data_dir = \"{}\"", config.data_dir.display());
            if let Some(account) = &config.account_override {
                println!("  account = \"{}\"", account);
            }
            println!();

            if !config_path.exists() {
                println!("Run 'adctl config init' to create an adctl.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No adctl.toml found. Using defaults.");
            }

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("adctl.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            AdctlToml::default().save(config_path)?;

            println!("Created adctl.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [backend] url, timeout_secs");
            println!("  - [bulk] delay_ms, duplicate_delay_ms, min_selection, reconcile_on_failure");
            println!("  - [logging] dir");
            println!();
        }
    }

    Ok(())
}
