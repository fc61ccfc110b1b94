use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, info, success, warning};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: run_migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            info(format!("Current configuration ({}):\n", path.display()));
            let yaml = serde_yaml::to_string(cfg).map_err(|_| AppError::ConfigSave)?;
            println!("{yaml}");
        }

        if *check {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; defaults are in use.",
                    path.display()
                ));
            } else {
                let missing = migrate::missing_keys(&path)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!("Missing fields: {}", missing.join(", ")));
                    info("Run `attendlog config --migrate` to add them with default values.");
                }
            }
        }

        if *run_migrate {
            migrate::migrate_file(&path)?;
        }

        if *edit_config {
            edit(&path, editor.clone());
        }
    }

    Ok(())
}

fn edit(path: &std::path::Path, requested: Option<String>) {
    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor = requested.unwrap_or_else(|| default_editor.clone());

    match Command::new(&editor).arg(path).status() {
        Ok(s) if s.success() => {
            success(format!("Configuration file edited using '{editor}'"));
        }
        _ => {
            warning(format!(
                "Editor '{editor}' not available, falling back to '{default_editor}'"
            ));
            match Command::new(&default_editor).arg(path).status() {
                Ok(s) if s.success() => {
                    success(format!(
                        "Configuration file edited using fallback '{default_editor}'"
                    ));
                }
                _ => error(format!(
                    "Failed to edit configuration file using fallback '{default_editor}'"
                )),
            }
        }
    }
}
