use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, FieldArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::PartialFieldConfig;
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Build {
            file,
            fields,
            sort_by,
            strict,
        } => {
            let mut settings = load_settings(cli, fields)?;
            if sort_by.is_some() {
                settings.sort_by = sort_by.clone();
            }
            settings.strict |= *strict;
            _build(cli, settings, file)
        }
        Commands::Flatten { file, fields } => _flatten(cli, load_settings(cli, fields)?, file),
        Commands::Expand {
            file,
            depth,
            fields,
        } => _expand(load_settings(cli, fields)?, file, *depth),
        Commands::Sort { file, by, fields } => _sort(cli, load_settings(cli, fields)?, file, by),
        Commands::Tree {
            file,
            label,
            fields,
        } => {
            let mut settings = load_settings(cli, fields)?;
            if let Some(label) = label {
                settings.label = label.clone();
            }
            _tree(settings, file)
        }
        Commands::Validate { file, fields } => _validate(load_settings(cli, fields)?, file),
        Commands::Config { command } => _config(cli, command),
        Commands::Completion { shell } => {
            _completion(*shell);
            Ok(())
        }
    }
}

/// Directory whose `.listtree.toml` applies: `-C` or the working directory.
fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|source| CliError::Io {
            context: "determine working directory".into(),
            source,
        }),
    }
}

/// Layered settings with command-line field overrides on top.
fn load_settings(cli: &Cli, fields: &FieldArgs) -> CliResult<Settings> {
    let dir = local_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    let overrides = PartialFieldConfig {
        id: fields.id.clone(),
        pid: fields.pid.clone(),
        children: fields.children.clone(),
    };
    if !overrides.is_empty() {
        settings.fields = settings.fields.with_overrides(&overrides);
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

fn print_json(cli: &Cli, value: &[Value]) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if cli.compact {
        serde_json::to_writer(&mut out, value)
    } else {
        serde_json::to_writer_pretty(&mut out, value)
    };
    written
        .map_err(io::Error::from)
        .and_then(|()| writeln!(out))
        .map_err(|source| CliError::Io {
            context: "write output".into(),
            source,
        })
}

#[instrument(level = "debug", skip(cli, settings))]
fn _build(cli: &Cli, settings: Settings, file: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let svc = container.hierarchy();
    let records = svc.load(file)?;
    let forest = svc.build(&records)?;
    print_json(cli, &forest)
}

#[instrument(level = "debug", skip(cli, settings))]
fn _flatten(cli: &Cli, settings: Settings, file: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let svc = container.hierarchy();
    let forest = svc.load(file)?;
    print_json(cli, &svc.flatten(&forest))
}

#[instrument(level = "debug", skip(settings))]
fn _expand(settings: Settings, file: &Path, depth: Option<i64>) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let svc = container.hierarchy();
    let forest = svc.load(file)?;
    for key in svc.expanded_keys(&forest, depth) {
        output::info(&key);
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli, settings))]
fn _sort(cli: &Cli, settings: Settings, file: &Path, by: &str) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let svc = container.hierarchy();
    let forest = svc.load(file)?;
    print_json(cli, &svc.sort(forest, by))
}

#[instrument(level = "debug", skip(settings))]
fn _tree(settings: Settings, file: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let svc = container.hierarchy();
    let records = svc.load(file)?;
    print!("{}", svc.render(&records));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _validate(settings: Settings, file: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let svc = container.hierarchy();
    let records = svc.load(file)?;
    let report = svc.validate(&records);

    if report.is_clean() {
        output::success(&format!("{} records, no problems found", records.len()));
        return Ok(());
    }
    for diagnostic in report.warnings() {
        output::warning(diagnostic);
    }
    let fatal: Vec<_> = report.fatal().collect();
    for diagnostic in &fatal {
        output::failure(diagnostic);
    }
    if fatal.is_empty() {
        Ok(())
    } else {
        Err(CliError::InvalidData(format!(
            "{} fatal problem(s) in {}",
            fatal.len(),
            file.display()
        )))
    }
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    let dir = local_dir(cli)?;
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(&dir))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&dir)
            };
            let container = ServiceContainer::new(Settings::default());
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                container
                    .fs
                    .create_dir_all(parent)
                    .map_err(|source| CliError::Io {
                        context: format!("create {}", parent.display()),
                        source,
                    })?;
            }
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|source| CliError::Io {
                    context: format!("write {}", path.display()),
                    source,
                })?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => print_config_path("global", &path),
                None => output::warning("global config directory unavailable"),
            }
            print_config_path("local", &local_config_path(&dir));
            Ok(())
        }
    }
}

fn print_config_path(label: &str, path: &Path) {
    let state = if path.exists() { "" } else { " (not found)" };
    output::info(&format!("  {label}: {}{state}", path.display()));
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
