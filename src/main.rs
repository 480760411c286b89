#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use uma_presets::config::{schema, themes, MergeReport};
use uma_presets::constants::logging::LEVEL_ENV;
use uma_presets::constants::storage::PATH_ENV;
use uma_presets::document::DocumentFormat;
use uma_presets::presets::JsonFileStore;
use uma_presets::{version, Editor, PresetError};

#[derive(Parser)]
#[command(name = "uma-presets", version, about = "Manage Uma Auto Train configuration presets")]
struct Cli {
    /// Preset store file (defaults to the user config directory)
    #[arg(long, global = true, env = PATH_ENV)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Preset(PresetCommand),
    /// List every configuration field with its type and default
    Fields,
    /// List available themes
    Themes,
    /// Print version information
    Version,
}

/// Commands that read or write the preset store
#[derive(Subcommand)]
enum PresetCommand {
    /// List presets, marking the active one
    List,
    /// Print a preset's configuration as JSON (active preset by default)
    Show { number: Option<usize> },
    /// Make preset NUMBER the active preset
    Select { number: usize },
    /// Set fields on a preset and save it
    Set {
        /// Preset to edit (active preset by default)
        #[arg(long, conflicts_with = "as_new")]
        preset: Option<usize>,
        /// Save the result as a new preset instead of overwriting
        #[arg(long)]
        as_new: bool,
        /// KEY=VALUE assignments; lists are comma-separated
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Add a preset with default settings
    New {
        #[arg(long)]
        name: Option<String>,
    },
    /// Copy preset NUMBER into a new preset
    Duplicate {
        number: usize,
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename preset NUMBER
    Rename { number: usize, name: String },
    /// Delete preset NUMBER
    Remove { number: usize },
    /// Merge a JSON or TOML document into the active preset
    Import { file: PathBuf },
    /// Write the active configuration to FILE (.toml or JSON), or "-" for stdout
    Export { file: PathBuf },
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var(LEVEL_ENV)
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;
    Ok(())
}

/// Preset numbers on the command line are 1-based, like the "Preset N" labels
fn to_index(number: usize) -> Result<usize> {
    number.checked_sub(1).context("Preset numbers start at 1")
}

/// Parse `KEY=VALUE` arguments into field values. The first bad assignment
/// rejects the whole batch.
fn parse_assignments(assignments: &[String]) -> Result<Vec<(String, Value)>> {
    assignments
        .iter()
        .map(|assignment| {
            let (key, raw) = assignment
                .split_once('=')
                .with_context(|| format!("Expected KEY=VALUE, got '{assignment}'"))?;
            let key = key.trim();
            let value = schema::parse_field(key, raw)
                .with_context(|| format!("Cannot apply '{assignment}'"))?;
            Ok((key.to_string(), value))
        })
        .collect()
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Fields => print_fields(),
        Command::Themes => print_themes(),
        Command::Version => print_version(),
        Command::Preset(command) => {
            let path = cli.store.unwrap_or_else(JsonFileStore::default_path);
            let mut editor = Editor::open(JsonFileStore::at_path(path));
            run(&mut editor, command)
        }
    };

    if let Err(err) = &result {
        if let Some(preset_err) = err.downcast_ref::<PresetError>() {
            if preset_err.is_user_error() {
                warn!(code = preset_err.code(), "Command rejected");
            } else {
                error!(code = preset_err.code(), error = %preset_err, "Command failed");
            }
        }
    }
    result
}

fn run(editor: &mut Editor<JsonFileStore>, command: PresetCommand) -> Result<()> {
    match command {
        PresetCommand::List => {
            for (index, name) in editor.list_presets().iter().enumerate() {
                let marker = if index == editor.active_index() { "*" } else { " " };
                println!("{marker} {}. {name}", index + 1);
            }
        }
        PresetCommand::Show { number } => {
            let config = match number {
                Some(number) => {
                    let index = to_index(number)?;
                    let preset = editor.presets().get(index).ok_or(PresetError::OutOfRange {
                        index,
                        len: editor.presets().len(),
                    })?;
                    &preset.config
                }
                None => editor.active_configuration(),
            };
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        PresetCommand::Select { number } => {
            editor.select_preset(to_index(number)?)?;
            println!("Active preset: {}", editor.list_presets()[editor.active_index()]);
        }
        PresetCommand::Set {
            preset,
            as_new,
            assignments,
        } => {
            // Checked up front so a rejected assignment leaves the store untouched
            let updates = parse_assignments(&assignments)?;
            if let Some(number) = preset {
                editor.select_preset(to_index(number)?)?;
            }
            for (key, value) in updates {
                editor.update_field(&key, value)?;
            }
            let slot = if as_new {
                editor.save_as_new_preset()?
            } else {
                editor.save_active_preset()?
            };
            println!("Saved preset {}. {}", slot + 1, editor.list_presets()[slot]);
        }
        PresetCommand::New { name } => {
            let index = editor.new_preset(name)?;
            println!("Created preset {}. {}", index + 1, editor.list_presets()[index]);
        }
        PresetCommand::Duplicate { number, name } => {
            let index = editor.duplicate_preset(to_index(number)?, name)?;
            println!("Created preset {}. {}", index + 1, editor.list_presets()[index]);
        }
        PresetCommand::Rename { number, name } => {
            let index = to_index(number)?;
            editor.rename_preset(index, &name)?;
            println!("Renamed preset {number} to {}", editor.list_presets()[index]);
        }
        PresetCommand::Remove { number } => {
            let removed = editor.remove_preset(to_index(number)?)?;
            println!("Removed preset '{}'", removed.name);
        }
        PresetCommand::Import { file } => {
            let report = editor.import_file(&file)?;
            println!("Imported {} into preset {}", file.display(), editor.active_index() + 1);
            print_report(&report);
        }
        PresetCommand::Export { file } => {
            if file.as_os_str() == "-" {
                let rendered = editor.export_document(DocumentFormat::Json)?;
                std::io::stdout()
                    .write_all(rendered.as_bytes())
                    .context("Failed to write to stdout")?;
            } else {
                editor.export_file(&file)?;
                println!("Exported active configuration to {}", file.display());
            }
        }
    }
    Ok(())
}

fn print_report(report: &MergeReport) {
    if !report.rejected.is_empty() {
        println!("Kept existing values for mismatched fields: {}", report.rejected.join(", "));
    }
    if !report.dropped.is_empty() {
        println!("Ignored unknown fields: {}", report.dropped.join(", "));
    }
}

fn print_fields() -> Result<()> {
    for field in schema::fields() {
        println!(
            "{} = {}  ({})\n    {}",
            field.key,
            field.default.to_value(),
            field.kind.describe(),
            field.description
        );
    }
    Ok(())
}

fn print_themes() -> Result<()> {
    for theme in themes::THEMES {
        println!("{:>8}  {}  ({} / {})", theme.id, theme.label, theme.primary, theme.secondary);
    }
    Ok(())
}

fn print_version() -> Result<()> {
    println!("uma-presets {}", env!("CARGO_PKG_VERSION"));
    println!("release {}", version::app_version());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn set(preset: Option<usize>, assignments: &[&str]) -> PresetCommand {
        PresetCommand::Set {
            preset,
            as_new: false,
            assignments: args(assignments),
        }
    }

    #[test]
    fn test_to_index_is_one_based() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert_eq!(to_index(3).unwrap(), 2);
        assert!(to_index(0).is_err());
    }

    #[test]
    fn test_parse_assignments() {
        let parsed = parse_assignments(&args(&[
            "minimum_mood=4",
            " priority_stat =wit, spd",
            "window_name=Uma=Musume",
        ]))
        .unwrap();

        assert_eq!(
            parsed,
            vec![
                ("minimum_mood".to_string(), json!(4)),
                ("priority_stat".to_string(), json!(["wit", "spd"])),
                ("window_name".to_string(), json!("Uma=Musume")),
            ]
        );
    }

    #[test]
    fn test_parse_assignments_rejects_batch() {
        let err = parse_assignments(&args(&["minimum_mood=4", "use_adb"])).unwrap_err();
        assert!(err.to_string().contains("Expected KEY=VALUE"));

        let err = parse_assignments(&args(&["minimum_mood=4", "retired_field=1"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PresetError>(),
            Some(PresetError::UnknownField { .. })
        ));

        let err = parse_assignments(&args(&["minimum_mood=high"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PresetError>(),
            Some(PresetError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejected_set_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        let mut editor = Editor::open(JsonFileStore::at_path(&path));
        editor.new_preset(Some("Dirt".to_string())).unwrap();
        editor.select_preset(0).unwrap();

        assert!(run(&mut editor, set(Some(2), &["minimum_mood=4", "minimum_mood=9"])).is_err());

        let reopened = Editor::open(JsonFileStore::at_path(&path));
        assert_eq!(reopened.active_index(), 0);
        assert_eq!(reopened.presets()[1].config.get_i64("minimum_mood"), Some(3));
    }

    #[test]
    fn test_set_on_other_preset_saves_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        let mut editor = Editor::open(JsonFileStore::at_path(&path));
        editor.new_preset(Some("Dirt".to_string())).unwrap();
        editor.select_preset(0).unwrap();

        run(&mut editor, set(Some(2), &["minimum_mood=4", "use_adb=yes"])).unwrap();

        let reopened = Editor::open(JsonFileStore::at_path(&path));
        assert_eq!(reopened.active_index(), 1);
        let config = &reopened.presets()[1].config;
        assert_eq!(config.get_i64("minimum_mood"), Some(4));
        assert_eq!(config.get_bool("use_adb"), Some(true));
        assert_eq!(reopened.presets()[0].config.get_i64("minimum_mood"), Some(3));
    }
}
