use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use wikimage_config::Config;
use wikimage_engine::{ConsoleReporter, RewriteOptions, convert_directory, io::validate_notes_dir};

/// Convert `![[image.png|100]]` embeds in markdown notes to `![](./image.png)`
#[derive(Debug, Parser)]
#[command(name = "wikimage", version, about)]
struct Cli {
    /// Notes folder to convert; prompted for when missing from args and config
    notes_path: Option<PathBuf>,

    /// Keep relative image paths as written instead of prefixing `./`
    #[arg(long)]
    no_dot_slash: bool,

    /// Report what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Config file to use instead of ~/.config/wikimage/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Everything needed to start a conversion run
#[derive(Debug, PartialEq)]
struct Settings {
    notes_path: PathBuf,
    options: RewriteOptions,
    from_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    let config = match Config::load_from_path(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Config load failed: {e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if config.is_some() {
        log::info!("Loaded config from {}", config_path.display());
    }

    let settings = match resolve_settings(&cli, config, prompt_for_notes_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!("Usage: wikimage <notes-folder-path>");
            eprintln!("Or set notes_path in {}", config_path.display());
            process::exit(1);
        }
    };

    // Validate before touching anything
    if let Err(e) = validate_notes_dir(&settings.notes_path) {
        let source = if settings.from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Notes path '{}'{} is invalid: {e}",
            settings.notes_path.display(),
            source
        );
        process::exit(1);
    }

    log::info!(
        "Converting {} (dot-slash prefix: {}, dry run: {})",
        settings.notes_path.display(),
        settings.options.add_dot_slash_prefix,
        settings.options.dry_run
    );

    let mut reporter = ConsoleReporter::stdio();
    if let Err(e) = convert_directory(&settings.notes_path, &settings.options, &mut reporter) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Combine command line, config file and interactive input.
///
/// Command line wins over config; the prompt is only used when neither names a folder.
fn resolve_settings(
    cli: &Cli,
    config: Option<Config>,
    prompt: impl FnOnce() -> Result<PathBuf>,
) -> Result<Settings> {
    let config = config.unwrap_or_default();
    let options = RewriteOptions::new(config.add_dot_slash_prefix && !cli.no_dot_slash)
        .with_dry_run(cli.dry_run);

    let (notes_path, from_config) = match (&cli.notes_path, config.notes_path) {
        (Some(path), _) => (path.clone(), false),
        (None, Some(path)) => (path, true),
        (None, None) => (prompt()?, false),
    };

    Ok(Settings {
        notes_path,
        options,
        from_config,
    })
}

fn prompt_for_notes_path() -> Result<PathBuf> {
    print!("Enter the absolute path of your notes folder: ");
    io::stdout().flush().context("Failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read notes path from stdin")?;

    let line = line.trim();
    if line.is_empty() {
        bail!("No notes path provided");
    }
    Ok(PathBuf::from(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wikimage").chain(args.iter().copied())).unwrap()
    }

    fn no_prompt() -> Result<PathBuf> {
        panic!("prompt should not be used")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_argument_wins_over_config() {
        let config = Config {
            notes_path: Some(PathBuf::from("/from/config")),
            add_dot_slash_prefix: true,
        };

        let settings = resolve_settings(&cli(&["/from/args"]), Some(config), no_prompt).unwrap();

        assert_eq!(settings.notes_path, PathBuf::from("/from/args"));
        assert!(!settings.from_config);
        assert_eq!(settings.options, RewriteOptions::new(true));
    }

    #[test]
    fn test_config_path_used_without_argument() {
        let config = Config {
            notes_path: Some(PathBuf::from("/from/config")),
            add_dot_slash_prefix: false,
        };

        let settings = resolve_settings(&cli(&[]), Some(config), no_prompt).unwrap();

        assert_eq!(settings.notes_path, PathBuf::from("/from/config"));
        assert!(settings.from_config);
        assert!(!settings.options.add_dot_slash_prefix);
    }

    #[test]
    fn test_flags_shape_options() {
        let settings =
            resolve_settings(&cli(&["--no-dot-slash", "--dry-run", "notes"]), None, no_prompt)
                .unwrap();

        assert_eq!(
            settings.options,
            RewriteOptions::new(false).with_dry_run(true)
        );
    }

    #[test]
    fn test_prompt_used_as_last_resort() {
        let settings =
            resolve_settings(&cli(&[]), None, || Ok(PathBuf::from("/typed/in"))).unwrap();

        assert_eq!(settings.notes_path, PathBuf::from("/typed/in"));
        assert!(settings.options.add_dot_slash_prefix);
    }

    #[test]
    fn test_prompt_failure_propagates() {
        let result = resolve_settings(&cli(&[]), None, || {
            Err(anyhow::anyhow!("No notes path provided"))
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_end_to_end_conversion() {
        let notes_dir = tempfile::tempdir().unwrap();
        let note = notes_dir.path().join("note.md");
        std::fs::write(&note, "![[pic.png|120]]").unwrap();

        let settings = resolve_settings(
            &cli(&[notes_dir.path().to_str().unwrap()]),
            None,
            no_prompt,
        )
        .unwrap();
        validate_notes_dir(&settings.notes_path).unwrap();
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new());
        convert_directory(&settings.notes_path, &settings.options, &mut reporter).unwrap();

        assert_eq!(std::fs::read_to_string(&note).unwrap(), "![](./pic.png)");
    }
}
