use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use url_downloader::config::{self, LoadedConfig};
use url_downloader::{Settings, UrlDownloadCommand, UrlDownloadContextCommand};

use crate::ProcessExit;
use crate::app::{config_show, exit_handler, input_processor, terminal};
use crate::app::terminal_host::TerminalHost;
use crate::cli::{AtArgs, Cli, Command, ConfigCommand, GlobalArgs};

pub(crate) async fn run_url_downloader() -> Result<ProcessExit> {
    let cli = Cli::parse();

    let no_color =
        terminal::should_disable_color(terminal::no_color_env_requested(), terminal::is_dumb_terminal());
    terminal::init_tracing(cli.global.default_log_level(), no_color);
    debug!(?cli, "CLI arguments parsed");

    let loaded = load_config(&cli.global)?;
    let settings = resolve_settings(&cli.global, &loaded)?;
    debug!(?settings, "effective settings");

    let use_spinner = terminal::should_use_spinner(
        io::stderr().is_terminal(),
        cli.global.quiet,
        terminal::is_dumb_terminal(),
    );
    let host = TerminalHost::new(settings.editor.clone(), use_spinner);

    match cli.command {
        Command::Open { url } => {
            let outcome = UrlDownloadCommand::new(settings)?.run(&host, &url).await;
            Ok(exit_handler::exit_for_outcome(&outcome))
        }
        Command::At(args) => run_at(&args, settings, &host).await,
        Command::Fetch { url } => {
            let fetched = UrlDownloadCommand::new(settings)?.fetch(&host, &url).await;
            host.clear_status();
            match fetched {
                Ok(path) => {
                    println!("{}", path.display());
                    Ok(ProcessExit::Success)
                }
                Err(_) => Ok(ProcessExit::Failure),
            }
        }
        Command::Config {
            command: ConfigCommand::Show,
        } => {
            config_show::run_config_show_command(&loaded, &settings)
                .context("Failed to write config report")?;
            Ok(ProcessExit::Success)
        }
    }
}

async fn run_at(args: &AtArgs, settings: Settings, host: &TerminalHost) -> Result<ProcessExit> {
    let text = input_processor::read_text(args.file.as_deref())?;
    let positions = input_processor::resolve_positions(args, &text)?;
    let mut context = UrlDownloadContextCommand::new(UrlDownloadCommand::new(settings)?);

    if args.describe {
        return Ok(
            match context.description(&text, positions.selection, positions.point) {
                Some(description) => {
                    println!("{description}");
                    ProcessExit::Success
                }
                None => {
                    report_no_url(args);
                    ProcessExit::Failure
                }
            },
        );
    }

    let outcome = context
        .run(host, &text, positions.selection, positions.point)
        .await;
    if outcome.is_none() {
        report_no_url(args);
    }
    Ok(exit_handler::exit_for_context_outcome(outcome.as_ref()))
}

fn report_no_url(args: &AtArgs) {
    let position = args.point.unwrap_or(args.cursor);
    eprintln!("No URL found at {position}");
}

fn load_config(global: &GlobalArgs) -> Result<LoadedConfig> {
    match global.config.as_deref() {
        Some(path) => config::load_explicit_file_config(path),
        None => config::load_default_file_config(),
    }
}

/// Layers defaults, the config file and command-line flags, in that order.
fn resolve_settings(global: &GlobalArgs, loaded: &LoadedConfig) -> Result<Settings> {
    let overrides = global.overrides();
    overrides
        .validate()
        .context("Invalid command-line option")?;
    if loaded.loaded_from_file {
        info!(path = ?loaded.path, "using config file");
    }
    Ok(Settings::default()
        .layered(&loaded.layer())
        .layered(&overrides))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use url_downloader::config::FileConfig;

    fn global(argv: &[&str]) -> GlobalArgs {
        let mut full = vec!["url-downloader"];
        full.extend_from_slice(argv);
        full.extend_from_slice(&["open", "x"]);
        Cli::try_parse_from(full).unwrap().global
    }

    #[test]
    fn test_resolve_settings_cli_beats_file_beats_defaults() {
        let loaded = LoadedConfig {
            path: None,
            config: Some(FileConfig {
                show_url: Some(true),
                editor: Some("vim".to_string()),
                read_timeout_secs: Some(60),
                ..FileConfig::default()
            }),
            loaded_from_file: true,
        };
        let settings = resolve_settings(&global(&["--editor", "hx"]), &loaded).unwrap();

        assert_eq!(settings.editor.as_deref(), Some("hx"));
        assert!(settings.show_url);
        assert_eq!(settings.read_timeout_secs, 60);
        assert_eq!(settings.default_protocol, "http://");
    }

    #[test]
    fn test_resolve_settings_rejects_bad_protocol_flag() {
        let loaded = LoadedConfig {
            path: None,
            config: None,
            loaded_from_file: false,
        };
        let err = resolve_settings(&global(&["--default-protocol", "https"]), &loaded).unwrap_err();
        assert!(format!("{err:#}").contains("default_protocol"), "got {err:#}");
    }
}
