//! `config show`: effective settings and where they came from.

use std::io::{self, Write};

use url_downloader::Settings;
use url_downloader::config::LoadedConfig;

pub(crate) fn run_config_show_command(loaded: &LoadedConfig, settings: &Settings) -> io::Result<()> {
    write_config_report(&mut io::stdout().lock(), loaded, settings)
}

pub(crate) fn write_config_report(
    out: &mut impl Write,
    loaded: &LoadedConfig,
    settings: &Settings,
) -> io::Result<()> {
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    writeln!(out, "config_path = {resolved_path}")?;
    writeln!(
        out,
        "config_file = {}",
        if loaded.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    )?;
    writeln!(out, "open_selection = {}", settings.open_selection)?;
    writeln!(out, "default_protocol = {}", settings.default_protocol)?;
    writeln!(out, "show_url = {}", settings.show_url)?;
    writeln!(
        out,
        "editor = {}",
        settings.editor.as_deref().unwrap_or("<$VISUAL or $EDITOR>")
    )?;
    writeln!(out, "temp_dir = {}", settings.temp_dir().display())?;
    writeln!(out, "connect_timeout_secs = {}", settings.connect_timeout_secs)?;
    writeln!(out, "read_timeout_secs = {}", settings.read_timeout_secs)?;
    Ok(())
}
