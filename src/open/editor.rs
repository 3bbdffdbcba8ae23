//! External editor processes as tabs.

use std::env;
use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::error::HostError;
use super::tab::TempTab;

/// Environment variable carrying the tab's URL into the editor process.
pub const EDITOR_URL_ENV: &str = "URL_DOWNLOADER_URL";

/// An editor command line. The file path is appended as the last argument
/// and the tab stays open until the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// Parses a command line such as `code --wait`.
    ///
    /// Words are separated by whitespace; single or double quotes group a
    /// word that contains spaces, e.g. `"/opt/Sublime Text/subl" -w`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::EditorNotConfigured`] for a blank command.
    pub fn from_command(command: &str) -> Result<Self, HostError> {
        let mut words = split_words(command).into_iter();
        let program = words.next().ok_or(HostError::EditorNotConfigured)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Picks the configured editor, then `$VISUAL`, then `$EDITOR`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::EditorNotConfigured`] when none is set.
    pub fn resolve(configured: Option<&str>) -> Result<Self, HostError> {
        resolve_from(
            configured,
            env::var("VISUAL").ok().as_deref(),
            env::var("EDITOR").ok().as_deref(),
        )
    }

    /// The program that will be run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The command line as it will be run, without the file path.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Opens the tab's file and waits for the editor to exit.
    ///
    /// If the file's content changed while the editor ran, the user saved
    /// it and the tab stops being temporary. A failing exit status is logged
    /// but not treated as an error.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the file cannot be read beforehand or the
    /// editor cannot be started.
    #[instrument(skip(self, tab), fields(editor = %self.program, path = %tab.path().display()))]
    pub async fn edit(&self, tab: &mut TempTab) -> Result<(), HostError> {
        let before = content_digest(tab.path())
            .await
            .map_err(|e| HostError::io(tab.path(), e))?;

        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(tab.path());
        if let Some(url) = tab.associated_url() {
            command.env(EDITOR_URL_ENV, url);
        }

        info!(command = %self.command_line(), "opening in editor");
        let status = command
            .status()
            .await
            .map_err(|e| HostError::spawn(&self.program, e))?;
        if !status.success() {
            warn!(%status, "editor exited with failure status");
        }

        match content_digest(tab.path()).await {
            Ok(after) if after != before => tab.on_pre_save(),
            Ok(_) => debug!("file unchanged by editor"),
            Err(e) => debug!(error = %e, "file unreadable after editor exit"),
        }
        Ok(())
    }
}

/// Splits on whitespace outside quotes. An unterminated quote runs to the end.
fn split_words(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => word.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            None => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(word);
    }
    words
}

fn resolve_from(
    configured: Option<&str>,
    visual: Option<&str>,
    editor: Option<&str>,
) -> Result<ExternalEditor, HostError> {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .find(|command| !command.trim().is_empty())
        .map_or(Err(HostError::EditorNotConfigured), ExternalEditor::from_command)
}

/// SHA-256 of a file's content.
///
/// # Errors
///
/// Returns the IO error when the file cannot be read.
pub async fn content_digest(path: &Path) -> std::io::Result<[u8; 32]> {
    let bytes = tokio::fs::read(path).await?;
    Ok(Sha256::digest(&bytes).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_command_splits_args() {
        let editor = ExternalEditor::from_command("code --wait --new-window").unwrap();
        assert_eq!(editor.program(), "code");
        assert_eq!(editor.command_line(), "code --wait --new-window");
    }

    #[test]
    fn test_from_command_quoted_program_with_spaces() {
        let editor =
            ExternalEditor::from_command(r#""/Applications/Sublime Text.app/bin/subl" -w"#).unwrap();
        assert_eq!(editor.program(), "/Applications/Sublime Text.app/bin/subl");
        assert_eq!(editor.args, vec!["-w".to_string()]);
    }

    #[test]
    fn test_split_words_quotes() {
        assert_eq!(
            split_words("emacsclient -a '' --eval 'x y'"),
            vec!["emacsclient", "-a", "", "--eval", "x y"]
        );
        assert_eq!(split_words("  vim   -p "), vec!["vim", "-p"]);
        assert_eq!(split_words("\"unterminated path"), vec!["unterminated path"]);
    }

    #[test]
    fn test_from_command_blank_is_not_configured() {
        assert!(matches!(
            ExternalEditor::from_command("   "),
            Err(HostError::EditorNotConfigured)
        ));
    }

    #[test]
    fn test_resolve_prefers_configured_then_visual_then_editor() {
        let editor = resolve_from(Some("hx"), Some("nvim"), Some("vi")).unwrap();
        assert_eq!(editor.program(), "hx");

        let editor = resolve_from(None, Some("nvim"), Some("vi")).unwrap();
        assert_eq!(editor.program(), "nvim");

        let editor = resolve_from(None, Some(""), Some("vi")).unwrap();
        assert_eq!(editor.program(), "vi");
    }

    #[test]
    fn test_resolve_nothing_set() {
        assert!(matches!(
            resolve_from(None, None, None),
            Err(HostError::EditorNotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_content_digest_changes_with_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "one").unwrap();
        let first = content_digest(&path).await.unwrap();
        std::fs::write(&path, "two").unwrap();
        let second = content_digest(&path).await.unwrap();
        assert_ne!(first, second);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_unchanged_file_stays_temporary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page_x.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();
        let mut tab = TempTab::new(&path, "https://example.com/page.html", false);

        let editor = ExternalEditor::from_command("true").unwrap();
        editor.edit(&mut tab).await.unwrap();

        assert!(tab.is_temporary());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_changed_file_counts_as_saved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page_y.html");
        std::fs::write(&path, "<p>original</p>").unwrap();
        let replacement = dir.path().join("edited.html");
        std::fs::write(&replacement, "<p>edited</p>").unwrap();
        let mut tab = TempTab::new(&path, "https://example.com/page.html", true);

        // `cp <replacement> <path>` stands in for an editor writing the file.
        let editor =
            ExternalEditor::from_command(&format!("cp {}", replacement.display())).unwrap();
        editor.edit(&mut tab).await.unwrap();

        assert!(!tab.is_temporary());
        assert_eq!(tab.status(), None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>edited</p>");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_failing_editor_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page_z.txt");
        std::fs::write(&path, "text").unwrap();
        let mut tab = TempTab::new(&path, "https://example.com/z", false);

        let editor = ExternalEditor::from_command("false").unwrap();
        editor.edit(&mut tab).await.unwrap();
        assert!(tab.is_temporary());
    }

    #[tokio::test]
    async fn test_edit_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.txt");
        std::fs::write(&path, "text").unwrap();
        let mut tab = TempTab::new(&path, "https://example.com/page.txt", false);

        let editor = ExternalEditor::from_command("definitely-not-an-editor-4f1c").unwrap();
        let err = editor.edit(&mut tab).await.unwrap_err();
        assert!(matches!(err, HostError::Spawn { .. }), "got {err:?}");
    }
}
