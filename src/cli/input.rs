// Line editing for the REPL
//
// Only slash commands are kept in the readline history. Chat lines can carry
// personal or crisis disclosures and are never written to the history file.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::PathBuf;

const HISTORY_FILE: &str = "history.txt";

/// Lines worth recalling with the arrow keys across runs
pub fn is_recallable(line: &str) -> bool {
    line.starts_with('/') && !line.starts_with("/save")
}

pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl InputHandler {
    /// Editor with command history in ~/.copechat, or in memory only without a home dir
    pub fn new() -> Result<Self> {
        let history_path: Option<PathBuf> =
            dirs::home_dir().map(|home| home.join(".copechat").join(HISTORY_FILE));
        let mut editor = DefaultEditor::new().context("Failed to initialize readline editor")?;

        if let Some(path) = history_path.as_ref().filter(|p| p.exists()) {
            if let Err(e) = editor.load_history(path) {
                tracing::warn!("Ignoring unreadable history file {}: {}", path.display(), e);
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Trimmed line, or `None` on Ctrl+C / Ctrl+D
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = match self.editor.readline(prompt) {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err).context("Failed to read input"),
        };

        if is_recallable(&line) {
            self.editor
                .add_history_entry(line.as_str())
                .context("Failed to add history entry")?;
        }

        Ok(Some(line))
    }

    pub fn save_history(&mut self) -> Result<()> {
        let Some(path) = &self.history_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        self.editor
            .save_history(path)
            .with_context(|| format!("Failed to save history to {}", path.display()))
    }
}
