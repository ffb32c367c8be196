//! System clipboard access for renderers that export their content
//!
//! A fresh `arboard` handle is opened per copy; nothing is held between calls.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy `text` to the system clipboard, returning the number of lines copied
///
/// Fails when no clipboard is reachable (headless Linux, denied access).
pub fn copy_to_clipboard(text: &str) -> Result<usize> {
    let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(text)
        .context("clipboard rejected the text")?;
    Ok(text.lines().count())
}
