//! Headless stand-in for the tray control: the tooltip and glyph are written to files
//! that an external shell (or a human) can watch.

use std::path::PathBuf;

use notifier_core::IconImage;

use super::persist::{AtomicFileWriter, PersistError};

pub const TOOLTIP_FILENAME: &str = "tooltip.txt";
pub const ICON_FILENAME: &str = "icon.pam";

/// Must only be touched from the display-owning thread.
pub struct FileDisplaySink {
    writer: AtomicFileWriter,
    tooltip: Option<String>,
}

impl FileDisplaySink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            tooltip: None,
        }
    }

    /// Returns `Ok(false)` when the text is already displayed.
    pub fn set_tooltip(&mut self, text: &str) -> Result<bool, PersistError> {
        if self.tooltip.as_deref() == Some(text) {
            return Ok(false);
        }
        self.writer.write(TOOLTIP_FILENAME, text.as_bytes())?;
        self.tooltip = Some(text.to_string());
        Ok(true)
    }

    pub fn set_icon(&mut self, icon: &IconImage) -> Result<(), PersistError> {
        self.writer.write(ICON_FILENAME, &encode_pam(icon))?;
        Ok(())
    }

    /// Takes the icon off display; the last tooltip text is kept for inspection.
    pub fn hide(&mut self) -> Result<(), PersistError> {
        self.writer.remove(ICON_FILENAME)
    }
}

/// Netpbm PAM with an alpha channel, the simplest lossless RGBA container.
fn encode_pam(icon: &IconImage) -> Vec<u8> {
    let header = format!(
        "P7\nWIDTH {}\nHEIGHT {}\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
        icon.width(),
        icon.height()
    );
    let mut bytes = Vec::with_capacity(header.len() + icon.pixels().len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(icon.pixels());
    bytes
}
