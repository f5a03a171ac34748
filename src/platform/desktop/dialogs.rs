use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::usecase::ports::confirm::{ConfirmPrompt, Confirmer};

/// Native yes/no dialog in front of bulk and destructive actions.
pub struct DialogConfirmer;

impl Confirmer for DialogConfirmer {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        let level = match prompt {
            ConfirmPrompt::DeleteRegion { .. } => MessageLevel::Warning,
            _ => MessageLevel::Info,
        };
        MessageDialog::new()
            .set_level(level)
            .set_title(prompt.title())
            .set_description(prompt.message())
            .set_buttons(MessageButtons::YesNo)
            .show()
            == MessageDialogResult::Yes
    }
}

pub fn pick_import_file() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file()
}

pub fn pick_export_file(default_name: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_file_name(default_name)
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .save_file()
}
