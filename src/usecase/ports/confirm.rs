#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    SaveAll { pending: usize },
    DeleteRegion { region: String },
    Import { regions: usize },
}

impl ConfirmPrompt {
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmPrompt::SaveAll { .. } => "Save changes",
            ConfirmPrompt::DeleteRegion { .. } => "Delete region",
            ConfirmPrompt::Import { .. } => "Import prices",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfirmPrompt::SaveAll { pending } => format!("Save changes for {pending} region(s)?"),
            ConfirmPrompt::DeleteRegion { region } => format!(
                "Delete region \"{region}\"?\n\nThis action cannot be undone."
            ),
            ConfirmPrompt::Import { regions } => {
                format!("Import prices for {regions} region(s)? Unsaved edits will be discarded.")
            }
        }
    }
}

/// Human-in-the-loop gate for destructive or bulk operations.
pub trait Confirmer {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}
