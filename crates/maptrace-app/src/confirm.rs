//! Confirmation prompts for destructive commands.

/// Gate for destructive actions (delete-selected, clear-all).
///
/// The shell shows the prompt however it likes; returning `false` leaves
/// session state unchanged.
pub trait ConfirmPrompt {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything. For embedding shells that prompt elsewhere, and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmPrompt for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
