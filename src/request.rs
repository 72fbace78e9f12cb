use crate::serde::Deserialize;

/// The vote form. `choice` stays a string so a malformed value is handled
/// like a missing one instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    pub fn choice_id(&self) -> Option<i32> {
        self.choice.as_deref().and_then(|c| c.trim().parse().ok())
    }
}
