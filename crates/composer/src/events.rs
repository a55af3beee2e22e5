/// Emitted when the user submits the draft for sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submit {
    pub content: String,
}

impl Submit {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Result of feeding one input event into the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Draft and shared mirror now hold the new value.
    Applied,
    /// Value exceeded the character cap; the previous draft is kept.
    Rejected { attempted_chars: usize, max_chars: usize },
    /// Event targeted a field this composer does not own.
    Ignored,
}

impl ChangeOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}
