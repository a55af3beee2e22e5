use crate::session::User;

/// Auxiliary input controls shown beneath the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Affordances {
    pub attachment: bool,
    pub voice: bool,
    pub web_search: bool,
}

impl Affordances {
    /// Decides which controls to expose for the given session.
    ///
    /// Attachments and voice capture need an identified user; web search is always offered.
    pub fn for_session(user: Option<&User>) -> Self {
        let identified = user.is_some_and(User::is_identified);
        Self {
            attachment: identified,
            voice: identified,
            web_search: true,
        }
    }
}
