/// Session-gated controls beneath the composer.
pub mod affordances;
pub mod composer;
/// Chat room page hosting the composer.
pub mod room;

pub use affordances::{AffordanceBar, AttachRequested, VoiceRequested, WebSearchToggled};
pub use composer::ComposerInput;
pub use room::ChatRoom;
