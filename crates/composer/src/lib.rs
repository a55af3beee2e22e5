#![deny(unsafe_code)]

//! Headless chat composer for Flint.
//!
//! Everything here runs without a window: the gpui front end feeds input events and a
//! measurement surface in, and applies the returned geometry, focus and submit payloads.

/// Draft ownership, shared-prompt mirroring and submit enablement.
pub mod coordinator;
pub mod error;
pub mod events;
/// Session-based gating of auxiliary composer controls.
pub mod gate;
pub mod session;
/// Composer configuration loading and persistence.
pub mod settings;
pub mod store;
/// Content-driven sizing and focus rules for the multi-line input.
pub mod surface;
pub mod tracker;

pub use coordinator::{ComposerState, FocusRing, PROMPT_FIELD, RenderEffects, SendStyle};
pub use error::{SettingsError, SettingsResult};
pub use events::{ChangeOutcome, Submit};
pub use gate::Affordances;
pub use session::{User, UserRole, UserStore};
pub use settings::{ComposerSettings, SettingsStore};
pub use store::{AppStore, Theme};
pub use surface::{AdaptiveSurface, EstimatedSurface, Geometry, RenderSurface, SurfaceConfig};
pub use tracker::ChangeTracker;
