//! # Ausome Core
//!
//! Core logic for the Ausome worksheet assistant.
//!
//! This crate contains the pure data operations behind the child-profile form:
//! - Profile storage and normalisation on top of a per-session key/value store
//! - Context summaries of a child profile for display and prompting
//! - Activity selection from the focus/subtype menus
//! - Worksheet, image and text-activity prompt construction
//!
//! **No API concerns**: HTTP servers, the hosted generation client, and command-line handling
//! belong in `api-rest`, `ausome-openai`, and `ausome-cli`.

pub mod activity;
pub mod artifact;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod generation;
pub mod profile;
pub mod prompt;
pub mod session;
pub mod validation;
pub mod worksheet;

pub use activity::{ActivityRequest, ActivitySelector};
pub use artifact::WorksheetImage;
pub use config::CoreConfig;
pub use context::ContextFormatter;
pub use error::{WorksheetError, WorksheetResult};
pub use generation::{GenerationClient, GenerationError, GenerationResult};
pub use profile::{ActivityFocus, ChildProfile, ProfileField, ProfileOption, ProfileStore};
pub use prompt::{ActivityType, KnownActivity, PromptBuilder};
pub use session::{SessionStore, SessionValue};
pub use validation::Topic;
pub use worksheet::{TextActivity, WorksheetPrompts, WorksheetService};
