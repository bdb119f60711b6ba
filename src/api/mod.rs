//! Entity kinds of the Transifex API.

mod project;
mod resource;
mod stats;
mod string_translation;
mod translation;

pub use project::Project;
pub use resource::{LanguageStats, Resource};
pub use stats::Stats;
pub use string_translation::{SingleStringTranslation, StringTranslation};
pub use translation::Translation;
