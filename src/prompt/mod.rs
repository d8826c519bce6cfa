//! Prompt construction: template selection, asset loading and placeholder rendering.

pub mod builder;
pub mod error;
pub mod policy;
pub mod render;
pub mod templates;

#[cfg(test)]
mod tests;

pub use builder::{PromptBuilder, render_areas, render_publications};
pub use error::{TemplateError, TemplateResult};
pub use policy::{PromptPolicy, ScoringScheme, StrictnessTier};
pub use render::PlaceholderTable;
pub use templates::{
    DirTemplateSource, StaticTemplateSource, TemplateRole, TemplateSource, TemplateStore,
    fallback_template,
};
