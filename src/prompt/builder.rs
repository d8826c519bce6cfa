use std::path::PathBuf;
use std::sync::Arc;

use crate::constants::{
    AREAS_NOT_SPECIFIED, MAX_PROMPT_PUBLICATIONS, NO_RECENT_PUBLICATIONS,
    PUBLICATIONS_NOT_AVAILABLE, RECENT_PUBLICATION_YEAR,
};
use crate::profile::{Publication, ResearcherProfile};

use super::policy::{PromptPolicy, ScoringScheme, StrictnessTier};
use super::render::PlaceholderTable;
use super::templates::{
    DirTemplateSource, TemplateRole, TemplateSource, TemplateStore, fallback_template,
};

/// Renders one evaluation prompt per professor from the template matrix.
#[derive(Debug)]
pub struct PromptBuilder {
    templates: TemplateStore,
}

impl PromptBuilder {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        Self {
            templates: TemplateStore::new(source),
        }
    }

    /// Builder reading assets from `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(DirTemplateSource::new(dir)))
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// System prompt, a blank line, then the rendered user prompt.
    pub fn build(
        &self,
        profile: &ResearcherProfile,
        research_direction: &str,
        strictness: StrictnessTier,
        scheme: ScoringScheme,
    ) -> String {
        let policy = PromptPolicy::new(strictness, scheme);
        let system = self.templates.get(
            policy.system_asset(),
            fallback_template(scheme, TemplateRole::System),
        );
        let user = self.templates.get(
            policy.user_asset(),
            fallback_template(scheme, TemplateRole::User),
        );

        let table = PlaceholderTable::for_profile(
            profile,
            render_areas(&profile.areas),
            render_publications(&profile.publications),
            research_direction,
        );

        format!("{system}\n\n{}", table.render(&user))
    }
}

/// Recent publications one per line, or the matching placeholder text.
pub fn render_publications(publications: &[Publication]) -> String {
    if publications.is_empty() {
        return PUBLICATIONS_NOT_AVAILABLE.to_string();
    }

    let lines: Vec<String> = publications
        .iter()
        .filter(|p| p.year >= RECENT_PUBLICATION_YEAR)
        .take(MAX_PROMPT_PUBLICATIONS)
        .map(|p| format!("{} ({}, {})", p.title, p.venue, p.year))
        .collect();

    if lines.is_empty() {
        NO_RECENT_PUBLICATIONS.to_string()
    } else {
        lines.join("\n")
    }
}

pub fn render_areas(areas: &[String]) -> String {
    if areas.is_empty() {
        AREAS_NOT_SPECIFIED.to_string()
    } else {
        areas.join(", ")
    }
}
