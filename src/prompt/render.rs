//! Placeholder substitution over `{{key}}` markers.

use crate::profile::ResearcherProfile;

pub const PROFESSOR_NAME: &str = "professor.name";
pub const PROFESSOR_AFFILIATION: &str = "professor.affiliation";
pub const PROFESSOR_AREAS: &str = "professor.areas";
pub const PUBLICATIONS: &str = "publications";
pub const RESEARCH_DIRECTION: &str = "researchDirection";

/// Key/value pairs substituted into a template.
///
/// Rendering makes one left-to-right pass, so substituted values are never rescanned
/// for markers. Unknown markers are copied through unchanged.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTable {
    entries: Vec<(&'static str, String)>,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for one professor; publications and areas must already be rendered.
    pub fn for_profile(
        profile: &ResearcherProfile,
        areas: String,
        publications: String,
        research_direction: &str,
    ) -> Self {
        Self::new()
            .with(PROFESSOR_NAME, profile.name.clone())
            .with(PROFESSOR_AFFILIATION, profile.affiliation.clone())
            .with(PROFESSOR_AREAS, areas)
            .with(PUBLICATIONS, publications)
            .with(RESEARCH_DIRECTION, research_direction.to_string())
    }

    /// Adds or replaces a value.
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];

            let Some(close) = after.find("}}") else {
                out.push_str(&rest[open..]);
                return out;
            };

            match self.get(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 2..];
                }
                None => {
                    // Keep scanning inside: "{{ {{publications}}" still resolves the inner marker.
                    out.push_str("{{");
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}
