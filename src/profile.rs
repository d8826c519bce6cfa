//! Researcher profiles as supplied by callers.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub year: i32,
    pub venue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One professor to evaluate. `areas` and `publicationList` may be absent or `null`.
pub struct ResearcherProfile {
    pub name: String,
    pub affiliation: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub areas: Vec<String>,
    #[serde(
        default,
        rename = "publicationList",
        deserialize_with = "null_as_empty"
    )]
    pub publications: Vec<Publication>,
}

impl ResearcherProfile {
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: affiliation.into(),
            areas: Vec::new(),
            publications: Vec::new(),
        }
    }

    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_publication(
        mut self,
        title: impl Into<String>,
        venue: impl Into<String>,
        year: i32,
    ) -> Self {
        self.publications.push(Publication {
            title: title.into(),
            year,
            venue: venue.into(),
        });
        self
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
