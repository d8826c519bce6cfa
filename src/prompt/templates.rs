//! Prompt asset sources and the cached template store.

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use moka::sync::Cache;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::error::{TemplateError, TemplateResult};
use super::policy::ScoringScheme;

/// Where prompt assets come from.
pub trait TemplateSource: Send + Sync {
    /// Returns the raw text of the named asset.
    fn read(&self, name: &str) -> TemplateResult<String>;
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirTemplateSource {
    root: PathBuf,
}

impl DirTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirTemplateSource {
    fn read(&self, name: &str) -> TemplateResult<String> {
        std::fs::read_to_string(self.root.join(name)).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                TemplateError::Missing {
                    name: name.to_string(),
                }
            } else {
                TemplateError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }
}

/// In-memory assets. An empty source makes every lookup fall back.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateSource {
    assets: HashMap<String, String>,
}

impl StaticTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.assets.insert(name.into(), body.into());
        self
    }
}

impl TemplateSource for StaticTemplateSource {
    fn read(&self, name: &str) -> TemplateResult<String> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::Missing {
                name: name.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRole {
    System,
    User,
}

/// Built-in template used when an asset cannot be read.
pub fn fallback_template(scheme: ScoringScheme, role: TemplateRole) -> &'static str {
    match (scheme, role) {
        (ScoringScheme::Original, TemplateRole::System) => FALLBACK_SYSTEM,
        (ScoringScheme::Original, TemplateRole::User) => FALLBACK_USER,
        (ScoringScheme::DecisionTree, TemplateRole::System) => FALLBACK_DECISION_TREE_SYSTEM,
        (ScoringScheme::DecisionTree, TemplateRole::User) => FALLBACK_DECISION_TREE_USER,
    }
}

/// Caches asset text by name. Assets the source could not provide are not cached, so a
/// file added later is picked up on the next build.
pub struct TemplateStore {
    source: Arc<dyn TemplateSource>,
    cache: Cache<String, Arc<str>>,
    warned: Mutex<HashSet<String>>,
}

impl TemplateStore {
    const MAX_ASSETS: u64 = 64;

    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        Self {
            source,
            cache: Cache::builder().max_capacity(Self::MAX_ASSETS).build(),
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the asset text, or `fallback` if the source cannot provide it.
    pub fn get(&self, name: &str, fallback: &'static str) -> Arc<str> {
        let loaded = self.cache.try_get_with(name.to_string(), || {
            self.source.read(name).map(|body| {
                debug!(asset = name, bytes = body.len(), "Loaded prompt asset");
                self.warned.lock().remove(name);
                Arc::<str>::from(body)
            })
        });

        match loaded {
            Ok(body) => body,
            Err(e) => {
                if self.warned.lock().insert(name.to_string()) {
                    warn!(asset = name, error = %e, "Prompt asset unavailable, using built-in fallback");
                }
                Arc::from(fallback)
            }
        }
    }

    /// Drops cached assets so the next lookup rereads the source.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn cached_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

const FALLBACK_SYSTEM: &str = "You are an objective academic research evaluator.

CORE MISSION:
Evaluate how well a professor's research profile matches a given research direction.
Output a match score between 0.0 and 1.0.

UNIVERSAL RULES:
1. Be objective - base your evaluation ONLY on the provided evidence
2. Consider research area alignment AND publication activity
3. Recent papers (2023-2025) are more valuable than older work
4. Be STRICT - most professors should score 0.3-0.7
5. Only truly exceptional matches should exceed 0.8

CRITICAL: Do NOT give high scores easily. Be selective and critical.";

const FALLBACK_USER: &str = "Professor: {{professor.name}}
Institution: {{professor.affiliation}}
Research Areas: {{professor.areas}}
Recent Publications: {{publications}}

Target Research Direction: {{researchDirection}}

Evaluate match score (0.0-1.0) and provide reasoning.
Be STRICT in scoring. Most matches should be 0.3-0.7.

Respond with JSON only:
{\"score\": 0.XX, \"reasoning\": \"...\", \"research_summary\": \"...\"}";

const FALLBACK_DECISION_TREE_SYSTEM: &str = "You are an academic research evaluator using a binary decision tree methodology.

Answer YES/NO questions objectively to determine research alignment.
1. Base your answers ONLY on the provided data
2. Follow the decision tree strictly - previous answers determine which questions apply
3. The decision path determines the score range";

const FALLBACK_DECISION_TREE_USER: &str = "Professor: {{professor.name}}
Institution: {{professor.affiliation}}
Research Areas: {{professor.areas}}
Recent Publications (2020-2025):
{{publications}}

Target Research Direction:
{{researchDirection}}

Q1: Is the professor's PRIMARY research area directly related to the target direction?
Q2 (if Q1=YES): Does the professor have 2 or more publications from 2024-2025 in this direction?
Q3 (if Q2=YES): Is this direction more than half of their work?
Q4 (if Q1=NO): Is their research significantly related (shared techniques, methods, applications)?
Q5 (if Q4=YES): Do they have ANY publications in this direction?

Score ranges:
- Q1=YES, Q2=YES, Q3=YES -> 0.90-1.00
- Q1=YES, Q2=YES, Q3=NO -> 0.75-0.89
- Q1=YES, Q2=NO -> 0.60-0.74
- Q1=NO, Q4=YES, Q5=YES -> 0.40-0.59
- Q1=NO, Q4=YES, Q5=NO -> 0.20-0.39
- Q1=NO, Q4=NO -> 0.00-0.19

Respond with JSON only, using N/A for questions that do not apply:
{\"q1\": \"YES|NO\", \"q2\": \"YES|NO|N/A\", \"q3\": \"YES|NO|N/A\", \"q4\": \"YES|NO|N/A\", \"q5\": \"YES|NO|N/A\", \"score\": 0.XX, \"reasoning\": \"...\", \"research_summary\": \"...\"}";
