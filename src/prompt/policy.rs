use serde::{Deserialize, Serialize};

/// Rubric family: `Strict` is tuned for small local models, `Basic` is the balanced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrictnessTier {
    #[default]
    Strict,
    Basic,
}

impl StrictnessTier {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Basic }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringScheme {
    /// Flat 0.0-1.0 rubric.
    #[default]
    Original,
    /// Staged YES/NO questions whose path fixes the score range.
    DecisionTree,
}

impl ScoringScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::DecisionTree => "decision_tree",
        }
    }
}

impl std::fmt::Display for ScoringScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which template pair a prompt is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PromptPolicy {
    pub strictness: StrictnessTier,
    pub scheme: ScoringScheme,
}

impl PromptPolicy {
    pub const fn new(strictness: StrictnessTier, scheme: ScoringScheme) -> Self {
        Self { strictness, scheme }
    }

    pub fn system_asset(&self) -> &'static str {
        match (self.strictness, self.scheme) {
            (StrictnessTier::Strict, ScoringScheme::Original) => "local-system-prompt.txt",
            (StrictnessTier::Strict, ScoringScheme::DecisionTree) => {
                "local-decision-tree-system-prompt.txt"
            }
            (StrictnessTier::Basic, ScoringScheme::Original) => "basic-system-prompt.txt",
            (StrictnessTier::Basic, ScoringScheme::DecisionTree) => {
                "decision-tree-system-prompt.txt"
            }
        }
    }

    pub fn user_asset(&self) -> &'static str {
        match (self.strictness, self.scheme) {
            (StrictnessTier::Strict, ScoringScheme::Original) => "local-user-prompt.txt",
            (StrictnessTier::Strict, ScoringScheme::DecisionTree) => {
                "local-decision-tree-user-prompt.txt"
            }
            (StrictnessTier::Basic, ScoringScheme::Original) => "basic-user-prompt.txt",
            (StrictnessTier::Basic, ScoringScheme::DecisionTree) => "decision-tree-user-prompt.txt",
        }
    }
}
