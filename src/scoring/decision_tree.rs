//! Staged YES/NO rubric: the answer path fixes the admissible score range.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionPath {
    /// Q1=YES, Q2=YES, Q3=YES
    PerfectMatch,
    /// Q1=YES, Q2=YES, Q3=NO
    StrongMatch,
    /// Q1=YES, Q2=NO
    GoodMatch,
    /// Q1=NO, Q4=YES, Q5=YES
    ModerateMatch,
    /// Q1=NO, Q4=YES, Q5=NO
    WeakMatch,
    /// Q1=NO, Q4=NO
    NoMatch,
}

impl DecisionPath {
    /// Walks the tree. Answers for questions off the taken path are ignored.
    pub fn from_answers(q1: bool, q2: bool, q3: bool, q4: bool, q5: bool) -> Self {
        match (q1, q2, q3, q4, q5) {
            (true, true, true, _, _) => Self::PerfectMatch,
            (true, true, false, _, _) => Self::StrongMatch,
            (true, false, _, _, _) => Self::GoodMatch,
            (false, _, _, true, true) => Self::ModerateMatch,
            (false, _, _, true, false) => Self::WeakMatch,
            (false, _, _, false, _) => Self::NoMatch,
        }
    }

    /// Reads `q1`..`q5` from a parsed completion. `None` unless `q1` is present.
    ///
    /// Only a case-insensitive `"YES"` counts as yes; `"NO"`, `"N/A"` and anything else
    /// count as no.
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let answer = |key: &str| match object.get(key) {
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("yes"),
            _ => false,
        };

        if !matches!(object.get("q1"), Some(Value::String(_))) {
            return None;
        }

        Some(Self::from_answers(
            answer("q1"),
            answer("q2"),
            answer("q3"),
            answer("q4"),
            answer("q5"),
        ))
    }

    /// Inclusive score range allowed for this path.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::PerfectMatch => (0.90, 1.00),
            Self::StrongMatch => (0.75, 0.89),
            Self::GoodMatch => (0.60, 0.74),
            Self::ModerateMatch => (0.40, 0.59),
            Self::WeakMatch => (0.20, 0.39),
            Self::NoMatch => (0.00, 0.19),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PerfectMatch => "Perfect Match",
            Self::StrongMatch => "Strong Match",
            Self::GoodMatch => "Good Match",
            Self::ModerateMatch => "Moderate Match",
            Self::WeakMatch => "Weak Match",
            Self::NoMatch => "No Match",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerfectMatch => "Q1=YES→Q2=YES→Q3=YES",
            Self::StrongMatch => "Q1=YES→Q2=YES→Q3=NO",
            Self::GoodMatch => "Q1=YES→Q2=NO",
            Self::ModerateMatch => "Q1=NO→Q4=YES→Q5=YES",
            Self::WeakMatch => "Q1=NO→Q4=YES→Q5=NO",
            Self::NoMatch => "Q1=NO→Q4=NO",
        }
    }

    /// Keeps `score` if it lies in range, otherwise returns the range midpoint.
    pub fn reconcile(&self, score: f64) -> f64 {
        let (min, max) = self.range();
        if (min..=max).contains(&score) {
            score
        } else {
            (min + max) / 2.0
        }
    }
}

impl std::fmt::Display for DecisionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.label())
    }
}
