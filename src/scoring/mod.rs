//! Turning raw completions into [`EvaluationResult`]s.
//!
//! Two independent pieces:
//! - [`validate`]: a pure quality gate reporting why a completion looks degenerate;
//! - [`parse`] / [`parse_with_scheme`]: tiered extraction that always yields a result.
//!
//! Small local models rarely emit clean JSON, so extraction is deliberately lenient.
//! A rejected completion still goes through extraction; callers decide what a
//! [`RejectReason`] means for them.

pub mod decision_tree;
pub mod error;
pub mod extract;
pub mod types;
pub mod validate;


pub use decision_tree::DecisionPath;
pub use error::RejectReason;
pub use extract::{clean_text, normalize_score, parse, parse_with_scheme, strip_code_fences};
pub use types::{EvaluationResult, Extraction, ExtractionMethod};
pub use validate::{MAX_CHARACTER_RUN, is_valid, validate};
