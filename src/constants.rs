//! Cross-cutting, shared constants.
//!
//! The placeholder strings below end up in API responses and rendered prompts. Clients
//! and audit tooling match on them, so treat them as part of the wire contract.

/// Oldest publication year that counts as "recent" in a prompt.
pub const RECENT_PUBLICATION_YEAR: i32 = 2020;
/// Publications rendered per professor after the recency filter.
pub const MAX_PROMPT_PUBLICATIONS: usize = 20;

/// Rendered when a professor has publications but none are recent.
pub const NO_RECENT_PUBLICATIONS: &str = "No recent publications (2020-2025)";
/// Rendered when a professor carries no publication data at all.
pub const PUBLICATIONS_NOT_AVAILABLE: &str = "Publication data not available";
/// Rendered when a professor lists no research areas.
pub const AREAS_NOT_SPECIFIED: &str = "Not specified";

/// Cap (in characters) on extracted reasoning and summary text.
pub const MAX_EXTRACTED_CHARS: usize = 200;
/// Shortest trimmed completion the validation gate accepts.
pub const MIN_RESPONSE_CHARS: usize = 20;

/// Reasoning placeholder when a completion carries a score but no reasoning.
pub const NO_REASONING_PROVIDED: &str = "No reasoning provided";
/// Reasoning placeholder for completions nothing could be extracted from.
pub const PARSE_FAILURE_REASONING: &str = "Parse error occurred";
/// Summary placeholder for completions nothing could be extracted from.
pub const PARSE_FAILURE_SUMMARY: &str = "Failed to extract response";

/// Default `score >= threshold` cut for counting a match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;
/// Default advisory batch size on the wire.
pub const DEFAULT_BATCH_SIZE: usize = 20;
