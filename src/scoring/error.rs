use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Why the validation gate rejected a completion.
pub enum RejectReason {
    #[error("empty or whitespace-only response")]
    Empty,

    #[error("output too short ({len} characters)")]
    TooShort { len: usize },

    #[error("output is only asterisks")]
    AllAsterisks,

    #[error("output starts with a run of special characters")]
    SymbolRun,

    #[error("character {ch:?} repeated {run} times")]
    RepeatedCharacter { ch: char, run: usize },

    #[error("output is an error message ({word})")]
    ErrorPreamble { word: &'static str },

    #[error("no score found in output")]
    NoScore,
}
