//! Errors raised while building a spell table.

use std::path::PathBuf;
use thiserror::Error;

/// Statement-level failures reported by the `spells.dat` loader and the
/// script tokenizer underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptErrorKind {
    #[error("illegal spell number {0}")]
    IllegalSpellNumber(i64),

    #[error("illegal template number {0}")]
    IllegalTemplate(i64),

    #[error("spell property before number")]
    PropertyBeforeNumber,

    #[error("unknown spell property '{0}'")]
    UnknownProperty(String),

    #[error("unknown spell syllable '{0}'")]
    UnknownSyllable(String),

    #[error("too many syllables in spell")]
    TooManySyllables,

    #[error("words block not closed before end of file")]
    UnterminatedWords,

    #[error("value {value} out of range for '{property}'")]
    NumberOutOfRange { property: String, value: i64 },

    #[error("{0} expected")]
    Expected(&'static str),

    #[error("'{0}' expected")]
    ExpectedSymbol(char),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("number too large")]
    NumberTooLarge,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
}

/// Failures of the syllable codec, independent of where the word came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("unknown spell syllable '{0}'")]
    UnknownSyllable(String),

    #[error("too many syllables in spell")]
    TooManySyllables,
}

impl From<WordError> for ScriptErrorKind {
    fn from(err: WordError) -> Self {
        match err {
            WordError::UnknownSyllable(name) => ScriptErrorKind::UnknownSyllable(name),
            WordError::TooManySyllables => ScriptErrorKind::TooManySyllables,
        }
    }
}

/// A spell table load that was rejected as a whole.
#[derive(Debug, Error)]
pub enum SpellError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin}:{line}: {kind}")]
    Script {
        origin: String,
        line: usize,
        kind: ScriptErrorKind,
    },

    #[error("builtin spell {number}: {kind}")]
    Seed { number: u16, kind: WordError },

    #[error("spell {number}: template {template} out of range")]
    TemplateOutOfRange { number: u16, template: u16 },

    #[error("spell {number}: template cycle {chain:?}")]
    TemplateCycle { number: u16, chain: Vec<u16> },

    #[error("spell registry lock poisoned")]
    LockPoisoned,
}

impl SpellError {
    pub fn script_kind(&self) -> Option<&ScriptErrorKind> {
        match self {
            SpellError::Script { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
