use crate::error::WordError;
use serde::ser::{Serialize, SerializeSeq, Serializer};

pub const MAX_SPELL_SYLLABLES: usize = 10;

/// Syllables a spoken spell is composed of. Slot 0 and the trailing slots
/// are reserved and never match a lookup.
pub const SPELL_SYLLABLES: [&str; 51] = [
    "", "al", "ad", "ex", "ut", "om", "para", "ana", "evo", "ori", "mort", "lux", "liber",
    "vita", "flam", "pox", "hur", "moe", "ani", "ina", "eta", "amo", "hora", "gran", "cogni",
    "res", "mas", "vis", "som", "aqua", "frigo", "tera", "ura", "sio", "grav", "ito", "pan",
    "vid", "isa", "iva", "con", "", "", "", "", "", "", "", "", "", "",
];

/// Free-text argument slot ("exiva \"name\"").
pub const PARAMETER_SYLLABLE: u8 = 6;

pub fn find_syllable(name: &str) -> Option<u8> {
    if name.is_empty() {
        return None;
    }
    SPELL_SYLLABLES
        .iter()
        .position(|syllable| *syllable == name)
        .map(|index| index as u8)
}

pub fn syllable_name(index: u8) -> &'static str {
    SPELL_SYLLABLES
        .get(usize::from(index))
        .copied()
        .unwrap_or("")
}

/// The spoken invocation of a spell as syllable indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpellWord {
    syllables: [u8; MAX_SPELL_SYLLABLES],
    len: u8,
}

impl SpellWord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, WordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut word = SpellWord::new();
        for name in names {
            word.push_name(name.as_ref())?;
        }
        Ok(word)
    }

    pub fn push_name(&mut self, name: &str) -> Result<(), WordError> {
        let index =
            find_syllable(name).ok_or_else(|| WordError::UnknownSyllable(name.to_string()))?;
        self.push(index)
    }

    pub fn push(&mut self, index: u8) -> Result<(), WordError> {
        let len = usize::from(self.len);
        if len >= MAX_SPELL_SYLLABLES {
            return Err(WordError::TooManySyllables);
        }
        self.syllables[len] = index;
        self.len += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.syllables[..usize::from(self.len)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.as_slice().iter().map(|index| syllable_name(*index))
    }

    /// Renders the word the way a player says it: the first two syllables
    /// are joined, every following syllable is a separate token.
    pub fn spoken(&self) -> String {
        let mut out = String::new();
        for (position, name) in self.names().enumerate() {
            if position >= 2 {
                out.push(' ');
            }
            out.push_str(name);
        }
        out
    }
}

impl Serialize for SpellWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for name in self.names() {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

/// Splits typed input ("exura gran", "exuragran", "exiva \"Bob\"") into
/// syllables. Quoted tokens and unmatched remainders become
/// [`PARAMETER_SYLLABLE`]; anything past the word capacity is dropped.
pub fn parse_spoken_words(input: &str) -> SpellWord {
    let mut word = SpellWord::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.peek().copied() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch == '"' {
            chars.next();
            for next in chars.by_ref() {
                if next == '"' {
                    break;
                }
            }
            if word.push(PARAMETER_SYLLABLE).is_err() {
                break;
            }
            continue;
        }
        let mut token = String::new();
        while let Some(next) = chars.peek().copied() {
            if next.is_whitespace() {
                break;
            }
            token.push(next);
            chars.next();
        }
        if !append_token_syllables(&token, &mut word) {
            break;
        }
    }
    word
}

fn append_token_syllables(token: &str, word: &mut SpellWord) -> bool {
    let lowered = token.to_ascii_lowercase();
    let mut remaining = lowered.as_str();
    while !remaining.is_empty() {
        let mut matched: Option<(u8, usize)> = None;
        for (index, syllable) in SPELL_SYLLABLES.iter().enumerate() {
            if syllable.is_empty() || !remaining.starts_with(syllable) {
                continue;
            }
            if matched.map_or(true, |(_, best)| syllable.len() > best) {
                matched = Some((index as u8, syllable.len()));
            }
        }
        let Some((index, len)) = matched else {
            return word.push(PARAMETER_SYLLABLE).is_ok();
        };
        if word.push(index).is_err() {
            return false;
        }
        remaining = &remaining[len..];
    }
    true
}
