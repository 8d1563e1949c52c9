use crate::error::{ScriptErrorKind, SpellError};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Identifier(String),
    Number(i64),
    String(String),
    Special(char),
    EndOfFile,
}

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Tokenizer for the game's `key = value` data files. `#` starts a comment
/// that runs to the end of the line.
pub struct ScriptReader<'a> {
    origin: String,
    chars: Peekable<Chars<'a>>,
    line: usize,
    token_line: usize,
}

impl<'a> ScriptReader<'a> {
    pub fn new(origin: impl Into<String>, content: &'a str) -> Self {
        Self {
            origin: origin.into(),
            chars: content.chars().peekable(),
            line: 1,
            token_line: 1,
        }
    }

    /// Line on which the most recently read token started.
    pub fn line(&self) -> usize {
        self.token_line
    }

    pub fn error(&self, kind: ScriptErrorKind) -> SpellError {
        SpellError::Script {
            origin: self.origin.clone(),
            line: self.token_line,
            kind,
        }
    }

    pub fn next_token(&mut self) -> Result<Token, SpellError> {
        self.skip_blank();
        self.token_line = self.line;
        let Some(ch) = self.chars.peek().copied() else {
            return Ok(Token::EndOfFile);
        };
        if ch == '"' {
            self.chars.next();
            return self.lex_string().map(Token::String);
        }
        if ch.is_ascii_digit() {
            return self.lex_number(false).map(Token::Number);
        }
        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(Token::Identifier(self.lex_identifier()));
        }
        self.chars.next();
        if ch == '-' && self.chars.peek().is_some_and(|next| next.is_ascii_digit()) {
            return self.lex_number(true).map(Token::Number);
        }
        if ch.is_control() {
            return Err(self.error(ScriptErrorKind::UnexpectedCharacter(ch)));
        }
        Ok(Token::Special(ch))
    }

    pub fn read_identifier(&mut self) -> Result<String, SpellError> {
        match self.next_token()? {
            Token::Identifier(name) => Ok(name),
            _ => Err(self.error(ScriptErrorKind::Expected("identifier"))),
        }
    }

    pub fn read_number(&mut self) -> Result<i64, SpellError> {
        match self.next_token()? {
            Token::Number(value) => Ok(value),
            _ => Err(self.error(ScriptErrorKind::Expected("number"))),
        }
    }

    pub fn read_string(&mut self) -> Result<String, SpellError> {
        match self.next_token()? {
            Token::String(text) => Ok(text),
            _ => Err(self.error(ScriptErrorKind::Expected("string"))),
        }
    }

    pub fn read_symbol(&mut self, symbol: char) -> Result<(), SpellError> {
        match self.next_token()? {
            Token::Special(ch) if ch == symbol => Ok(()),
            _ => Err(self.error(ScriptErrorKind::ExpectedSymbol(symbol))),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_blank(&mut self) {
        while let Some(ch) = self.chars.peek().copied() {
            if ch == '#' {
                while let Some(next) = self.bump() {
                    if next == '\n' {
                        break;
                    }
                }
            } else if ch.is_whitespace() || ch == BYTE_ORDER_MARK {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn lex_identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.chars.peek().copied() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            name.push(ch);
            self.chars.next();
        }
        name
    }

    fn lex_number(&mut self, negative: bool) -> Result<i64, SpellError> {
        let mut value: i64 = 0;
        while let Some(ch) = self.chars.peek().copied() {
            let Some(digit) = ch.to_digit(10) else {
                break;
            };
            self.chars.next();
            value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add(i64::from(digit)))
                .ok_or_else(|| self.error(ScriptErrorKind::NumberTooLarge))?;
        }
        Ok(if negative { -value } else { value })
    }

    fn lex_string(&mut self) -> Result<String, SpellError> {
        let mut text = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(self.error(ScriptErrorKind::UnterminatedString));
            };
            match ch {
                '"' => return Ok(text),
                '\\' => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some(other) => text.push(other),
                    None => return Err(self.error(ScriptErrorKind::UnterminatedString)),
                },
                '\n' => return Err(self.error(ScriptErrorKind::UnterminatedString)),
                _ => text.push(ch),
            }
        }
    }
}

/// Reads a data file, decoding lossily if it is not valid UTF-8.
pub fn read_script_text(path: &Path) -> Result<String, SpellError> {
    let bytes = std::fs::read(path).map_err(|source| SpellError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            eprintln!(
                "tibia: {} contained invalid UTF-8; decoding lossy",
                path.display()
            );
            String::from_utf8_lossy(&err.into_bytes()).into_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(content: &str) -> Vec<Token> {
        let mut reader = ScriptReader::new("test", content);
        let mut out = Vec::new();
        loop {
            let token = reader.next_token().expect("token");
            if token == Token::EndOfFile {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn next_token_splits_statement() {
        assert_eq!(
            tokens("mana = -25 comment = \"Light \\\"Healing\\\"\""),
            vec![
                Token::Identifier("mana".to_string()),
                Token::Special('='),
                Token::Number(-25),
                Token::Identifier("comment".to_string()),
                Token::Special('='),
                Token::String("Light \"Healing\"".to_string()),
            ]
        );
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let mut reader = ScriptReader::new("test", "# header\n\n  number # trailing\n= 3");
        assert_eq!(reader.read_identifier().unwrap(), "number");
        assert_eq!(reader.line(), 3);
        reader.read_symbol('=').unwrap();
        assert_eq!(reader.read_number().unwrap(), 3);
        assert_eq!(reader.line(), 4);
        assert_eq!(reader.next_token().unwrap(), Token::EndOfFile);
    }

    #[test]
    fn unterminated_string_reports_line() {
        let mut reader = ScriptReader::new("spells.dat", "\ncomment = \"open");
        reader.read_identifier().unwrap();
        reader.read_symbol('=').unwrap();
        let err = reader.read_string().unwrap_err();
        assert_eq!(err.script_kind(), Some(&ScriptErrorKind::UnterminatedString));
        assert_eq!(err.to_string(), "spells.dat:2: unterminated string");
    }

    #[test]
    fn read_symbol_rejects_other_tokens() {
        let mut reader = ScriptReader::new("test", "mana 5");
        reader.read_identifier().unwrap();
        let err = reader.read_symbol('=').unwrap_err();
        assert_eq!(err.script_kind(), Some(&ScriptErrorKind::ExpectedSymbol('=')));
    }

    #[test]
    fn oversized_number_is_rejected() {
        let mut reader = ScriptReader::new("test", "99999999999999999999");
        let err = reader.read_number().unwrap_err();
        assert_eq!(err.script_kind(), Some(&ScriptErrorKind::NumberTooLarge));
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let mut reader = ScriptReader::new("spells.dat", "\u{feff}number = 1 comment = \"A\"");
        assert_eq!(reader.read_identifier().unwrap(), "number");
        assert_eq!(reader.line(), 1);
        reader.read_symbol('=').unwrap();
        assert_eq!(reader.read_number().unwrap(), 1);
    }
}
