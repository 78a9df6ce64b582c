// local imports
use crate::error::{Error, ErrorKind, MakeError, Result};


// ---

/// In-band terminator appended to the input so scan loops need no bounds
/// checks. U+10FFFF is a permanent noncharacter and never appears in
/// well-formed log text.
pub(crate) const SENTINEL: char = '\u{10FFFF}';

// ---

/// A single character-class check. Classes are ordered sequences of
/// checks; a rune matches a class when any check accepts it.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Check {
    Whitespace,
    Digit,
    HexDigit,
    Rune(char),
}

impl Check {
    #[inline]
    fn matches(&self, rune: char) -> bool {
        match self {
            Self::Whitespace => rune.is_whitespace(),
            Self::Digit => rune.is_numeric(),
            Self::HexDigit => rune.is_ascii_hexdigit(),
            Self::Rune(r) => rune == *r,
        }
    }
}

#[inline]
pub(crate) fn check(rune: char, checks: &[Check]) -> bool {
    checks.iter().any(|c| c.matches(rune))
}

pub(crate) const WHITESPACE: &[Check] = &[Check::Whitespace];

const NUMBER_BODY: &[Check] = &[
    Check::Digit,
    Check::Rune('.'),
    Check::Rune('+'),
    Check::Rune('-'),
    Check::Rune('e'),
    Check::Rune('E'),
];

const JSON_IDENTIFIER: &[Check] = &[
    Check::Rune('$'),
    Check::Rune('_'),
    Check::Rune('.'),
    Check::Rune('*'),
];

// ---

/// Cursor is a scan position over the runes of a single log line.
///
/// The rune sequence is immutable once built; only the position moves.
/// Every capture is a snapshot by index range, and explicit backtracking
/// is done by saving and restoring the position.
pub(crate) struct Cursor {
    runes: Vec<char>,
    position: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        let mut runes: Vec<char> = input.chars().collect();
        runes.push(SENTINEL);
        Self { runes, position: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// The rune at an absolute index; past-the-end reads as the sentinel.
    #[inline]
    pub fn rune_at(&self, index: usize) -> char {
        self.runes.get(index).copied().unwrap_or(SENTINEL)
    }

    #[inline]
    pub fn lookahead(&self, offset: usize) -> char {
        self.rune_at(self.position + offset)
    }

    #[inline]
    pub fn advance(&mut self) -> char {
        let rune = self.rune_at(self.position);
        self.position += 1;
        rune
    }

    pub fn expect(&mut self, expected: char) -> Result<()> {
        let at = self.position;
        let found = self.advance();
        if found != expected {
            return Err(Error::new(ErrorKind::ExpectedLiteral { expected, found }, at));
        }
        Ok(())
    }

    pub fn eat_whitespace(&mut self) {
        while self.rune_at(self.position).is_whitespace() {
            self.position += 1;
        }
    }

    /// True when the runes starting at `start` spell out `pattern`.
    pub fn match_ahead(&self, start: usize, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, rune)| self.rune_at(start + i) == rune)
    }

    #[inline]
    pub fn capture(&self, start: usize, end: usize) -> String {
        self.runes[start..end].iter().collect()
    }

    /// Consumes runes until one matches the class, leaving the position
    /// on the terminator. Reaching the sentinel first is an error.
    pub fn read_until(&mut self, until: &[Check]) -> Result<String> {
        let start = self.position;
        let mut end = start;
        while self.rune_at(end) != SENTINEL && !check(self.rune_at(end), until) {
            end += 1;
        }
        if self.rune_at(end) == SENTINEL {
            return Err(self.make_error(ErrorKind::UnexpectedEnd));
        }
        self.position = end;
        Ok(self.capture(start, end))
    }

    /// Consumes runes until the given rune, leaving the position on it.
    /// Reaching the sentinel first is an error unless the sentinel is
    /// itself the target.
    pub fn read_until_rune(&mut self, until: char) -> Result<String> {
        let start = self.position;
        let mut end = start;
        while self.rune_at(end) != until && self.rune_at(end) != SENTINEL {
            end += 1;
        }
        if self.rune_at(end) == SENTINEL && until != SENTINEL {
            return Err(self.make_error(ErrorKind::UnexpectedEnd));
        }
        self.position = end;
        Ok(self.capture(start, end))
    }

    /// Consumes runes while they match the class. A run that reaches the
    /// sentinel is an error; a run stopped by a non-matching rune is not.
    pub fn read_while(&mut self, checks: &[Check]) -> Result<String> {
        let start = self.position;
        let mut end = start;
        while self.rune_at(end) != SENTINEL && check(self.rune_at(end), checks) {
            end += 1;
        }
        if self.rune_at(end) == SENTINEL {
            return Err(self.make_error(ErrorKind::UnexpectedEnd));
        }
        self.position = end;
        Ok(self.capture(start, end))
    }

    /// Reads a whitespace-terminated identifier of letters only.
    pub fn read_alpha_identifier(&mut self) -> Result<String> {
        let start = self.position;
        let mut end = start;
        while !self.rune_at(end).is_whitespace() && self.rune_at(end) != SENTINEL {
            if !self.rune_at(end).is_alphabetic() {
                return Err(Error::new(
                    ErrorKind::IllegalIdentifierRune(self.rune_at(end)),
                    end,
                ));
            }
            end += 1;
        }
        self.position = end;
        Ok(self.capture(start, end))
    }

    /// Reads a whitespace-terminated identifier of uppercase letters,
    /// digits and underscores, as used by plan-summary stage names.
    pub fn read_upcase_identifier(&mut self) -> Result<String> {
        let start = self.position;
        let mut end = start;
        while !self.rune_at(end).is_whitespace() && self.rune_at(end) != SENTINEL {
            let rune = self.rune_at(end);
            if rune != '_' && !rune.is_numeric() && !(rune.is_alphabetic() && rune.is_uppercase()) {
                return Err(Error::new(ErrorKind::IllegalIdentifierRune(rune), end));
            }
            end += 1;
        }
        self.position = end;
        Ok(self.capture(start, end))
    }

    /// Reads a run of document-key runes. An empty result is legal and
    /// means "no key here".
    pub fn read_json_identifier(&mut self) -> String {
        let start = self.position;
        let mut end = start;
        loop {
            let rune = self.rune_at(end);
            if rune == SENTINEL
                || !(rune.is_alphabetic() || rune.is_numeric() || check(rune, JSON_IDENTIFIER))
            {
                break;
            }
            end += 1;
        }
        self.position = end;
        self.capture(start, end)
    }

    /// Reads a numeric literal as a double. The accepted shape is
    /// permissive; conversion decides validity. A run terminated by the
    /// sentinel is an error because every operation line continues past
    /// its numbers.
    pub fn read_number(&mut self) -> Result<f64> {
        let start = self.position;
        let mut end = start;
        while check(self.rune_at(end), NUMBER_BODY) {
            end += 1;
        }
        if self.rune_at(end) == SENTINEL {
            return Err(self.make_error(ErrorKind::UnexpectedEnd));
        }
        self.position = end;
        let text = self.capture(start, end);
        text.parse::<f64>()
            .map_err(|_| Error::new(ErrorKind::MalformedNumber(text), start))
    }

    /// Reads a trailing duration: a run of digits immediately followed by
    /// the literal `ms`. Leaves the position past the suffix.
    pub fn read_duration(&mut self) -> Result<f64> {
        let start = self.position;
        let mut end = start;
        while self.rune_at(end).is_numeric() {
            end += 1;
        }
        if end == start || self.rune_at(end) != 'm' || self.rune_at(end + 1) != 's' {
            return Err(Error::new(ErrorKind::InvalidDuration, start));
        }
        let text = self.capture(start, end);
        self.position = end + 2;
        text.parse::<f64>()
            .map_err(|_| Error::new(ErrorKind::MalformedNumber(text), start))
    }
}

impl MakeError for Cursor {
    #[inline]
    fn make_error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.position)
    }
}
