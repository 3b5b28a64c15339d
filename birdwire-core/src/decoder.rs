//! Single-pass JSON decoder.
//!
//! Converts a byte buffer straight into a [`Value`] tree with one forward
//! cursor and at most one byte of lookahead. No serde machinery is involved,
//! which keeps integer / float numbers apart exactly as they appear on the
//! wire (tweet IDs do not fit in an `f64`).
//!
//! # Key design decisions
//!
//! - **Separators as control flow**: after every collection element the
//!   decoder asks `read_separator` what comes next. A `,` answers
//!   `Separator::Next`, the matching closer answers `Separator::Close`.
//!   Both are ordinary return values, never errors, so genuine failures stay
//!   distinguishable from "end of collection".
//! - **Bulk string copies**: string bodies are copied run by run; a run is
//!   flushed only when a backslash escape interrupts it.
//! - **Escapes are decoded**: `\n`, `\"`, `\uXXXX` (with surrogate pairs) and
//!   friends become the characters they stand for.
//! - **Integer overflow** falls back to a float rather than failing the whole
//!   document.

use crate::value::{Map, Number, Value};

/// Maximum nesting of arrays and maps.
pub const MAX_DEPTH: usize = 512;

/// Bytes of context shown on either side of an unrecognized token.
const CONTEXT_WINDOW: usize = 10;

/// Errors that abort a decode. No partial value is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unrecognized token {found:?} at byte {offset}: {before}-->{found}<--{after}")]
    UnrecognizedToken {
        offset: usize,
        found: char,
        before: String,
        after: String,
    },
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("bad number character {found:?} at byte {offset}")]
    BadNumberCharacter { offset: usize, found: char },
    #[error("malformed number starting at byte {offset}")]
    MalformedNumber { offset: usize },
    #[error("expected {expected} at byte {offset}")]
    MissingSeparator { offset: usize, expected: &'static str },
    #[error("could not parse literal at byte {offset}")]
    BadLiteral { offset: usize },
    #[error("invalid escape sequence at byte {offset}")]
    InvalidEscape { offset: usize },
    #[error("invalid utf-8 in string starting at byte {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("trailing characters at byte {offset}")]
    TrailingCharacters { offset: usize },
    #[error("nesting deeper than {MAX_DEPTH} levels at byte {offset}")]
    TooDeep { offset: usize },
}

type Result<T> = std::result::Result<T, DecodeError>;

/// Decode exactly one JSON value from `data`.
///
/// Whitespace around the value is ignored; anything else after it is an
/// error.
pub fn decode(data: &[u8]) -> Result<Value> {
    let mut state = State { data, pos: 0 };
    state.skip_whitespace();
    let value = state.read_value(0)?;
    state.skip_whitespace();
    if state.pos < data.len() {
        return Err(DecodeError::TrailingCharacters { offset: state.pos });
    }
    Ok(value)
}

/// Convenience wrapper over [`decode`] for string input.
pub fn decode_str(text: &str) -> Result<Value> {
    decode(text.as_bytes())
}

/// What followed a collection element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    /// A `,`; another element follows.
    Next,
    /// The collection's closing bracket.
    Close,
}

struct State<'a> {
    data: &'a [u8],
    pos: usize,
}

impl State<'_> {
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn read_value(&mut self, depth: usize) -> Result<Value> {
        let Some(byte) = self.peek() else {
            return Err(DecodeError::UnexpectedEnd);
        };
        match byte {
            b'"' => self.read_string().map(Value::String),
            b'-' | b'0'..=b'9' => self.read_number().map(Value::Number),
            b'[' => self.read_array(depth + 1),
            b'{' => self.read_map(depth + 1),
            b't' | b'T' => self.read_literal(b"true", Value::Bool(true)),
            b'f' | b'F' => self.read_literal(b"false", Value::Bool(false)),
            b'n' | b'N' => self.read_literal(b"null", Value::Null),
            other => Err(self.unrecognized(other)),
        }
    }

    fn unrecognized(&self, byte: u8) -> DecodeError {
        let before = &self.data[self.pos.saturating_sub(CONTEXT_WINDOW)..self.pos];
        let after_end = (self.pos + 1 + CONTEXT_WINDOW).min(self.data.len());
        let after = &self.data[(self.pos + 1).min(after_end)..after_end];
        DecodeError::UnrecognizedToken {
            offset: self.pos,
            found: byte as char,
            before: String::from_utf8_lossy(before).into_owned(),
            after: String::from_utf8_lossy(after).into_owned(),
        }
    }

    fn read_literal(&mut self, word: &[u8], value: Value) -> Result<Value> {
        let end = self.pos + word.len();
        match self.data.get(self.pos..end) {
            Some(found) if found.eq_ignore_ascii_case(word) => {
                self.pos = end;
                Ok(value)
            }
            _ => Err(DecodeError::BadLiteral { offset: self.pos }),
        }
    }

    /// Reads a quoted string. The cursor sits on the opening quote.
    fn read_string(&mut self) -> Result<String> {
        let open = self.pos;
        self.pos += 1;
        let mut start = self.pos;
        let mut buf: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                None => return Err(DecodeError::UnterminatedString { offset: open }),
                Some(b'"') => break,
                Some(b'\\') => {
                    buf.extend_from_slice(&self.data[start..self.pos]);
                    self.read_escape(&mut buf, open)?;
                    start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
        let tail = &self.data[start..self.pos];
        self.pos += 1;
        let bytes = if buf.is_empty() {
            tail.to_vec()
        } else {
            buf.extend_from_slice(tail);
            buf
        };
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset: open })
    }

    /// Decodes one escape sequence into `buf`. The cursor sits on the
    /// backslash and ends just past the sequence.
    fn read_escape(&mut self, buf: &mut Vec<u8>, open: usize) -> Result<()> {
        let escape_at = self.pos;
        let Some(code) = self.data.get(self.pos + 1).copied() else {
            return Err(DecodeError::UnterminatedString { offset: open });
        };
        self.pos += 2;
        let decoded = match code {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{08}',
            b'f' => '\u{0c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.read_unicode_escape(escape_at)?,
            _ => return Err(DecodeError::InvalidEscape { offset: escape_at }),
        };
        let mut utf8 = [0u8; 4];
        buf.extend_from_slice(decoded.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    /// Reads the hex digits of a `\u` escape (the `\u` is already consumed),
    /// pulling in the low half of a surrogate pair when needed.
    fn read_unicode_escape(&mut self, escape_at: usize) -> Result<char> {
        let invalid = DecodeError::InvalidEscape { offset: escape_at };
        let high = self.read_hex4().ok_or_else(|| invalid.clone())?;
        let code_point = match high {
            0xD800..=0xDBFF => {
                if self.data.get(self.pos..self.pos + 2) != Some(b"\\u".as_slice()) {
                    return Err(invalid);
                }
                self.pos += 2;
                let low = self.read_hex4().ok_or_else(|| invalid.clone())?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(invalid);
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(invalid),
            _ => high,
        };
        char::from_u32(code_point).ok_or(invalid)
    }

    fn read_hex4(&mut self) -> Option<u32> {
        let digits = self.data.get(self.pos..self.pos + 4)?;
        let text = std::str::from_utf8(digits).ok()?;
        let value = u32::from_str_radix(text, 16).ok()?;
        self.pos += 4;
        Some(value)
    }

    /// Reads a number token. Integers accumulate in an `i64`; a `.` or an
    /// exponent switches to float mode, where the token text is handed to
    /// the standard float parser for correct rounding. Floats beyond the
    /// `f64` range are rejected.
    fn read_number(&mut self) -> Result<Number> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        let mut int = Some(0i64);
        let mut float_mode = false;
        let mut digits = 0usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' => {
                    if !float_mode {
                        let digit = i64::from(byte - b'0');
                        int = int.and_then(|v| v.checked_mul(10)).and_then(|v| {
                            if negative {
                                v.checked_sub(digit)
                            } else {
                                v.checked_add(digit)
                            }
                        });
                    }
                    digits += 1;
                }
                b'.' | b'e' | b'E' => float_mode = true,
                b'+' | b'-' if matches!(self.data[self.pos - 1], b'e' | b'E') => {}
                b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r' => break,
                other => {
                    return Err(DecodeError::BadNumberCharacter {
                        offset: self.pos,
                        found: other as char,
                    });
                }
            }
            self.pos += 1;
        }
        if digits == 0 {
            return match self.peek() {
                None => Err(DecodeError::UnexpectedEnd),
                Some(other) => Err(DecodeError::BadNumberCharacter {
                    offset: self.pos,
                    found: other as char,
                }),
            };
        }
        match int {
            Some(v) if !float_mode => Ok(Number::Int(v)),
            _ => {
                // Only ASCII digits, signs, '.', 'e' reach here.
                let text = std::str::from_utf8(&self.data[start..self.pos])
                    .map_err(|_| DecodeError::MalformedNumber { offset: start })?;
                // Out-of-range magnitudes parse to infinity, which has no
                // JSON rendering.
                match text.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(Number::Float(v)),
                    _ => Err(DecodeError::MalformedNumber { offset: start }),
                }
            }
        }
    }

    /// Reads `,` or `closer`, skipping whitespace before it.
    fn read_separator(&mut self, closer: u8) -> Result<Separator> {
        self.skip_whitespace();
        match self.peek() {
            Some(b',') => {
                self.pos += 1;
                Ok(Separator::Next)
            }
            Some(byte) if byte == closer => {
                self.pos += 1;
                Ok(Separator::Close)
            }
            Some(_) => Err(DecodeError::MissingSeparator {
                offset: self.pos,
                expected: if closer == b']' { "',' or ']'" } else { "',' or '}'" },
            }),
            None => Err(DecodeError::UnexpectedEnd),
        }
    }

    fn enter(&mut self, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep { offset: self.pos });
        }
        // Step over the opening bracket.
        self.pos += 1;
        self.skip_whitespace();
        Ok(())
    }

    fn read_array(&mut self, depth: usize) -> Result<Value> {
        self.enter(depth)?;
        let mut items = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.read_value(depth)?);
            match self.read_separator(b']')? {
                Separator::Next => continue,
                Separator::Close => break,
            }
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, depth: usize) -> Result<Value> {
        self.enter(depth)?;
        let mut map = Map::new();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Map(map));
        }
        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some(b'"') => self.read_string()?,
                Some(other) => return Err(self.unrecognized(other)),
                None => return Err(DecodeError::UnexpectedEnd),
            };
            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.pos += 1,
                Some(_) => {
                    return Err(DecodeError::MissingSeparator {
                        offset: self.pos,
                        expected: "':'",
                    });
                }
                None => return Err(DecodeError::UnexpectedEnd),
            }
            self.skip_whitespace();
            let value = self.read_value(depth)?;
            map.insert(key, value);
            match self.read_separator(b'}')? {
                Separator::Next => continue,
                Separator::Close => break,
            }
        }
        Ok(Value::Map(map))
    }
}
