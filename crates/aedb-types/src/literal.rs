//! Decoding of literal text stored in global-info tables.
//!
//! Only literal syntax is accepted: numbers, quoted strings and byte strings,
//! `True`/`False`/`None`, and list/tuple/set/dict displays built from those.
//! Names, operators (other than a sign on a number) and calls are rejected.

use crate::Value;

const MAX_DEPTH: usize = 64;

/// Parse `text` as a literal. Returns `None` if it is not one.
pub fn parse_literal(text: &str) -> Option<Value> {
    let mut parser = Parser::new(text);
    let value = parser.top_level()?;
    parser.skip_ws();
    parser.at_end().then_some(value)
}

/// Parse `text` as a literal, falling back to the raw text as a string.
pub fn decode_literal(text: &str) -> Value {
    parse_literal(text).unwrap_or_else(|| Value::Str(text.to_string()))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

enum StrKind {
    Text,
    Bytes,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r' | '\x0c')) {
            self.pos += 1;
        }
    }

    /// A bare comma-separated sequence at the top level is a tuple.
    fn top_level(&mut self) -> Option<Value> {
        let first = self.expr()?;
        self.skip_ws();
        if !self.eat(',') {
            return Some(first);
        }

        let mut items = vec![first];
        loop {
            self.skip_ws();
            if self.at_end() {
                break;
            }
            items.push(self.expr()?);
            self.skip_ws();
            if !self.eat(',') {
                break;
            }
        }
        Some(Value::Tuple(items))
    }

    fn expr(&mut self) -> Option<Value> {
        self.skip_ws();
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = self.expr_inner();
        self.depth -= 1;
        value
    }

    fn expr_inner(&mut self) -> Option<Value> {
        match self.peek()? {
            '[' => {
                self.bump();
                self.sequence(']').map(Value::List)
            }
            '(' => self.parenthesized(),
            '{' => self.braced(),
            '\'' | '"' => self.strings(),
            '+' | '-' => self.signed_number(),
            c if c.is_ascii_digit() => self.number(),
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.number(),
            c if c.is_alphabetic() || c == '_' => self.name_or_prefixed_string(),
            _ => None,
        }
    }

    /// Items up to `close`, allowing one trailing comma.
    fn sequence(&mut self, close: char) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some(items);
            }
            items.push(self.expr()?);
            self.skip_ws();
            if self.eat(close) {
                return Some(items);
            }
            if !self.eat(',') {
                return None;
            }
        }
    }

    fn parenthesized(&mut self) -> Option<Value> {
        self.bump();
        self.skip_ws();
        if self.eat(')') {
            return Some(Value::Tuple(Vec::new()));
        }

        let first = self.expr()?;
        self.skip_ws();
        if self.eat(')') {
            return Some(first);
        }
        if !self.eat(',') {
            return None;
        }
        let mut items = vec![first];
        items.extend(self.sequence(')')?);
        Some(Value::Tuple(items))
    }

    fn braced(&mut self) -> Option<Value> {
        self.bump();
        self.skip_ws();
        if self.eat('}') {
            return Some(Value::Dict(Vec::new()));
        }

        let first = self.expr()?;
        self.skip_ws();
        if !self.eat(':') {
            let mut items = vec![first];
            if self.eat('}') {
                return Some(Value::Set(items));
            }
            if !self.eat(',') {
                return None;
            }
            items.extend(self.sequence('}')?);
            return Some(Value::Set(items));
        }

        let mut pairs = vec![(first, self.expr()?)];
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Some(Value::Dict(pairs));
            }
            if !self.eat(',') {
                return None;
            }
            self.skip_ws();
            if self.eat('}') {
                return Some(Value::Dict(pairs));
            }
            let key = self.expr()?;
            self.skip_ws();
            if !self.eat(':') {
                return None;
            }
            pairs.push((key, self.expr()?));
        }
    }

    fn signed_number(&mut self) -> Option<Value> {
        let negative = self.bump()? == '-';
        self.skip_ws();
        let starts_number = match self.peek()? {
            c if c.is_ascii_digit() => true,
            '.' => self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        if !starts_number {
            return None;
        }

        match self.number()? {
            Value::Int(i) if negative => i.checked_neg().map(Value::Int),
            Value::Float(x) if negative => Some(Value::Float(-x)),
            value => Some(value),
        }
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        let radix_prefixed = matches!(
            (self.peek(), self.peek_nth(1)),
            (Some('0'), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        );
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign =
                matches!(c, '+' | '-') && matches!(prev, 'e' | 'E') && !radix_prefixed;
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign) {
                break;
            }
            prev = c;
            self.pos += 1;
        }
        number_token(&self.src[start..self.pos])
    }

    fn name_or_prefixed_string(&mut self) -> Option<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let name = &self.src[start..self.pos];

        if matches!(self.peek(), Some('\'' | '"')) && string_prefix(name).is_some() {
            self.pos = start;
            return self.strings();
        }

        match name {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::None),
            _ => None,
        }
    }

    /// One or more adjacent string literals, concatenated. Text and byte
    /// literals cannot be mixed.
    fn strings(&mut self) -> Option<Value> {
        let (kind, mut text) = self.string_literal()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if !self.string_starts_here() {
                self.pos = save;
                break;
            }
            let (next_kind, next) = self.string_literal()?;
            if !matches!(
                (&kind, &next_kind),
                (StrKind::Text, StrKind::Text) | (StrKind::Bytes, StrKind::Bytes)
            ) {
                return None;
            }
            text.push_str(&next);
        }

        match kind {
            StrKind::Text => Some(Value::Str(text)),
            StrKind::Bytes => Some(Value::Bytes(text.chars().map(|c| c as u8).collect())),
        }
    }

    fn string_starts_here(&self) -> bool {
        let prefix_len = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        let after_prefix = self.peek_nth(prefix_len);
        matches!(after_prefix, Some('\'' | '"'))
            && string_prefix(&self.rest()[..prefix_len]).is_some()
    }

    fn string_literal(&mut self) -> Option<(StrKind, String)> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        let (raw, bytes) = string_prefix(&self.src[start..self.pos])?;
        let kind = if bytes { StrKind::Bytes } else { StrKind::Text };

        let quote = self.bump().filter(|c| matches!(c, '\'' | '"'))?;
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.pos += 2 * quote.len_utf8();
        }

        let mut out = String::new();
        loop {
            let c = self.bump()?;
            if c == quote {
                if !triple {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                    self.pos += 2 * quote.len_utf8();
                    break;
                }
                out.push(c);
                continue;
            }
            if c == '\n' && !triple {
                return None;
            }
            if bytes && !c.is_ascii() {
                return None;
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escaped = self.bump()?;
            if raw {
                out.push('\\');
                out.push(escaped);
                continue;
            }
            self.escape(escaped, bytes, &mut out)?;
        }

        Some((kind, out))
    }

    fn escape(&mut self, escaped: char, bytes: bool, out: &mut String) -> Option<()> {
        match escaped {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(escaped),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = escaped.to_digit(8)?;
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                if bytes && code > 0xff {
                    return None;
                }
                out.push(char::from_u32(code)?);
            }
            'x' => out.push(self.hex_escape(2)?),
            'u' if !bytes => out.push(self.hex_escape(4)?),
            'U' if !bytes => out.push(self.hex_escape(8)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Some(())
    }

    fn hex_escape(&mut self, digits: usize) -> Option<char> {
        let end = self.pos.checked_add(digits)?;
        let hex = self.src.get(self.pos..end)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        self.pos = end;
        char::from_u32(u32::from_str_radix(hex, 16).ok()?)
    }
}

/// Returns `(raw, bytes)` for a valid string prefix.
fn string_prefix(prefix: &str) -> Option<(bool, bool)> {
    match prefix.to_ascii_lowercase().as_str() {
        "" | "u" => Some((false, false)),
        "r" => Some((true, false)),
        "b" => Some((false, true)),
        "br" | "rb" => Some((true, true)),
        _ => None,
    }
}

fn number_token(token: &str) -> Option<Value> {
    let lower = token.to_ascii_lowercase();

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            let digits = digits.strip_prefix('_').unwrap_or(digits);
            let digits = strip_separators(digits, |c| c.is_digit(radix))?;
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return i64::from_str_radix(&digits, radix).ok().map(Value::Int);
        }
    }

    let digits = strip_separators(&lower, |c| c.is_ascii_digit())?;
    if lower.contains(['.', 'e']) {
        if !digits.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | '+' | '-')) {
            return None;
        }
        return digits.parse::<f64>().ok().map(Value::Float);
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return None;
    }
    digits.parse::<i64>().ok().map(Value::Int)
}

/// Removes `_` digit separators, which must sit between two digits of the
/// token's radix.
fn strip_separators(token: &str, is_digit: impl Fn(char) -> bool) -> Option<String> {
    let chars: Vec<char> = token.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c != '_' {
            continue;
        }
        let prev = i.checked_sub(1).and_then(|p| chars.get(p));
        let next = chars.get(i + 1);
        let between_digits =
            prev.is_some_and(|&c| is_digit(c)) && next.is_some_and(|&c| is_digit(c));
        if !between_digits {
            return None;
        }
    }
    Some(chars.into_iter().filter(|&c| c != '_').collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(decode_literal("123"), Value::Int(123));
        assert_eq!(decode_literal(" -42 "), Value::Int(-42));
        assert_eq!(decode_literal("1_000_000"), Value::Int(1_000_000));
        assert_eq!(decode_literal("0x1F"), Value::Int(31));
        assert_eq!(decode_literal("0b101"), Value::Int(5));
        assert_eq!(decode_literal("0"), Value::Int(0));
        assert_eq!(decode_literal("0xdead_beef"), Value::Int(0xdead_beef));
        assert_eq!(decode_literal("1_5e2"), Value::Float(1500.0));
    }

    #[test]
    fn test_floats() {
        assert_eq!(decode_literal("1.5"), Value::Float(1.5));
        assert_eq!(decode_literal(".5"), Value::Float(0.5));
        assert_eq!(decode_literal("2."), Value::Float(2.0));
        assert_eq!(decode_literal("-1e-3"), Value::Float(-0.001));
        assert_eq!(decode_literal("2.5E2"), Value::Float(250.0));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(decode_literal("True"), Value::Bool(true));
        assert_eq!(decode_literal("False"), Value::Bool(false));
        assert_eq!(decode_literal("None"), Value::None);
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(decode_literal("'abc'"), Value::from("abc"));
        assert_eq!(decode_literal(r#""it's""#), Value::from("it's"));
        assert_eq!(decode_literal(r"'a\tb\\c'"), Value::from("a\tb\\c"));
        assert_eq!(decode_literal(r"'\x41\u00e9'"), Value::from("Aé"));
        assert_eq!(decode_literal("'ab' \"cd\""), Value::from("abcd"));
        assert_eq!(decode_literal(r"r'C:\data'"), Value::from(r"C:\data"));
        assert_eq!(decode_literal("'''multi\nline'''"), Value::from("multi\nline"));
        assert_eq!(decode_literal(r"b'\x00ab'"), Value::Bytes(vec![0, b'a', b'b']));
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            decode_literal("[1, 2.5, 'x']"),
            Value::List(vec![Value::Int(1), Value::Float(2.5), Value::from("x")])
        );
        assert_eq!(decode_literal("()"), Value::Tuple(vec![]));
        assert_eq!(decode_literal("(7,)"), Value::Tuple(vec![Value::Int(7)]));
        assert_eq!(decode_literal("(7)"), Value::Int(7));
        assert_eq!(
            decode_literal("1, 2"),
            Value::Tuple(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(decode_literal("{}"), Value::Dict(vec![]));
        assert_eq!(
            decode_literal("{'a': [1], 2: None,}"),
            Value::Dict(vec![
                (Value::from("a"), Value::List(vec![Value::Int(1)])),
                (Value::Int(2), Value::None),
            ])
        );
        assert_eq!(
            decode_literal("{1, 2}"),
            Value::Set(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_non_literals_fall_back_to_text() {
        for text in [
            "abc",
            "",
            "Vallen AMSY-6",
            "1.2.3",
            "007",
            "1 2",
            "--1",
            "-True",
            "[1, 2",
            "'unterminated",
            "__import__('os')",
            "1 + 2",
            "99999999999999999999",
            "2024-01-15 10:30:00",
            "é'abé",
            "Ünit\"x\"",
            "name'quoted'",
            "1e_5",
            "1_e5",
            "1.5_e2",
            "0b1_2",
        ] {
            assert_eq!(decode_literal(text), Value::from(text), "input: {:?}", text);
        }
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert!(parse_literal(&deep).is_none());

        let shallow = format!("{}{}", "[".repeat(10), "]".repeat(10));
        assert!(parse_literal(&shallow).is_some());
    }
}
