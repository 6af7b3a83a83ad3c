//! Document header rendering and parsing.
//!
//! The default header format writes every field as `key: <literal>` where
//! the literal is valid Python literal syntax (`True`, `None`, `'text'`,
//! `[1, 2]`, `{'k': 0.5}`). Existing vault consumers evaluate those lines
//! with a literal evaluator, so the rendering rules here (quote choice,
//! float formatting, escapes) must stay stable. YAML is available as an
//! opt-in alternative.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::LiteralError;

const DELIMITER: &str = "---";

/// How the header block of each document is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrontmatterFormat {
    /// `key: <python literal>` lines.
    #[default]
    Literal,
    /// Standard YAML mapping.
    Yaml,
}

/// Ordered field mapping placed at the top of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: IndexMap<String, Value>,
}

impl Frontmatter {
    /// Creates an empty header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, replacing an existing one in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the header has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Renders the header followed by `body`.
    ///
    /// # Errors
    ///
    /// Returns an error only for [`FrontmatterFormat::Yaml`] when a value
    /// cannot be serialized.
    pub fn render(&self, body: &str, format: FrontmatterFormat) -> Result<String, serde_yaml::Error> {
        let mut out = String::new();
        out.push_str(DELIMITER);
        out.push('\n');

        match format {
            FrontmatterFormat::Literal => {
                for (key, value) in &self.fields {
                    out.push_str(key);
                    out.push_str(": ");
                    write_literal(&mut out, value);
                    out.push('\n');
                }
            }
            FrontmatterFormat::Yaml => {
                if !self.fields.is_empty() {
                    out.push_str(&serde_yaml::to_string(&self.fields)?);
                }
            }
        }

        out.push_str(DELIMITER);
        out.push_str("\n\n");
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }
}

impl FromIterator<(String, Value)> for Frontmatter {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Splits a generated document into its header fields and body.
///
/// # Errors
///
/// Returns an error if the header block is missing or a line does not
/// parse in the given format.
pub fn read_document(
    text: &str,
    format: FrontmatterFormat,
) -> Result<(Frontmatter, String), LiteralError> {
    let rest = text
        .strip_prefix("---\n")
        .ok_or(LiteralError::MissingDelimiter)?;

    let (header, after) = if let Some(after) = rest.strip_prefix("---\n") {
        ("", after)
    } else {
        let end = rest.find("\n---\n").ok_or(LiteralError::MissingDelimiter)?;
        (&rest[..=end], &rest[end + 5..])
    };
    let body = after.strip_prefix('\n').unwrap_or(after).to_string();

    let frontmatter = match format {
        FrontmatterFormat::Literal => {
            let mut fm = Frontmatter::new();
            for line in header.lines().filter(|l| !l.trim().is_empty()) {
                let (key, literal) = line
                    .split_once(": ")
                    .ok_or_else(|| LiteralError::MalformedLine(line.to_string()))?;
                fm.insert(key, parse_literal(literal)?);
            }
            fm
        }
        FrontmatterFormat::Yaml if header.trim().is_empty() => Frontmatter::new(),
        FrontmatterFormat::Yaml => {
            let fields: IndexMap<String, Value> =
                serde_yaml::from_str(header).map_err(|e| LiteralError::Yaml(e.to_string()))?;
            Frontmatter { fields }
        }
    };

    Ok((frontmatter, body))
}

// ============================================================================
// Literal rendering
// ============================================================================

/// Renders `value` in Python literal syntax.
#[must_use]
pub fn to_literal(value: &Value) -> String {
    let mut out = String::new();
    write_literal(&mut out, value);
    out
}

fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(out, key);
                out.push_str(": ");
                write_literal(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        let _ = write!(out, "{i}");
    } else if let Some(u) = n.as_u64() {
        let _ = write!(out, "{u}");
    } else if let Some(f) = n.as_f64() {
        out.push_str(&float_literal(f));
    }
}

/// Formats a float the way Python's `repr` does: shortest round-trip
/// digits, always a decimal point or exponent, exponent form outside
/// `[1e-4, 1e16)`.
fn float_literal(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let abs = f.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let sci = format!("{f:e}");
        if let Some((mantissa, exp)) = sci.split_once('e') {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            return format!("{mantissa}e{sign}{:02}", exp.abs());
        }
        return sci;
    }

    let plain = f.to_string();
    if plain.contains('.') {
        plain
    } else {
        plain + ".0"
    }
}

fn write_string(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                let _ = if code <= 0xff {
                    write!(out, "\\x{code:02x}")
                } else if code <= 0xffff {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

// ============================================================================
// Literal parsing
// ============================================================================

/// Parses one Python literal (as produced by [`to_literal`]) into a value.
///
/// Supports `None`, `True`, `False`, integers, floats, quoted strings with
/// backslash escapes, lists and mappings with string or integer keys.
///
/// # Errors
///
/// Returns a [`LiteralError`] describing the first problem found.
pub fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let mut parser = LiteralParser { src, pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != src.len() {
        return Err(LiteralError::Trailing(parser.pos));
    }
    Ok(value)
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl LiteralParser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::Unexpected {
            found,
            offset: self.pos,
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[') => self.list(),
            Some('{') => self.mapping(),
            Some('\'' | '"') => self.string().map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn word(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            other => Err(LiteralError::InvalidNumber(other.to_string())),
        }
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
        {
            self.bump();
        }
        let token = &self.src[start..self.pos];
        let invalid = || LiteralError::InvalidNumber(token.to_string());

        if token.contains(['.', 'e', 'E']) {
            let f: f64 = token.parse().map_err(|_| invalid())?;
            return Number::from_f64(f).map(Value::Number).ok_or_else(invalid);
        }
        let digits = token.strip_prefix('+').unwrap_or(token);
        if let Ok(i) = digits.parse::<i64>() {
            return Ok(Value::from(i));
        }
        digits.parse::<u64>().map(Value::from).map_err(|_| invalid())
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
                c if c == quote => return Ok(out),
                '\\' => {
                    let at = self.pos;
                    let escaped = match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
                        '\\' => '\\',
                        '\'' => '\'',
                        '"' => '"',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        '0' => '\0',
                        'x' => self.hex_escape(2, at)?,
                        'u' => self.hex_escape(4, at)?,
                        'U' => self.hex_escape(8, at)?,
                        _ => return Err(LiteralError::InvalidEscape(at)),
                    };
                    out.push(escaped);
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, len: usize, at: usize) -> Result<char, LiteralError> {
        let end = self.pos + len;
        let digits = self
            .src
            .get(self.pos..end)
            .ok_or(LiteralError::InvalidEscape(at))?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| LiteralError::InvalidEscape(at))?;
        self.pos = end;
        char::from_u32(code).ok_or(LiteralError::InvalidEscape(at))
    }

    fn list(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some(']') {
                        self.bump();
                        break;
                    }
                }
                Some(']') => break,
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
        Ok(Value::Array(items))
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut map = Map::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_ws();
            let key_at = self.pos;
            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
                _ => return Err(LiteralError::InvalidKey(key_at)),
            };
            self.skip_ws();
            match self.bump() {
                Some(':') => {}
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.bump();
                        break;
                    }
                }
                Some('}') => break,
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
        Ok(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn scalars_use_python_spelling() {
        assert_eq!(to_literal(&json!(null)), "None");
        assert_eq!(to_literal(&json!(true)), "True");
        assert_eq!(to_literal(&json!(false)), "False");
        assert_eq!(to_literal(&json!(42)), "42");
        assert_eq!(to_literal(&json!(-7)), "-7");
    }

    #[test]
    fn floats_follow_repr_rules() {
        assert_eq!(to_literal(&json!(1.0)), "1.0");
        assert_eq!(to_literal(&json!(0.5)), "0.5");
        assert_eq!(to_literal(&json!(-0.0)), "-0.0");
        assert_eq!(to_literal(&json!(1e16)), "1e+16");
        assert_eq!(to_literal(&json!(1.5e-5)), "1.5e-05");
        assert_eq!(to_literal(&json!(0.0001)), "0.0001");
        assert_eq!(to_literal(&json!(1e15)), "1000000000000000.0");
    }

    #[test]
    fn strings_pick_quote_like_repr() {
        assert_eq!(to_literal(&json!("Stonehaven")), "'Stonehaven'");
        assert_eq!(to_literal(&json!("King's Rest")), "\"King's Rest\"");
        assert_eq!(to_literal(&json!("say \"hi\"")), "'say \"hi\"'");
        assert_eq!(to_literal(&json!("both ' and \"")), "'both \\' and \"'");
    }

    #[test]
    fn strings_escape_control_characters() {
        assert_eq!(to_literal(&json!("a\nb\tc\\")), "'a\\nb\\tc\\\\'");
        assert_eq!(to_literal(&json!("bell\u{7}")), "'bell\\x07'");
        assert_eq!(to_literal(&json!("Köln")), "'Köln'");
    }

    #[test]
    fn collections_render_inline() {
        assert_eq!(to_literal(&json!([1, 2, 3])), "[1, 2, 3]");
        assert_eq!(to_literal(&json!([])), "[]");
        assert_eq!(to_literal(&json!({})), "{}");
        assert_eq!(
            to_literal(&json!({"12": 1, "name": "x"})),
            "{'12': 1, 'name': 'x'}"
        );
    }

    #[test]
    fn list_round_trips() {
        let original = json!([1, "two", 3.5, null, true, [4], {"k": "v"}]);
        let parsed = parse_literal(&to_literal(&original)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn parser_accepts_double_quoted_and_trailing_commas() {
        assert_eq!(parse_literal("\"King's\"").unwrap(), json!("King's"));
        assert_eq!(parse_literal("[1, 2,]").unwrap(), json!([1, 2]));
        assert_eq!(parse_literal("{1: 'a'}").unwrap(), json!({"1": "a"}));
    }

    #[test]
    fn parser_decodes_escapes() {
        assert_eq!(parse_literal("'\\x07\\u00e9\\n'").unwrap(), json!("\u{7}é\n"));
    }

    #[test]
    fn parser_rejects_garbage() {
        assert!(matches!(
            parse_literal("[1, 2"),
            Err(LiteralError::UnexpectedEnd)
        ));
        assert!(matches!(
            parse_literal("'open"),
            Err(LiteralError::UnexpectedEnd)
        ));
        assert!(matches!(parse_literal("1 2"), Err(LiteralError::Trailing(2))));
        assert!(matches!(
            parse_literal("null"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_literal("{[1]: 2}"),
            Err(LiteralError::InvalidKey(_))
        ));
        assert!(matches!(
            parse_literal("'\\q'"),
            Err(LiteralError::InvalidEscape(_))
        ));
    }

    #[test]
    fn render_literal_document() {
        let mut fm = Frontmatter::new();
        fm.insert("burg_id", 1).insert("name", "Stonehaven").insert("capital", false);
        let doc = fm.render("# Burg Stonehaven", FrontmatterFormat::Literal).unwrap();
        assert_eq!(
            doc,
            "---\nburg_id: 1\nname: 'Stonehaven'\ncapital: False\n---\n\n# Burg Stonehaven\n"
        );
    }

    #[test]
    fn render_yaml_document() {
        let mut fm = Frontmatter::new();
        fm.insert("state_id", 2).insert("burgs", json!([1, 4]));
        let doc = fm.render("body\n", FrontmatterFormat::Yaml).unwrap();
        assert!(doc.starts_with("---\nstate_id: 2\nburgs:\n"));
        assert!(doc.ends_with("---\n\nbody\n"));
    }

    #[test]
    fn read_document_round_trips_literal() {
        let mut fm = Frontmatter::new();
        fm.insert("cells", json!([3, 4, 5]))
            .insert("routes", json!({"7": 1}))
            .insert("note", "a: b");
        let doc = fm.render("Body text", FrontmatterFormat::Literal).unwrap();
        let (parsed, body) = read_document(&doc, FrontmatterFormat::Literal).unwrap();
        assert_eq!(parsed, fm);
        assert_eq!(body, "Body text\n");
    }

    #[test]
    fn read_document_round_trips_yaml() {
        let mut fm = Frontmatter::new();
        fm.insert("name", "Ash Vale").insert("origins", json!([0, 2]));
        let doc = fm.render("x", FrontmatterFormat::Yaml).unwrap();
        let (parsed, _) = read_document(&doc, FrontmatterFormat::Yaml).unwrap();
        assert_eq!(parsed, fm);
    }

    #[test]
    fn read_document_handles_empty_header() {
        let doc = Frontmatter::new()
            .render("only body", FrontmatterFormat::Literal)
            .unwrap();
        let (parsed, body) = read_document(&doc, FrontmatterFormat::Literal).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(body, "only body\n");
    }

    #[test]
    fn read_document_requires_delimiter() {
        assert_eq!(
            read_document("no header", FrontmatterFormat::Literal),
            Err(LiteralError::MissingDelimiter)
        );
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            (-1e20f64..1e20).prop_map(Value::from),
            "\\PC{0,12}".prop_map(Value::String),
        ]
    }

    fn nested() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(|pairs| {
                    Value::Object(pairs.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn literal_round_trip(value in nested()) {
            let text = to_literal(&value);
            prop_assert_eq!(parse_literal(&text).unwrap(), value);
        }

        #[test]
        fn parser_never_panics(src in "\\PC{0,32}") {
            let _ = parse_literal(&src);
        }
    }
}
