//! Debug s-expression grammar for [`Value`]/[`LocationSpecifier`].
//!
//! Grammar: `$Ctor(arg, arg, ...)` where an `arg` is either another `$Ctor(...)`
//! term or a backslash-escaped double-quoted string; a `Location` serializes
//! as the bracketed pair `[$Scope("label"), Spec]`.
//!
//! This is a debug/diagnostic format, not a stable serialization: round-trip
//! (`from_sexpr(to_sexpr(v)) == v`) holds for every [`Value`] *except* when it
//! embeds a [`Location`] (via `Value::Read`) — scope identity has no textual
//! representation, so parsing a `$Read(...)` term whose argument is a bracketed
//! location always fails with [`ParseError::LocationNotSerializable`],
//! mirroring the non-functional `parse_location` left in place upstream.

use crate::error::ParseError;
use crate::models::location::{Location, LocationSpecifier};
use crate::models::value::{BinaryStringOperator, UnaryStringOperator, Value};

/// Wraps `s` in `"..."`, escaping `\` and `"`.
pub fn enquote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn dequote(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn unary_op_tag(op: UnaryStringOperator) -> &'static str {
    match op {
        UnaryStringOperator::Basename => "Basename",
        UnaryStringOperator::Base64Encode => "Base64Encode",
        UnaryStringOperator::Base64Decode => "Base64Decode",
    }
}

fn binary_op_tag(op: BinaryStringOperator) -> &'static str {
    match op {
        BinaryStringOperator::Concat => "Concat",
    }
}

pub fn location_specifier_to_sexpr(spec: &LocationSpecifier) -> String {
    match spec {
        LocationSpecifier::Filesystem(p) => format!("$Filesystem({})", to_sexpr(p)),
        LocationSpecifier::Variable(v) => format!("$Variable({})", to_sexpr(v)),
        LocationSpecifier::Artifact(name, file) => {
            format!("$Artifact({}, {})", to_sexpr(name), to_sexpr(file))
        }
        LocationSpecifier::FilesystemAnyUnderDir(p) => {
            format!("$FilesystemAnyUnderDir({})", to_sexpr(p))
        }
        LocationSpecifier::ArtifactAnyFilename(name) => {
            format!("$ArtifactAnyFilename({})", to_sexpr(name))
        }
        LocationSpecifier::ParameterPlaceholder(name) => {
            format!("$ParameterPlaceholderLocation({})", enquote(name))
        }
        LocationSpecifier::Console => "$Console".to_string(),
        LocationSpecifier::Installed(name) => format!("$Installed({})", to_sexpr(name)),
    }
}

pub fn location_to_sexpr(location: &Location) -> String {
    format!(
        "[$Scope({}), {}]",
        enquote(location.scope.label()),
        location_specifier_to_sexpr(&location.specifier)
    )
}

pub fn to_sexpr(value: &Value) -> String {
    match value {
        Value::StringLiteral(s) => format!("$StringLiteral({})", enquote(s)),
        Value::Read(location) => format!("$Read({})", location_to_sexpr(location)),
        Value::ArbitraryNewData(tag) => format!("$ArbitraryNewData({})", enquote(tag)),
        Value::InstalledPackage {
            name,
            version,
            distribution,
            url,
        } => format!(
            "$InstalledPackage({}, {}, {}, {})",
            to_sexpr(name),
            to_sexpr(version),
            to_sexpr(distribution),
            to_sexpr(url)
        ),
        Value::UnaryStringOp(op, inner) => {
            format!("$UnaryStringOp(${}, {})", unary_op_tag(*op), to_sexpr(inner))
        }
        Value::BinaryStringOp(op, lhs, rhs) => format!(
            "$BinaryStringOp(${}, {}, {})",
            binary_op_tag(*op),
            to_sexpr(lhs),
            to_sexpr(rhs)
        ),
        Value::ParameterPlaceholder(name) => {
            format!("$ParameterPlaceholderValue({})", enquote(name))
        }
        Value::Symbolic(inner) => format!("$Symbolic({})", to_sexpr(inner)),
        Value::SingleBashTokenConstraint(inner) => {
            format!("$SingleBashTokenConstraint({})", to_sexpr(inner))
        }
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn consume_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn consume(&mut self, expected: u8) -> Result<(), ParseError> {
        self.consume_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected: (expected as char).to_string(),
                found: self
                    .peek()
                    .map(|b| (b as char).to_string())
                    .unwrap_or_else(|| "<eof>".to_string()),
                pos: self.pos,
            })
        }
    }

    /// Parses `$Identifier`, returning `Identifier` without the sigil.
    fn parse_tag(&mut self) -> Result<String, ParseError> {
        self.consume_whitespace();
        self.consume(b'$')?;
        let start = self.pos;
        while self
            .peek()
            .map(|b| b.is_ascii_alphanumeric() || b == b'_')
            .unwrap_or(false)
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(ParseError::UnexpectedEof("constructor tag"));
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    /// Parses a `"..."` string literal with `\`-escapes, returning the
    /// unescaped contents.
    fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        self.consume_whitespace();
        self.consume(b'"')?;
        let start = self.pos;
        let mut escaped = false;
        loop {
            match self.peek() {
                None => return Err(ParseError::UnexpectedEof("quoted string")),
                Some(b'"') if !escaped => break,
                Some(b'\\') if !escaped => {
                    escaped = true;
                    self.pos += 1;
                }
                Some(_) => {
                    escaped = false;
                    self.pos += 1;
                }
            }
        }
        let raw = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        self.consume(b'"')?;
        Ok(dequote(&raw))
    }

    fn parse_args_open(&mut self) -> Result<(), ParseError> {
        self.consume(b'(')
    }

    fn parse_comma(&mut self) -> Result<(), ParseError> {
        self.consume(b',')
    }

    fn parse_args_close(&mut self) -> Result<(), ParseError> {
        self.consume(b')')
    }

    /// Whether the next non-whitespace byte opens a bracketed `Location`
    /// (`[...]`) rather than a plain quoted string/nested term.
    fn peek_is_bracket(&mut self) -> bool {
        self.consume_whitespace();
        self.peek() == Some(b'[')
    }

    fn parse_unary_op_tag(&mut self) -> Result<UnaryStringOperator, ParseError> {
        match self.parse_tag()?.as_str() {
            "Basename" => Ok(UnaryStringOperator::Basename),
            "Base64Encode" => Ok(UnaryStringOperator::Base64Encode),
            "Base64Decode" => Ok(UnaryStringOperator::Base64Decode),
            other => Err(ParseError::UnknownConstructor(other.to_string())),
        }
    }

    fn parse_binary_op_tag(&mut self) -> Result<BinaryStringOperator, ParseError> {
        match self.parse_tag()?.as_str() {
            "Concat" => Ok(BinaryStringOperator::Concat),
            other => Err(ParseError::UnknownConstructor(other.to_string())),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let ctor = self.parse_tag()?;
        if ctor == "Read" {
            self.parse_args_open()?;
            // Scope identity cannot be reconstructed from text, whether or
            // not the bracketed form is well-formed; best-effort skip to the
            // matching close bracket so callers still get a clean EOF check.
            if self.peek_is_bracket() {
                self.consume(b'[')?;
                let mut depth = 1usize;
                while depth > 0 {
                    match self.peek() {
                        None => return Err(ParseError::UnexpectedEof("location")),
                        Some(b'[') => depth += 1,
                        Some(b']') => depth -= 1,
                        _ => {}
                    }
                    self.pos += 1;
                }
            }
            return Err(ParseError::LocationNotSerializable("Read"));
        }
        self.parse_args_open()?;
        let value = match ctor.as_str() {
            "StringLiteral" => Value::StringLiteral(self.parse_quoted_string()?.into()),
            "ArbitraryNewData" => Value::ArbitraryNewData(self.parse_quoted_string()?.into()),
            "InstalledPackage" => {
                let name = self.parse_value()?;
                self.parse_comma()?;
                let version = self.parse_value()?;
                self.parse_comma()?;
                let distribution = self.parse_value()?;
                self.parse_comma()?;
                let url = self.parse_value()?;
                Value::installed_package(name, version, distribution, url)
            }
            "UnaryStringOp" => {
                let op = self.parse_unary_op_tag()?;
                self.parse_comma()?;
                let inner = self.parse_value()?;
                Value::UnaryStringOp(op, Box::new(inner))
            }
            "BinaryStringOp" => {
                let op = self.parse_binary_op_tag()?;
                self.parse_comma()?;
                let lhs = self.parse_value()?;
                self.parse_comma()?;
                let rhs = self.parse_value()?;
                Value::BinaryStringOp(op, Box::new(lhs), Box::new(rhs))
            }
            "ParameterPlaceholderValue" => {
                Value::ParameterPlaceholder(self.parse_quoted_string()?.into())
            }
            "Symbolic" => Value::Symbolic(Box::new(self.parse_value()?)),
            "SingleBashTokenConstraint" => {
                Value::SingleBashTokenConstraint(Box::new(self.parse_value()?))
            }
            other => return Err(ParseError::UnknownConstructor(other.to_string())),
        };
        self.parse_args_close()?;
        Ok(value)
    }
}

pub fn from_sexpr(input: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    parser.consume_whitespace();
    if parser.pos != parser.bytes.len() {
        return Err(ParseError::Expected {
            expected: "<eof>".to_string(),
            found: String::from_utf8_lossy(&parser.bytes[parser.pos..]).into_owned(),
            pos: parser.pos,
        });
    }
    Ok(value)
}
