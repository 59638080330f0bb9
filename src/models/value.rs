//! Abstract values tracked by the dataflow engine.
//!
//! A [`Value`] describes *what* flowed into a location without executing
//! anything — a literal, a read of another location, a concatenation, a
//! symbolic unknown. Values compare and hash structurally (derived), unlike
//! [`super::scope::Scope`].

use super::location::Location;
use std::rc::Rc;

/// Operators that transform a single string value: `BASENAME`,
/// `BASE64_ENCODE`, `BASE64_DECODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryStringOperator {
    Basename,
    Base64Encode,
    Base64Decode,
}

/// Operators that combine two string values. Currently only concatenation,
/// since that is the only operator the constant-folding rules in
/// [`Value::concat`] apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryStringOperator {
    Concat,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A literal string constant, e.g. from source text.
    StringLiteral(Rc<str>),
    /// The value currently stored at a location, read at analysis time.
    Read(Box<Location>),
    /// Data whose provenance is not modeled further (e.g. `RANDOM`, a
    /// generated UUID, file contents downloaded at build time), tagged with
    /// a human-readable origin for debugging.
    ArbitraryNewData(Rc<str>),
    /// The identity of an installed package, as reported by a build-tool
    /// command (build-tool detection) or a package-manager install step. Each
    /// sub-field is itself a `Value` since none of them need be resolved to
    /// a literal at model-construction time.
    InstalledPackage {
        name: Box<Value>,
        version: Box<Value>,
        distribution: Box<Value>,
        url: Box<Value>,
    },
    UnaryStringOp(UnaryStringOperator, Box<Value>),
    BinaryStringOp(BinaryStringOperator, Box<Value>, Box<Value>),
    /// A formal parameter not yet substituted with an actual argument.
    ParameterPlaceholder(Rc<str>),
    /// Wraps a value that the analysis has chosen not to evaluate/fold
    /// further (as opposed to [`Value::ArbitraryNewData`], which has no
    /// underlying structure at all).
    Symbolic(Box<Value>),
    /// Constrains a value to be a single Bash token (no IFS word-splitting),
    /// used when interpreting `$(...)`/`${...}` inside double quotes.
    SingleBashTokenConstraint(Box<Value>),
}

impl Value {
    pub fn string_literal(s: impl Into<Rc<str>>) -> Self {
        Value::StringLiteral(s.into())
    }

    pub fn read(location: Location) -> Self {
        Value::Read(Box::new(location))
    }

    pub fn arbitrary_new_data(origin_tag: impl Into<Rc<str>>) -> Self {
        Value::ArbitraryNewData(origin_tag.into())
    }

    pub fn symbolic(inner: Value) -> Self {
        Value::Symbolic(Box::new(inner))
    }

    pub fn installed_package(name: Value, version: Value, distribution: Value, url: Value) -> Self {
        Value::InstalledPackage {
            name: Box::new(name),
            version: Box::new(version),
            distribution: Box::new(distribution),
            url: Box::new(url),
        }
    }

    pub fn unary_op(op: UnaryStringOperator, operand: Value) -> Self {
        match (op, &operand) {
            (UnaryStringOperator::Basename, Value::StringLiteral(s)) => {
                let base = s.rsplit('/').next().unwrap_or(s);
                Value::StringLiteral(base.into())
            }
            _ => Value::UnaryStringOp(op, Box::new(operand)),
        }
    }

    /// Builds a concatenation, applying the same constant-folding rules the
    /// original engine uses so that repeated concatenation of literals
    /// doesn't grow an ever-deeper tree of empty-string no-ops:
    ///
    /// - `"" + x == x`
    /// - `x + "" == x`
    /// - `StringLiteral(a) + StringLiteral(b) == StringLiteral(a+b)`
    /// - `(a + StringLiteral(b)) + StringLiteral(c) == a + StringLiteral(b+c)`
    ///   (re-associates so literal tails merge instead of piling up)
    pub fn concat(left: Value, right: Value) -> Value {
        use Value::*;
        match (left, right) {
            (StringLiteral(l), right) if l.is_empty() => right,
            (left, StringLiteral(r)) if r.is_empty() => left,
            (StringLiteral(l), StringLiteral(r)) => {
                StringLiteral(format!("{l}{r}").into())
            }
            (
                BinaryStringOp(BinaryStringOperator::Concat, inner_left, inner_right),
                StringLiteral(r),
            ) => {
                if let StringLiteral(inner_r) = inner_right.as_ref() {
                    Value::concat(
                        *inner_left,
                        StringLiteral(format!("{inner_r}{r}").into()),
                    )
                } else {
                    BinaryStringOp(
                        BinaryStringOperator::Concat,
                        Box::new(BinaryStringOp(
                            BinaryStringOperator::Concat,
                            inner_left,
                            inner_right,
                        )),
                        Box::new(StringLiteral(r)),
                    )
                }
            }
            (l, r) => BinaryStringOp(BinaryStringOperator::Concat, Box::new(l), Box::new(r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_left_literal_is_identity() {
        let v = Value::concat(Value::string_literal(""), Value::string_literal("x"));
        assert_eq!(v, Value::string_literal("x"));
    }

    #[test]
    fn two_literals_fold() {
        let v = Value::concat(Value::string_literal("a"), Value::string_literal("b"));
        assert_eq!(v, Value::string_literal("ab"));
    }

    #[test]
    fn nested_concat_reassociates_literal_tail() {
        let sym = Value::symbolic(Value::arbitrary_new_data("unknown"));
        let step1 = Value::concat(sym.clone(), Value::string_literal("a"));
        let step2 = Value::concat(step1, Value::string_literal("b"));
        assert_eq!(
            step2,
            Value::BinaryStringOp(
                BinaryStringOperator::Concat,
                Box::new(sym),
                Box::new(Value::string_literal("ab")),
            )
        );
    }

    #[test]
    fn basename_of_literal_folds_immediately() {
        let v = Value::unary_op(UnaryStringOperator::Basename, Value::string_literal("/a/b/c.sh"));
        assert_eq!(v, Value::string_literal("c.sh"));
    }

    #[test]
    fn installed_package_carries_value_subfields() {
        let pkg = Value::installed_package(
            Value::string_literal("requests"),
            Value::string_literal("2.31.0"),
            Value::string_literal("pypi"),
            Value::string_literal("https://pypi.org/project/requests"),
        );
        match pkg {
            Value::InstalledPackage { name, .. } => assert_eq!(*name, Value::string_literal("requests")),
            _ => panic!("expected InstalledPackage"),
        }
    }
}
