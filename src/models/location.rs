//! Abstract write targets ("locations") the dataflow state maps to values.
//!
//! A [`Location`] pairs a structural [`LocationSpecifier`] (what kind of
//! thing, and which one) with the [`Scope`](super::scope::Scope) it lives in.
//! Two locations are equal iff both the specifier and the scope match — so
//! equality is structural on the specifier but identity-based on the scope,
//! inheriting the latter's semantics.
//!
//! most specifiers are parameterised by a [`Value`] rather
//! than a raw string (e.g. `Filesystem(path: Value)`), so that a path built
//! from a dataflow-tracked concatenation can still be the target of a write
//! without first being resolved to a literal.

use super::scope::Scope;
use super::value::Value;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationSpecifier {
    /// A concrete filesystem path.
    Filesystem(Box<Value>),
    /// A named variable (environment variable, GitHub Actions `env`/`vars` entry, shell var).
    Variable(Box<Value>),
    /// A named build artifact (e.g. an uploaded workflow artifact) plus the file within it.
    Artifact(Box<Value>, Box<Value>),
    /// Any file under a directory prefix — used when a command's effect is
    /// "writes somewhere under this directory" without a known filename.
    FilesystemAnyUnderDir(Box<Value>),
    /// Any artifact filename under a named artifact.
    ArtifactAnyFilename(Box<Value>),
    /// A formal parameter location not yet substituted with an actual. The
    /// parameter name is a plain identifier, not a dataflow-tracked `Value`.
    ParameterPlaceholder(Rc<str>),
    /// Standard output/error — used by interpretation nodes that print.
    Console,
    /// The fact that a package of this name is installed in the environment.
    Installed(Box<Value>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub specifier: LocationSpecifier,
    pub scope: Scope,
}

impl Location {
    pub fn new(specifier: LocationSpecifier, scope: Scope) -> Self {
        Self { specifier, scope }
    }

    pub fn filesystem(path: impl Into<Rc<str>>, scope: Scope) -> Self {
        Self::new(
            LocationSpecifier::Filesystem(Box::new(Value::string_literal(path))),
            scope,
        )
    }

    pub fn variable(name: impl Into<Rc<str>>, scope: Scope) -> Self {
        Self::new(
            LocationSpecifier::Variable(Box::new(Value::string_literal(name))),
            scope,
        )
    }

    pub fn artifact(name: impl Into<Rc<str>>, file: impl Into<Rc<str>>, scope: Scope) -> Self {
        Self::new(
            LocationSpecifier::Artifact(
                Box::new(Value::string_literal(name)),
                Box::new(Value::string_literal(file)),
            ),
            scope,
        )
    }

    pub fn console(scope: Scope) -> Self {
        Self::new(LocationSpecifier::Console, scope)
    }

    pub fn installed(package: impl Into<Rc<str>>, scope: Scope) -> Self {
        Self::new(
            LocationSpecifier::Installed(Box::new(Value::string_literal(package))),
            scope,
        )
    }

    /// Returns the literal string form of a specifier's primary `Value`
    /// argument, if it happens to be a fully-resolved `StringLiteral`. Used
    /// by callers (e.g. build-tool detection) that only care about the common case.
    pub fn literal_path(&self) -> Option<&str> {
        match &self.specifier {
            LocationSpecifier::Filesystem(v)
            | LocationSpecifier::FilesystemAnyUnderDir(v)
            | LocationSpecifier::Variable(v)
            | LocationSpecifier::Installed(v)
            | LocationSpecifier::ArtifactAnyFilename(v) => match v.as_ref() {
                Value::StringLiteral(s) => Some(s.as_ref()),
                _ => None,
            },
            LocationSpecifier::Artifact(name, _) => match name.as_ref() {
                Value::StringLiteral(s) => Some(s.as_ref()),
                _ => None,
            },
            LocationSpecifier::ParameterPlaceholder(_) | LocationSpecifier::Console => None,
        }
    }

    /// Whether `self` could refer to the same storage as `other` under a
    /// coarser "any file under dir" / "any artifact" specifier — used by
    /// [`crate::dataflow::filter`] when deciding whether a write to `other`
    /// should be visible through a location alias like
    /// `FilesystemAnyUnderDir`/`ArtifactAnyFilename`.
    pub fn specifier_subsumes(&self, other: &Location) -> bool {
        if self.scope != other.scope {
            return false;
        }
        match (&self.specifier, &other.specifier) {
            (LocationSpecifier::ArtifactAnyFilename(name), LocationSpecifier::Artifact(other_name, _)) => {
                name == other_name
            }
            (LocationSpecifier::FilesystemAnyUnderDir(prefix), LocationSpecifier::Filesystem(p)) => {
                match (prefix.as_ref(), p.as_ref()) {
                    (Value::StringLiteral(prefix), Value::StringLiteral(p)) => p.starts_with(prefix.as_ref()),
                    _ => false,
                }
            }
            _ => self.specifier == other.specifier,
        }
    }
}
