//! Scopes identify the lexical/dynamic context a [`super::location::Location`]
//! or [`super::value::Value`] belongs to (a job, a step, a function body).
//!
//! Unlike [`super::value::Value`] and [`super::location::LocationSpecifier`],
//! which compare structurally, scopes compare by *identity*: two scopes built
//! from identical fields are still different scopes if they were created by
//! different analysis nodes. We model that with a monotonically increasing id
//! handed out by [`ScopeArena`], since Rust has no object identity hook to
//! piggyback on the way the original's `id()`-based equality did.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// What a [`Scope`] compares equal by.
///
/// Ordinary scopes compare by arena-assigned id. `Parameter` scopes are the
/// exception described in the data model: a distinguished variant used by
/// generic effect models (third-party action/reusable-workflow
/// parameterization) that compares by the formal parameter's name instead of
/// by identity, so two placeholder reads of the same parameter name unify
/// regardless of which call site created the scope.
#[derive(Clone, Debug)]
enum ScopeIdentity {
    Id(u64),
    Parameter(Rc<str>),
}

/// A lexical scope. Scopes form a tree via `outer_scope`: a read that misses
/// in this scope may continue the search in the outer one. Two `Scope`
/// values are equal iff their [`ScopeIdentity`] matches, regardless of
/// `label`.
#[derive(Clone)]
pub struct Scope {
    identity: ScopeIdentity,
    label: Rc<str>,
    outer_scope: Option<Rc<Scope>>,
}

impl Scope {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> Option<u64> {
        match self.identity {
            ScopeIdentity::Id(id) => Some(id),
            ScopeIdentity::Parameter(_) => None,
        }
    }

    pub fn outer_scope(&self) -> Option<&Scope> {
        self.outer_scope.as_deref()
    }

    pub fn is_parameter_scope(&self) -> bool {
        matches!(self.identity, ScopeIdentity::Parameter(_))
    }

    /// Walks `self` then `outer_scope`, `outer_scope.outer_scope`, ... calling
    /// `f` at each level until it returns `Some`.
    pub fn resolve_in_chain<T>(&self, mut f: impl FnMut(&Scope) -> Option<T>) -> Option<T> {
        let mut cur = self;
        loop {
            if let Some(found) = f(cur) {
                return Some(found);
            }
            cur = cur.outer_scope()?;
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            ScopeIdentity::Id(id) => write!(f, "Scope#{}({})", id, self.label),
            ScopeIdentity::Parameter(name) => write!(f, "Scope#param({})", name),
        }
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        match (&self.identity, &other.identity) {
            (ScopeIdentity::Id(a), ScopeIdentity::Id(b)) => a == b,
            (ScopeIdentity::Parameter(a), ScopeIdentity::Parameter(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for Scope {}

impl std::hash::Hash for Scope {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match &self.identity {
            ScopeIdentity::Id(id) => {
                0u8.hash(state);
                id.hash(state);
            }
            ScopeIdentity::Parameter(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

/// Hands out scopes with fresh identities. One arena is owned per analysis
/// run (see `dataflow::node::AnalysisContext`), matching the single-threaded,
/// per-component lifetime described in the concurrency model.
#[derive(Debug, Default)]
pub struct ScopeArena {
    next_id: Cell<u64>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self { next_id: Cell::new(0) }
    }

    pub fn new_scope(&self, label: impl Into<Rc<str>>) -> Scope {
        self.new_scope_with_outer(label, None)
    }

    /// Creates a scope nested under `outer`, so a read that misses locally
    /// can continue the search in `outer` and beyond.
    pub fn new_scope_with_outer(&self, label: impl Into<Rc<str>>, outer: Option<Scope>) -> Scope {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Scope {
            identity: ScopeIdentity::Id(id),
            label: label.into(),
            outer_scope: outer.map(Rc::new),
        }
    }

    /// A placeholder scope used when substituting formal parameters with
    /// actual arguments at a call site (mirrors `ParameterPlaceholderScope`).
    pub fn placeholder(&self) -> Scope {
        self.new_scope("<placeholder>")
    }

    /// A distinguished scope that compares by parameter name rather than by
    /// identity, used by generic effect models to unify placeholder reads of
    /// the same formal parameter across call sites.
    pub fn parameter_scope(&self, name: impl Into<Rc<str>>) -> Scope {
        let name = name.into();
        Scope {
            identity: ScopeIdentity::Parameter(name.clone()),
            label: name,
            outer_scope: None,
        }
    }
}
