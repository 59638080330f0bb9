//! The node hierarchy the dataflow engine analyses: single statements,
//! straight-line sequences ([`ControlFlowGraphNode`]), and multi-branch
//! points ([`InterpretationNode`]) whose exit states are the join of their
//! branches.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::scope::ScopeArena;

use super::state::{transfer_state, AllowAll, DebugSequence, ExitType, State, StateTransferFilter};

/// Resources shared across one analysis run: the scope arena and the debug
/// sequence counter. Owned once per top-level analysis invocation, explicitly
/// *not* process-global statics, so concurrent analyses of independent
/// repositories do not interfere.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub scopes: ScopeArena,
    pub debug_seq: DebugSequence,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }
}

pub type NodeHandle = Rc<RefCell<dyn Node>>;

/// Common behaviour of every analysable unit. `analyse` recomputes the
/// node's exit states from its (possibly just-changed) entry state and
/// returns whether anything changed, so callers can drive a fixpoint.
pub trait Node {
    fn entry_state(&self) -> &State;
    fn entry_state_mut(&mut self) -> &mut State;
    fn exit_states(&self) -> &HashMap<ExitType, State>;
    fn analyse(&mut self, ctx: &AnalysisContext) -> bool;
}

/// A single effect-producing step: given the entry state, returns the facts
/// it adds (not the whole transferred state — the framework transfers entry
/// into exit itself, then layers these on top). `NoOpStatementNode`
/// (the CI frontend's `pass`-like steps) uses `Box::new(|_, _| State::new())`.
pub type StatementEffect = Box<dyn Fn(&State, &AnalysisContext) -> State>;

pub struct StatementNode {
    entry: State,
    exit: HashMap<ExitType, State>,
    effect: StatementEffect,
}

impl StatementNode {
    pub fn new(effect: StatementEffect) -> Self {
        Self {
            entry: State::new(),
            exit: HashMap::new(),
            effect,
        }
    }

    pub fn no_op() -> Self {
        Self::new(Box::new(|_, _| State::new()))
    }
}

impl Node for StatementNode {
    fn entry_state(&self) -> &State {
        &self.entry
    }

    fn entry_state_mut(&mut self) -> &mut State {
        &mut self.entry
    }

    fn exit_states(&self) -> &HashMap<ExitType, State> {
        &self.exit
    }

    fn analyse(&mut self, ctx: &AnalysisContext) -> bool {
        let mut new_exit = self.entry.clone();
        let produced = (self.effect)(&self.entry, ctx);
        let changed_transfer = transfer_state(&produced, &mut new_exit, &AllowAll, &ctx.debug_seq, false);

        let prev = self.exit.get(&ExitType::Default);
        let changed = match prev {
            Some(p) => changed_transfer || p.iter().count() != new_exit.iter().count(),
            None => true,
        };
        self.exit.insert(ExitType::Default, new_exit);
        changed
    }
}

/// A straight-line sequence of statements. Entry state feeds the first
/// statement; each statement's default exit state feeds the next entry via
/// [`transfer_state`]; a statement's non-default exit (e.g. `Failure`) skips
/// directly to this node's own exit under the same [`ExitType`], matching a
/// CI step's `if: failure()` short-circuit. Analysis repeats the whole chain
/// until no statement's state changes (worklist fixpoint, mirroring
/// `ControlFlowGraphNode.analyse()`).
pub struct ControlFlowGraphNode {
    entry: State,
    exit: HashMap<ExitType, State>,
    statements: Vec<NodeHandle>,
}

impl ControlFlowGraphNode {
    pub fn new(statements: Vec<NodeHandle>) -> Self {
        Self {
            entry: State::new(),
            exit: HashMap::new(),
            statements,
        }
    }

    /// Runs statements to a fixpoint: propagate this node's entry state into
    /// the first statement, analyse each statement in order transferring its
    /// default exit into the next statement's entry, collect non-default
    /// exits directly into this node's own exit map, and repeat until a full
    /// pass produces no change anywhere.
    fn converge(&mut self, ctx: &AnalysisContext) -> bool {
        let mut any_changed = false;
        loop {
            let mut pass_changed = false;
            let mut feed = self.entry.clone();

            for stmt in &self.statements {
                let mut stmt_mut = stmt.borrow_mut();
                {
                    let entry_mut = stmt_mut.entry_state_mut();
                    if transfer_state(&feed, entry_mut, &AllowAll, &ctx.debug_seq, true) {
                        pass_changed = true;
                    }
                }
                if stmt_mut.analyse(ctx) {
                    pass_changed = true;
                }
                for (exit_type, exit_state) in stmt_mut.exit_states() {
                    match exit_type {
                        ExitType::Default => {
                            let mut next_feed = feed.clone();
                            transfer_state(exit_state, &mut next_feed, &AllowAll, &ctx.debug_seq, true);
                            feed = next_feed;
                        }
                        other => {
                            let entry = self.exit.entry(other.clone()).or_insert_with(State::new);
                            if transfer_state(exit_state, entry, &AllowAll, &ctx.debug_seq, true) {
                                pass_changed = true;
                            }
                        }
                    }
                }
            }

            let default_entry = self.exit.entry(ExitType::Default).or_insert_with(State::new);
            if transfer_state(&feed, default_entry, &AllowAll, &ctx.debug_seq, true) {
                pass_changed = true;
            }

            if pass_changed {
                any_changed = true;
            } else {
                break;
            }
        }
        any_changed
    }
}

impl Node for ControlFlowGraphNode {
    fn entry_state(&self) -> &State {
        &self.entry
    }

    fn entry_state_mut(&mut self) -> &mut State {
        &mut self.entry
    }

    fn exit_states(&self) -> &HashMap<ExitType, State> {
        &self.exit
    }

    fn analyse(&mut self, ctx: &AnalysisContext) -> bool {
        self.converge(ctx)
    }
}

/// A branch point (e.g. GitHub Actions job/step matrix expansion, Bash
/// `if`/`case`). Every branch sees the same entry state; this node's exit
/// states are the monotonic join, per [`ExitType`], across all branches —
/// "may have happened on some path" rather than "happened on every path",
/// matching the over-approximating nature of the analysis.
pub struct InterpretationNode {
    entry: State,
    exit: HashMap<ExitType, State>,
    branches: Vec<NodeHandle>,
}

impl InterpretationNode {
    pub fn new(branches: Vec<NodeHandle>) -> Self {
        Self {
            entry: State::new(),
            exit: HashMap::new(),
            branches,
        }
    }
}

impl Node for InterpretationNode {
    fn entry_state(&self) -> &State {
        &self.entry
    }

    fn entry_state_mut(&mut self) -> &mut State {
        &mut self.entry
    }

    fn exit_states(&self) -> &HashMap<ExitType, State> {
        &self.exit
    }

    fn analyse(&mut self, ctx: &AnalysisContext) -> bool {
        let mut changed = false;
        for branch in &self.branches {
            let mut branch_mut = branch.borrow_mut();
            {
                let entry_mut = branch_mut.entry_state_mut();
                if transfer_state(&self.entry, entry_mut, &AllowAll, &ctx.debug_seq, true) {
                    changed = true;
                }
            }
            if branch_mut.analyse(ctx) {
                changed = true;
            }
            for (exit_type, exit_state) in branch_mut.exit_states() {
                let joined = self.exit.entry(exit_type.clone()).or_insert_with(State::new);
                if transfer_state(exit_state, joined, &AllowAll, &ctx.debug_seq, true) {
                    changed = true;
                }
            }
        }
        changed
    }
}

/// Excludes everything at or under a set of scopes when a block-scoped node
/// (e.g. a GitHub Actions job) exits and its locals go out of scope.
pub fn exclude_scopes_filter(
    excluded: std::collections::HashSet<crate::models::scope::Scope>,
) -> Box<dyn StateTransferFilter> {
    Box::new(super::state::ExcludeScopes { excluded })
}
