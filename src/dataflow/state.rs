//! The abstract storage state at some program point: a map from location to
//! the set of values that may be read there, each tagged with a debug label,
//! plus the monotonic join/transfer operations over that map.

use std::cell::Cell;
use std::collections::HashMap;

use crate::models::location::Location;
use crate::models::value::Value;

/// Process/analysis-wide monotonic counter used only to order debug dumps;
/// not used for correctness. Owned per [`crate::dataflow::node::AnalysisContext`]
/// rather than a bare global, for testability.
#[derive(Debug, Default)]
pub struct DebugSequence {
    next: Cell<u64>,
}

impl DebugSequence {
    pub fn new() -> Self {
        Self { next: Cell::new(0) }
    }

    pub fn get(&self) -> u64 {
        self.next.get()
    }

    pub fn increment(&self) {
        self.next.set(self.next.get() + 1);
    }
}

/// Records analysis ordering and whether a fact was copied from elsewhere
/// rather than newly produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugLabel {
    pub sequence_number: u64,
    pub copied: bool,
}

/// Tagged variant describing how execution of a node terminated. `Default`
/// is the ordinary exit; `Failure` lets the GitHub Actions
/// frontend model `if: failure()`/`if: always()` branches
/// without a general-purpose control-flow language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExitType {
    Default,
    Failure,
}

/// Mapping `Location -> { Value -> DebugLabel }`. An empty state is the
/// lattice bottom; join is monotonic subset-union over the inner value sets.
#[derive(Debug, Clone, Default)]
pub struct State {
    facts: HashMap<Location, HashMap<Value, DebugLabel>>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.values().all(|vs| vs.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Location, &HashMap<Value, DebugLabel>)> {
        self.facts.iter()
    }

    pub fn values_at(&self, loc: &Location) -> Option<&HashMap<Value, DebugLabel>> {
        self.facts.get(loc)
    }

    pub fn contains(&self, loc: &Location, value: &Value) -> bool {
        self.facts
            .get(loc)
            .map(|vs| vs.contains_key(value))
            .unwrap_or(false)
    }

    /// Inserts `value` at `loc` with a fresh label, returning whether the
    /// state changed (mirrors the insertion half of `transfer_state`, used
    /// by statement effects when they are not just relaying another state).
    pub fn insert(&mut self, loc: Location, value: Value, label: DebugLabel) -> bool {
        let entry = self.facts.entry(loc).or_default();
        if entry.contains_key(&value) {
            false
        } else {
            entry.insert(value, label);
            true
        }
    }
}

/// Filters out state facts by location at node boundaries.
pub trait StateTransferFilter {
    fn should_transfer(&self, loc: &Location) -> bool;
}

/// Transfers all locations — the default filter.
pub struct AllowAll;

impl StateTransferFilter for AllowAll {
    fn should_transfer(&self, _loc: &Location) -> bool {
        true
    }
}

/// Excludes a fixed set of locations.
pub struct ExcludeLocations {
    pub excluded: std::collections::HashSet<Location>,
}

impl StateTransferFilter for ExcludeLocations {
    fn should_transfer(&self, loc: &Location) -> bool {
        !self.excluded.contains(loc)
    }
}

/// Excludes every location whose scope is in the given set — used at block
/// exits to erase scopes owned by a departing node.
pub struct ExcludeScopes {
    pub excluded: std::collections::HashSet<crate::models::scope::Scope>,
}

impl StateTransferFilter for ExcludeScopes {
    fn should_transfer(&self, loc: &Location) -> bool {
        !self.excluded.contains(&loc.scope)
    }
}

/// For each `(loc, values)` in `src` with `filter.should_transfer(loc)` true,
/// for each `(value, label)` not already in `dest`, inserts it with a fresh
/// label whose `copied` flag is `debug_is_copy`. Returns whether `dest`
/// changed.
///
/// `transfer_state(s, s, _)` is a no-op by construction: every fact already
/// present in `src` is, by the call, already present in `dest` when they are
/// the same state, so the "not in dest" guard never fires.
pub fn transfer_state(
    src: &State,
    dest: &mut State,
    filter: &dyn StateTransferFilter,
    debug_seq: &DebugSequence,
    debug_is_copy: bool,
) -> bool {
    let mut changed = false;
    for (loc, values) in src.facts.iter() {
        if !filter.should_transfer(loc) {
            continue;
        }
        let dest_values = dest.facts.entry(loc.clone()).or_default();
        for (value, label) in values.iter() {
            if !dest_values.contains_key(value) {
                dest_values.insert(
                    value.clone(),
                    DebugLabel {
                        sequence_number: debug_seq.get(),
                        copied: if debug_is_copy { true } else { label.copied },
                    },
                );
                changed = true;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scope::ScopeArena;

    fn sample_state() -> State {
        let arena = ScopeArena::new();
        let scope = arena.new_scope("job");
        let mut s = State::new();
        s.insert(
            Location::filesystem("/tmp/a", scope),
            Value::string_literal("x"),
            DebugLabel {
                sequence_number: 0,
                copied: false,
            },
        );
        s
    }

    #[test]
    fn transfer_into_self_is_a_no_op() {
        let seq = DebugSequence::new();
        let src = sample_state();
        let mut dest = src.clone();
        let changed = transfer_state(&src, &mut dest, &AllowAll, &seq, true);
        assert!(!changed);
        assert_eq!(dest.iter().count(), src.iter().count());
    }

    #[test]
    fn transfer_is_monotonic_join() {
        let seq = DebugSequence::new();
        let src = sample_state();
        let mut dest = State::new();
        assert!(transfer_state(&src, &mut dest, &AllowAll, &seq, true));
        // Re-applying does not re-add or remove anything (subset-join, not overwrite).
        assert!(!transfer_state(&src, &mut dest, &AllowAll, &seq, true));
    }

    #[test]
    fn exclude_locations_filter_drops_matching_facts() {
        let seq = DebugSequence::new();
        let src = sample_state();
        let (loc, _) = src.iter().next().unwrap();
        let mut excluded = std::collections::HashSet::new();
        excluded.insert(loc.clone());
        let filter = ExcludeLocations { excluded };
        let mut dest = State::new();
        let changed = transfer_state(&src, &mut dest, &filter, &seq, true);
        assert!(!changed);
        assert!(dest.is_empty());
    }
}
