//! The check registry: validates check id shape and parent/child
//! relationships, computes topological execution order, and resolves
//! include/exclude glob patterns into a final check set.

use std::collections::{HashMap, HashSet};

use globset::Glob;
use once_cell::sync::Lazy;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use regex::Regex;

use crate::error::RegistryError;

use super::facts::CheckResultType;

static ID_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^mcn_([a-z]+_)+[0-9]+$").unwrap());

/// A single registered check's static metadata: its id and which other
/// checks it depends on, each tagged with the parent result it requires.
#[derive(Debug, Clone)]
pub struct CheckDescriptor {
    pub check_id: String,
    pub depends_on: Vec<(String, CheckResultType)>,
    pub result_on_skip: CheckResultType,
}

pub fn validate_check_id_format(check_id: &str) -> bool {
    ID_FORMAT.is_match(check_id)
}

#[derive(Default)]
pub struct Registry {
    checks: HashMap<String, CheckDescriptor>,
    /// parent_id -> { child_id -> expected parent result }
    relationships: HashMap<String, HashMap<String, CheckResultType>>,
    pub execution_order: Vec<String>,
    pub checks_to_run: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `check`, validating its id format and that its declared
    /// parents are not itself and do not double-declare a relationship.
    pub fn register(&mut self, check: CheckDescriptor) -> Result<(), RegistryError> {
        if !validate_check_id_format(&check.check_id) {
            return Err(RegistryError::InvalidIdFormat(check.check_id.clone()));
        }
        if self.checks.contains_key(&check.check_id) {
            return Err(RegistryError::DuplicateCheck(check.check_id.clone()));
        }

        for (parent_id, expected) in &check.depends_on {
            if parent_id == &check.check_id {
                return Err(RegistryError::UnknownRelationship(
                    check.check_id.clone(),
                    parent_id.clone(),
                ));
            }
            let entry = self.relationships.entry(parent_id.clone()).or_default();
            if entry.contains_key(&check.check_id) {
                return Err(RegistryError::UnknownRelationship(
                    check.check_id.clone(),
                    parent_id.clone(),
                ));
            }
            entry.insert(check.check_id.clone(), *expected);
        }

        self.relationships.entry(check.check_id.clone()).or_default();
        self.checks.insert(check.check_id.clone(), check);
        Ok(())
    }

    pub fn get_parents(&self, check_id: &str) -> HashSet<String> {
        self.checks
            .get(check_id)
            .map(|c| c.depends_on.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn get_children(&self, check_id: &str) -> HashSet<String> {
        self.relationships
            .get(check_id)
            .map(|children| children.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns `node` plus every node transitively reachable from it via
    /// `get_successors`, visited depth-first (mirrors the iterative
    /// stack-based walk in the original so the traversal order matches).
    pub fn reachable_nodes(
        &self,
        node: &str,
        get_successors: impl Fn(&Self, &str) -> HashSet<String>,
    ) -> HashSet<String> {
        let mut visited = HashSet::new();
        let mut stack = vec![node.to_string()];
        while let Some(current) = stack.pop() {
            if visited.contains(&current) {
                continue;
            }
            visited.insert(current.clone());
            for successor in get_successors(self, &current) {
                if !visited.contains(&successor) {
                    stack.push(successor);
                }
            }
        }
        visited
    }

    /// Resolves include/exclude glob patterns against registered check ids.
    /// Including a check transitively includes its parents; excluding a
    /// check transitively excludes its children. The final set is
    /// `include - exclude`.
    pub fn get_final_checks(&self, exclude_patterns: &[String], include_patterns: &[String]) -> Vec<String> {
        let all_checks: Vec<String> = self.checks.keys().cloned().collect();

        if include_patterns.iter().any(|p| p == "*") && exclude_patterns.is_empty() {
            return all_checks;
        }
        if exclude_patterns.iter().any(|p| p == "*") {
            return Vec::new();
        }

        let matches = |patterns: &[String]| -> HashSet<String> {
            let mut matched = HashSet::new();
            for pattern in patterns {
                if let Ok(glob) = Glob::new(pattern) {
                    let matcher = glob.compile_matcher();
                    for id in &all_checks {
                        if matcher.is_match(id) {
                            matched.insert(id.clone());
                        }
                    }
                }
            }
            matched
        };

        let direct_exclude = matches(exclude_patterns);
        let mut transitive_exclude = HashSet::new();
        for id in &direct_exclude {
            transitive_exclude.extend(self.reachable_nodes(id, |r, c| r.get_children(c)));
        }

        let direct_include = matches(include_patterns);
        let mut transitive_include = direct_include.clone();
        for id in &direct_include {
            transitive_include.extend(self.reachable_nodes(id, |r, c| r.get_parents(c)));
        }

        let mut exclude = direct_exclude;
        exclude.extend(transitive_exclude);

        transitive_include.difference(&exclude).cloned().collect()
    }

    /// Topologically sorts the full dependency graph (parents before
    /// children). A cycle is reported as [`RegistryError::Cycle`].
    pub fn get_check_execution_order(&self) -> Result<Vec<String>, RegistryError> {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut indices: HashMap<String, NodeIndex> = HashMap::new();
        for id in self.checks.keys() {
            let idx = graph.add_node(id.clone());
            indices.insert(id.clone(), idx);
        }
        for (parent, children) in &self.relationships {
            let Some(&parent_idx) = indices.get(parent) else {
                continue;
            };
            for child in children.keys() {
                if let Some(&child_idx) = indices.get(child) {
                    graph.add_edge(parent_idx, child_idx, ());
                }
            }
        }
        toposort(&graph, None)
            .map(|order| order.into_iter().map(|idx| graph[idx].clone()).collect())
            .map_err(|_| RegistryError::Cycle)
    }

    /// Computes `execution_order` and `checks_to_run`, failing if no checks
    /// are registered, the dependency graph has a cycle, or the
    /// include/exclude patterns resolve to an empty set.
    pub fn prepare(&mut self, exclude_patterns: &[String], include_patterns: &[String]) -> Result<(), RegistryError> {
        if self.checks.is_empty() {
            return Err(RegistryError::Cycle);
        }
        self.execution_order = self.get_check_execution_order()?;
        self.checks_to_run = self.get_final_checks(exclude_patterns, include_patterns);
        Ok(())
    }
}
