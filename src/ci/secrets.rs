//! Secret reachability analysis: walks the `secrets.*` reads visible from a
//! job's console/artifact/filesystem writes to determine which secrets
//! actually reach somewhere observable.

use std::collections::HashSet;

use crate::models::location::{Location, LocationSpecifier};
use crate::models::scope::Scope;
use crate::models::value::Value;

/// Walks a [`Value`] tree collecting the names of any `secrets.*` variable
/// reads scoped to `workflow_var_scope`.
pub struct FindSecretsVisitor<'a> {
    workflow_var_scope: &'a Scope,
    pub secrets: HashSet<String>,
}

impl<'a> FindSecretsVisitor<'a> {
    pub fn new(workflow_var_scope: &'a Scope) -> Self {
        Self {
            workflow_var_scope,
            secrets: HashSet::new(),
        }
    }

    pub fn visit_value(&mut self, value: &Value) {
        match value {
            Value::StringLiteral(_) | Value::ArbitraryNewData(_) | Value::ParameterPlaceholder(_) => {}
            Value::Read(loc) => {
                self.visit_location(loc);
                if loc.scope == *self.workflow_var_scope {
                    if let LocationSpecifier::Variable(name) = &loc.specifier {
                        if let Value::StringLiteral(name) = name.as_ref() {
                            if let Some(secret) = name.strip_prefix("secrets.") {
                                self.secrets.insert(secret.to_string());
                            }
                        }
                    }
                }
            }
            Value::UnaryStringOp(_, operand) => self.visit_value(operand),
            Value::BinaryStringOp(_, left, right) => {
                self.visit_value(left);
                self.visit_value(right);
            }
            Value::InstalledPackage { name, version, distribution, url } => {
                self.visit_value(name);
                self.visit_value(version);
                self.visit_value(distribution);
                self.visit_value(url);
            }
            Value::Symbolic(inner) | Value::SingleBashTokenConstraint(inner) => self.visit_value(inner),
        }
    }

    pub fn visit_location(&mut self, location: &Location) {
        match &location.specifier {
            LocationSpecifier::Filesystem(path)
            | LocationSpecifier::FilesystemAnyUnderDir(path)
            | LocationSpecifier::Variable(path)
            | LocationSpecifier::ArtifactAnyFilename(path)
            | LocationSpecifier::Installed(path) => self.visit_value(path),
            LocationSpecifier::Artifact(name, file) => {
                self.visit_value(name);
                self.visit_value(file);
            }
            LocationSpecifier::ParameterPlaceholder(_) | LocationSpecifier::Console => {}
        }
    }
}

/// Returns every `secrets.*` name reachable in the values stored, within
/// `env_scope`, at the given dataflow state.
pub fn reachable_secrets<'a>(
    state: &'a crate::dataflow::State,
    env_scope: &Scope,
    workflow_var_scope: &Scope,
) -> HashSet<String> {
    let mut result = HashSet::new();
    for (loc, values) in state.iter() {
        if loc.scope != *env_scope {
            continue;
        }
        for value in values.keys() {
            let mut visitor = FindSecretsVisitor::new(workflow_var_scope);
            visitor.visit_value(value);
            result.extend(visitor.secrets.drain());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scope::ScopeArena;

    #[test]
    fn finds_secret_read_in_same_scope() {
        let arena = ScopeArena::new();
        let workflow_scope = arena.new_scope("workflow-vars");
        let secret_value = Value::read(Location::variable("secrets.NPM_TOKEN", workflow_scope.clone()));

        let mut visitor = FindSecretsVisitor::new(&workflow_scope);
        visitor.visit_value(&secret_value);
        assert!(visitor.secrets.contains("NPM_TOKEN"));
    }

    #[test]
    fn ignores_secret_read_in_different_scope() {
        let arena = ScopeArena::new();
        let workflow_scope = arena.new_scope("workflow-vars");
        let other_scope = arena.new_scope("env");
        let secret_value = Value::read(Location::variable("secrets.NPM_TOKEN", other_scope));

        let mut visitor = FindSecretsVisitor::new(&workflow_scope);
        visitor.visit_value(&secret_value);
        assert!(visitor.secrets.is_empty());
    }

    #[test]
    fn recurses_through_concat() {
        let arena = ScopeArena::new();
        let workflow_scope = arena.new_scope("workflow-vars");
        let secret_value = Value::read(Location::variable("secrets.TOKEN", workflow_scope.clone()));
        let concat = Value::concat(Value::string_literal("Bearer "), secret_value);

        let mut visitor = FindSecretsVisitor::new(&workflow_scope);
        visitor.visit_value(&concat);
        assert!(visitor.secrets.contains("TOKEN"));
    }
}
