//! Walks an analysed dataflow forest to recover build-tool invocations and
//! installed-package facts, using the BFS traversal helpers in
//! [`crate::dataflow::forest`].

use std::collections::HashMap;

use crate::ci::secrets::reachable_secrets;
use crate::dataflow::forest::traverse_bfs;
use crate::dataflow::node::NodeHandle;
use crate::models::location::LocationSpecifier;
use crate::models::scope::Scope;
use crate::models::value::Value;

use super::command::{recognize, stringify_for_sort, tokenize_argv, BuildToolCommand};

const UNRESOLVED_MARKER: &str = "\u{0}UNRESOLVED\u{0}";

/// Renders a `Value` to a best-effort display string: literal text renders
/// as itself, concatenations render recursively, and anything not
/// statically known renders as an unresolved marker so `tokenize_argv` can
/// turn it into [`super::command::UNKNOWN_ARG`] rather than guessing.
pub fn render_display(value: &Value) -> String {
    match value {
        Value::StringLiteral(s) => s.to_string(),
        Value::BinaryStringOp(_, left, right) => {
            format!("{}{}", render_display(left), render_display(right))
        }
        Value::UnaryStringOp(_, inner) => render_display(inner),
        Value::Symbolic(inner) => render_display(inner),
        _ => UNRESOLVED_MARKER.to_string(),
    }
}

/// A recovered fact that a package was installed, with each field rendered
/// best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackageFact {
    pub name: String,
    pub version: String,
    pub distribution: String,
    pub url: String,
}

fn installed_packages_in_state(
    state: &crate::dataflow::State,
    scope_filter: Option<&Scope>,
) -> Vec<InstalledPackageFact> {
    let mut out = Vec::new();
    for (loc, values) in state.iter() {
        if !matches!(loc.specifier, LocationSpecifier::Installed(_)) {
            continue;
        }
        if let Some(scope) = scope_filter {
            if loc.scope != *scope {
                continue;
            }
        }
        for value in values.keys() {
            if let Value::InstalledPackage { name, version, distribution, url } = value {
                out.push(InstalledPackageFact {
                    name: render_display(name),
                    version: render_display(version),
                    distribution: render_display(distribution),
                    url: render_display(url),
                });
            }
        }
    }
    out
}

/// Walks every `StatementNode`/`ControlFlowGraphNode` reachable from
/// `roots`, reading each node's default-exit state and extracting
/// `BuildToolCommand`s from console writes. For each match,
/// `job_scopes` identifies the enclosing job by comparing scope identity
/// against the command location's scope (`step_node`), `workflow_var_scope`
/// locates reachable `secrets.*` reads at that same location, and installed-
/// language facts reachable at the location are harvested into the
/// `language_*` fields. The returned sequence is sorted by stringified form
/// for determinism.
pub fn detect_build_tools(
    ci_path: &str,
    roots: Vec<NodeHandle>,
    job_scopes: &HashMap<String, Scope>,
    workflow_var_scope: &Scope,
    events: &[String],
) -> Vec<BuildToolCommand> {
    let mut out = Vec::new();
    let order = traverse_bfs(roots, |_| Vec::new());
    for node in order {
        let node = node.borrow();
        let Some(default_exit) = node.exit_states().get(&crate::dataflow::ExitType::Default) else {
            continue;
        };
        for (loc, values) in default_exit.iter() {
            if loc.specifier != LocationSpecifier::Console {
                continue;
            }
            for value in values.keys() {
                let rendered = render_display(value);
                let argv = tokenize_argv(&rendered);
                let Some(mut cmd) = recognize(&argv) else {
                    continue;
                };

                cmd.ci_path = ci_path.to_string();
                cmd.step_node = job_scopes
                    .iter()
                    .find(|(_, scope)| **scope == loc.scope)
                    .map(|(name, _)| name.clone());
                cmd.events = events.to_vec();

                let mut secrets: Vec<String> =
                    reachable_secrets(default_exit, &loc.scope, workflow_var_scope).into_iter().collect();
                secrets.sort();
                cmd.reachable_secrets = secrets;

                let installed = installed_packages_in_state(default_exit, Some(&loc.scope));
                if let Some(first) = installed.first() {
                    cmd.language = Some(first.name.clone());
                    if !first.url.is_empty() {
                        cmd.language_url = Some(first.url.clone());
                    }
                }
                cmd.language_versions = installed.iter().map(|p| p.version.clone()).filter(|v| !v.is_empty()).collect();
                cmd.language_distributions =
                    installed.iter().map(|p| p.distribution.clone()).filter(|d| !d.is_empty()).collect();

                out.push(cmd);
            }
        }
    }
    out.sort_by(|a, b| stringify_for_sort(a).cmp(&stringify_for_sort(b)));
    out
}

pub fn detect_installed_packages(roots: Vec<NodeHandle>) -> Vec<InstalledPackageFact> {
    let mut out = Vec::new();
    let order = traverse_bfs(roots, |_| Vec::new());
    for node in order {
        let node = node.borrow();
        if let Some(default_exit) = node.exit_states().get(&crate::dataflow::ExitType::Default) {
            out.extend(installed_packages_in_state(default_exit, None));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_pure_literal_concat() {
        let v = Value::concat(Value::string_literal("mvn "), Value::string_literal("deploy"));
        assert_eq!(render_display(&v), "mvn deploy");
    }

    #[test]
    fn renders_unresolved_read_as_marker() {
        let arena = crate::models::scope::ScopeArena::new();
        let scope = arena.new_scope("s");
        let v = Value::read(crate::models::location::Location::variable("X", scope));
        assert_eq!(render_display(&v), UNRESOLVED_MARKER);
    }

    #[test]
    fn build_tool_command_carries_ci_context() {
        use crate::ci::github_actions::{build_workflow_forest, parse_workflow};
        use crate::dataflow::{AnalysisContext, Node};

        const WORKFLOW: &str = r#"
name: CI
on: push
jobs:
  publish:
    steps:
      - run: npm publish --token ${{ secrets.NPM_TOKEN }}
"#;
        let workflow = parse_workflow(WORKFLOW).unwrap();
        let ctx = AnalysisContext::new();
        let (jobs, scopes) = build_workflow_forest(&workflow, &ctx);
        let job_node = jobs.get("publish").unwrap().clone();
        job_node.borrow_mut().analyse(&ctx);

        let commands = detect_build_tools(
            ".github/workflows/ci.yml",
            vec![job_node],
            &scopes.job_scopes,
            &scopes.workflow_var_scope,
            &["push".to_string()],
        );

        assert_eq!(commands.len(), 1);
        let cmd = &commands[0];
        assert_eq!(cmd.ci_path, ".github/workflows/ci.yml");
        assert_eq!(cmd.step_node.as_deref(), Some("publish"));
        assert!(cmd.deploy_like);
        assert_eq!(cmd.reachable_secrets, vec!["NPM_TOKEN".to_string()]);
        assert_eq!(cmd.events, vec!["push".to_string()]);
    }
}
