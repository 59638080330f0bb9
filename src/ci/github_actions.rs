//! GitHub Actions workflow model and dataflow-forest construction: parses
//! the public workflow YAML schema into [`Workflow`]/[`Job`]/[`Step`], then
//! turns each job into a forest of [`crate::dataflow::Node`]s whose effects
//! model `env:`, `${{ }}` expressions, `run:` scripts (via
//! [`crate::ci::bash`]), and a handful of well-known actions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::VarAssignKind;
use crate::dataflow::node::{AnalysisContext, ControlFlowGraphNode, NodeHandle, StatementNode};
use crate::dataflow::state::{DebugLabel, State};
use crate::models::location::Location;
use crate::models::scope::Scope;
use crate::models::value::Value;

/// Third-party actions known to perform OIDC-based "trusted publishing" —
/// i.e. they obtain short-lived credentials from the registry itself rather
/// than relying on a long-lived secret, so a workflow step using one of
/// these does not need `secrets.*` reachability to be considered a trusted
/// deployment.
pub const TRUSTED_PUBLISH_ACTIONS: &[&str] = &[
    "pypa/gh-action-pypi-publish",
    "actions/attest-build-provenance",
    "slsa-framework/slsa-github-generator",
    "softprops/action-gh-release",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => vec![s],
            StringOrList::Many(v) => v,
        }
    }
}

/// The `on:` trigger field, which GitHub Actions accepts as a bare string, a
/// list of event names, or a map from event name to its configuration
/// (`push: { branches: [main] }`) — only the event names matter here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OnField {
    One(String),
    Many(Vec<String>),
    Mapped(HashMap<String, serde_yaml::Value>),
}

impl OnField {
    pub fn event_names(&self) -> Vec<String> {
        match self {
            OnField::One(name) => vec![name.clone()],
            OnField::Many(names) => names.clone(),
            OnField::Mapped(map) => map.keys().cloned().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Workflow {
    pub name: Option<String>,
    #[serde(rename = "on", default)]
    pub on: Option<OnField>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub jobs: HashMap<String, Job>,
}

impl Workflow {
    /// Event names this workflow triggers on, sorted for deterministic
    /// output; empty if `on:` was absent or malformed.
    pub fn event_names(&self) -> Vec<String> {
        let mut names = self.on.as_ref().map(OnField::event_names).unwrap_or_default();
        names.sort();
        names
    }
}

#[derive(Debug, Deserialize)]
pub struct Job {
    pub name: Option<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(rename = "needs", default)]
    pub needs: Option<StringOrList>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    pub id: Option<String>,
    pub name: Option<String>,
    pub uses: Option<String>,
    pub run: Option<String>,
    #[serde(rename = "if")]
    pub if_condition: Option<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub with: HashMap<String, String>,
}

pub fn parse_workflow(yaml: &str) -> Result<Workflow, crate::error::CiParseError> {
    serde_yaml::from_str(yaml).map_err(crate::error::CiParseError::Workflow)
}

/// Scopes a workflow's dataflow is carved into: one shared workflow-level
/// scope for `secrets`/`vars`, a `github.*` context scope, and one env/job
/// scope per job.
pub struct WorkflowScopes {
    pub workflow_var_scope: Scope,
    pub github_context_scope: Scope,
    pub job_scopes: HashMap<String, Scope>,
}

impl WorkflowScopes {
    pub fn build(workflow: &Workflow, ctx: &AnalysisContext) -> Self {
        let workflow_var_scope = ctx.scopes.new_scope("workflow-vars");
        let github_context_scope = ctx.scopes.new_scope("github-context");
        let job_scopes = workflow
            .jobs
            .keys()
            .map(|name| (name.clone(), ctx.scopes.new_scope(format!("job:{name}"))))
            .collect();
        Self {
            workflow_var_scope,
            github_context_scope,
            job_scopes,
        }
    }
}

static EXPR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{\{\s*(.+?)\s*\}\}").unwrap());

/// Resolves a single `${{ ... }}` expression reference into a dataflow
/// [`Value`]. This models reference extraction, not full GitHub Actions
/// expression evaluation (no operators, functions or literals inside the
/// braces are interpreted) — sufficient for tracking where secrets/env/step
/// outputs flow to, which is what the check corpus needs.
fn classify_expr(expr: &str, scopes: &WorkflowScopes, job_scope: &Scope) -> Value {
    let expr = expr.trim();
    if let Some(rest) = expr.strip_prefix("secrets.") {
        Value::read(Location::variable(
            format!("secrets.{rest}"),
            scopes.workflow_var_scope.clone(),
        ))
    } else if let Some(rest) = expr.strip_prefix("vars.") {
        Value::read(Location::variable(
            format!("vars.{rest}"),
            scopes.workflow_var_scope.clone(),
        ))
    } else if let Some(rest) = expr.strip_prefix("env.") {
        Value::read(Location::variable(rest, job_scope.clone()))
    } else if let Some(rest) = expr.strip_prefix("github.") {
        Value::read(Location::variable(
            format!("github.{rest}"),
            scopes.github_context_scope.clone(),
        ))
    } else if let Some(rest) = expr.strip_prefix("steps.") {
        Value::read(Location::variable(format!("steps.{rest}"), job_scope.clone()))
    } else if let Some(rest) = expr.strip_prefix("inputs.") {
        Value::read(Location::variable(format!("inputs.{rest}"), job_scope.clone()))
    } else {
        Value::symbolic(Value::arbitrary_new_data(format!("expr:{expr}")))
    }
}

/// Splits `text` on `${{ ... }}` boundaries and concatenates literal
/// segments with resolved expression reads.
fn interpolate(text: &str, scopes: &WorkflowScopes, job_scope: &Scope) -> Value {
    let mut result: Option<Value> = None;
    let mut last_end = 0;
    for caps in EXPR_RE.captures_iter(text) {
        let m = caps.get(0).unwrap();
        let literal_before = &text[last_end..m.start()];
        if !literal_before.is_empty() {
            result = Some(match result {
                Some(v) => Value::concat(v, Value::string_literal(literal_before)),
                None => Value::string_literal(literal_before),
            });
        }
        let expr_value = classify_expr(&caps[1], scopes, job_scope);
        result = Some(match result {
            Some(v) => Value::concat(v, expr_value),
            None => expr_value,
        });
        last_end = m.end();
    }
    let tail = &text[last_end..];
    if !tail.is_empty() || result.is_none() {
        result = Some(match result {
            Some(v) => Value::concat(v, Value::string_literal(tail)),
            None => Value::string_literal(tail),
        });
    }
    result.unwrap()
}

/// Rewrites every `${{ expr }}` occurrence in a `run:` script into a
/// `${__GHA_EXPR_n}` Bash variable reference, returning the rewritten text
/// alongside the `(placeholder name, resolved value)` pairs that must be
/// seeded into the job scope before the Bash frontend sees the script.
/// This is how a run step's shell actually receives expression values: GitHub
/// substitutes `${{ }}` textually before the shell ever runs, so routing the
/// rewritten text through [`crate::ci::bash::build_bash_script_node`]
/// models that substitution instead of bypassing Bash parsing entirely.
fn rewrite_run_with_placeholders(
    run: &str,
    scopes: &WorkflowScopes,
    job_scope: &Scope,
) -> (String, Vec<(String, Value)>) {
    let mut rewritten = String::new();
    let mut last_end = 0;
    let mut placeholders = Vec::new();
    for (i, caps) in EXPR_RE.captures_iter(run).enumerate() {
        let m = caps.get(0).unwrap();
        rewritten.push_str(&run[last_end..m.start()]);
        let placeholder = format!("__GHA_EXPR_{i}");
        let value = classify_expr(&caps[1], scopes, job_scope);
        placeholders.push((placeholder.clone(), value));
        rewritten.push_str(&format!("${{{placeholder}}}"));
        last_end = m.end();
    }
    rewritten.push_str(&run[last_end..]);
    (rewritten, placeholders)
}

/// The effect of a step's `env:` map and `uses:` invocation. `run:` scripts
/// are handled separately by [`build_job_node`], which routes them through
/// the Bash frontend rather than folding them into this closure.
fn step_effect(
    step_env: HashMap<String, String>,
    step_with: HashMap<String, String>,
    uses: Option<String>,
    job_scope: Scope,
    workflow_var_scope: Scope,
    github_context_scope: Scope,
) -> State {
    let scopes = WorkflowScopes {
        workflow_var_scope,
        github_context_scope,
        job_scopes: HashMap::new(),
    };
    let mut state = State::new();
    let label = DebugLabel {
        sequence_number: 0,
        copied: false,
    };

    for (name, value) in &step_env {
        let resolved = interpolate(value, &scopes, &job_scope);
        tracing::trace!(kind = ?VarAssignKind::GithubEnvVar, %name, "step env");
        state.insert(Location::variable(name.clone(), job_scope.clone()), resolved, label);
    }

    if let Some(uses) = &uses {
        let action_name = uses.split('@').next().unwrap_or(uses);
        match action_name {
            "actions/upload-artifact" => {
                let artifact_name = step_with
                    .get("name")
                    .cloned()
                    .unwrap_or_else(|| "artifact".to_string());
                let path = step_with.get("path").cloned().unwrap_or_default();
                let source = interpolate(&path, &scopes, &job_scope);
                state.insert(
                    Location::artifact(artifact_name, "*", job_scope.clone()),
                    source,
                    label,
                );
            }
            "actions/download-artifact" => {
                let artifact_name = step_with
                    .get("name")
                    .cloned()
                    .unwrap_or_else(|| "artifact".to_string());
                let path = step_with.get("path").cloned().unwrap_or_else(|| ".".to_string());
                state.insert(
                    Location::filesystem(path, job_scope.clone()),
                    Value::read(Location::artifact(artifact_name, "*", job_scope.clone())),
                    label,
                );
            }
            "actions/checkout" => {}
            other if TRUSTED_PUBLISH_ACTIONS.contains(&other) => {
                state.insert(
                    Location::console(job_scope.clone()),
                    Value::arbitrary_new_data(format!("trusted-publish:{other}")),
                    label,
                );
            }
            other => {
                state.insert(
                    Location::console(job_scope),
                    Value::symbolic(Value::arbitrary_new_data(format!("uses:{other}"))),
                    label,
                );
            }
        }
    }

    state
}

/// Builds the prelude statement that seeds `entries` (job- or step-level
/// `env:` values, or run-step expression placeholders) into `scope`, tagged
/// for trace visibility with `kind`.
fn env_prelude_node(
    entries: Vec<(String, Value)>,
    scope: Scope,
    kind: VarAssignKind,
) -> NodeHandle {
    let effect: Box<dyn Fn(&State, &AnalysisContext) -> State> = Box::new(move |_entry, _ctx| {
        let mut state = State::new();
        let label = DebugLabel {
            sequence_number: 0,
            copied: false,
        };
        for (name, value) in &entries {
            tracing::trace!(?kind, %name, "github actions env write");
            state.insert(Location::variable(name.clone(), scope.clone()), value.clone(), label);
        }
        state
    });
    Rc::new(RefCell::new(StatementNode::new(effect)))
}

/// Builds one [`ControlFlowGraphNode`] per job: a job-level `env:` prelude,
/// then each step's `env:`/`uses:` effect, and — for steps with a `run:` —
/// an expression-placeholder prelude followed by the Bash frontend's
/// forest for the rewritten script.
pub fn build_job_node(job: &Job, job_name: &str, scopes: &WorkflowScopes, ctx: &AnalysisContext) -> NodeHandle {
    let job_scope = scopes
        .job_scopes
        .get(job_name)
        .cloned()
        .expect("job scope must have been pre-allocated by WorkflowScopes::build");
    let workflow_var_scope = scopes.workflow_var_scope.clone();
    let github_context_scope = scopes.github_context_scope.clone();

    let mut statements: Vec<NodeHandle> = Vec::new();

    if !job.env.is_empty() {
        let resolve_scopes = WorkflowScopes {
            workflow_var_scope: workflow_var_scope.clone(),
            github_context_scope: github_context_scope.clone(),
            job_scopes: HashMap::new(),
        };
        let entries: Vec<(String, Value)> = job
            .env
            .iter()
            .map(|(name, value)| (name.clone(), interpolate(value, &resolve_scopes, &job_scope)))
            .collect();
        statements.push(env_prelude_node(entries, job_scope.clone(), VarAssignKind::GithubJobVar));
    }

    for step in &job.steps {
        let env = step.env.clone();
        let with = step.with.clone();
        let uses = step.uses.clone();
        let job_scope_inner = job_scope.clone();
        let workflow_var_scope_inner = workflow_var_scope.clone();
        let github_context_scope_inner = github_context_scope.clone();
        let effect: Box<dyn Fn(&State, &AnalysisContext) -> State> = Box::new(move |_entry, _ctx| {
            step_effect(
                env.clone(),
                with.clone(),
                uses.clone(),
                job_scope_inner.clone(),
                workflow_var_scope_inner.clone(),
                github_context_scope_inner.clone(),
            )
        });
        statements.push(Rc::new(RefCell::new(StatementNode::new(effect))));

        if let Some(run) = &step.run {
            let resolve_scopes = WorkflowScopes {
                workflow_var_scope: workflow_var_scope.clone(),
                github_context_scope: github_context_scope.clone(),
                job_scopes: HashMap::new(),
            };
            let (rewritten, placeholders) = rewrite_run_with_placeholders(run, &resolve_scopes, &job_scope);
            if !placeholders.is_empty() {
                statements.push(env_prelude_node(placeholders, job_scope.clone(), VarAssignKind::Other));
            }
            statements.push(crate::ci::bash::build_bash_script_node(&rewritten, job_scope.clone(), ctx));
        }
    }

    Rc::new(RefCell::new(ControlFlowGraphNode::new(statements)))
}

/// Builds one job node per job in the workflow, keyed by job name.
pub fn build_workflow_forest(
    workflow: &Workflow,
    ctx: &AnalysisContext,
) -> (HashMap<String, NodeHandle>, WorkflowScopes) {
    let scopes = WorkflowScopes::build(workflow, ctx);
    let jobs = workflow
        .jobs
        .iter()
        .map(|(name, job)| (name.clone(), build_job_node(job, name, &scopes, ctx)))
        .collect();
    (jobs, scopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::Node;

    const SAMPLE: &str = r#"
name: CI
on: push
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - name: build
        run: echo "token is ${{ secrets.NPM_TOKEN }}"
      - uses: actions/upload-artifact@v4
        with:
          name: dist
          path: dist/
"#;

    #[test]
    fn parses_sample_workflow() {
        let workflow = parse_workflow(SAMPLE).unwrap();
        assert_eq!(workflow.jobs.len(), 1);
        assert_eq!(workflow.jobs["build"].steps.len(), 3);
        assert_eq!(workflow.event_names(), vec!["push".to_string()]);
    }

    #[test]
    fn parses_event_list_and_mapped_on_field() {
        let list_form = parse_workflow("on: [push, pull_request]\njobs: {}\n").unwrap();
        assert_eq!(list_form.event_names(), vec!["pull_request".to_string(), "push".to_string()]);

        let mapped_form = parse_workflow("on:\n  push:\n    branches: [main]\n  release:\n    types: [published]\njobs: {}\n").unwrap();
        assert_eq!(mapped_form.event_names(), vec!["push".to_string(), "release".to_string()]);
    }

    #[test]
    fn run_step_reads_secret_into_console() {
        let workflow = parse_workflow(SAMPLE).unwrap();
        let ctx = AnalysisContext::new();
        let (jobs, scopes) = build_workflow_forest(&workflow, &ctx);
        let job_node = jobs.get("build").unwrap();
        job_node.borrow_mut().analyse(&ctx);

        let exit = job_node.borrow();
        let default_exit = exit
            .exit_states()
            .get(&crate::dataflow::ExitType::Default)
            .unwrap();
        let console = Location::console(scopes.job_scopes["build"].clone());
        assert!(default_exit.values_at(&console).is_some());
    }

    #[test]
    fn run_step_secret_reference_is_seeded_before_the_bash_frontend_runs() {
        let workflow = parse_workflow(SAMPLE).unwrap();
        let ctx = AnalysisContext::new();
        let (jobs, scopes) = build_workflow_forest(&workflow, &ctx);
        let job_node = jobs.get("build").unwrap();
        job_node.borrow_mut().analyse(&ctx);
        job_node.borrow_mut().analyse(&ctx);

        let exit = job_node.borrow();
        let default_exit = exit.exit_states().get(&crate::dataflow::ExitType::Default).unwrap();
        let placeholder = Location::variable("__GHA_EXPR_0", scopes.job_scopes["build"].clone());
        assert!(default_exit.values_at(&placeholder).is_some());
    }

    #[test]
    fn job_env_is_seeded_with_github_job_var_kind() {
        let yaml = r#"
on: push
jobs:
  build:
    env:
      BUILD_MODE: release
    steps:
      - run: echo $BUILD_MODE
"#;
        let workflow = parse_workflow(yaml).unwrap();
        let ctx = AnalysisContext::new();
        let (jobs, scopes) = build_workflow_forest(&workflow, &ctx);
        let job_node = jobs.get("build").unwrap();
        job_node.borrow_mut().analyse(&ctx);
        job_node.borrow_mut().analyse(&ctx);

        let exit = job_node.borrow();
        let default_exit = exit.exit_states().get(&crate::dataflow::ExitType::Default).unwrap();
        let loc = Location::variable("BUILD_MODE", scopes.job_scopes["build"].clone());
        assert!(default_exit.values_at(&loc).is_some());
    }

    #[test]
    fn interpolate_with_no_expression_is_literal() {
        let ctx = AnalysisContext::new();
        let scope = ctx.scopes.new_scope("x");
        let scopes = WorkflowScopes {
            workflow_var_scope: ctx.scopes.new_scope("wf"),
            github_context_scope: ctx.scopes.new_scope("gh"),
            job_scopes: HashMap::new(),
        };
        assert_eq!(interpolate("hello", &scopes, &scope), Value::string_literal("hello"));
    }
}
