//! A conservative Bash frontend: turns a script into a sequence of
//! single-command statement nodes without executing anything. Tokenization
//! is hand-rolled rather than pulled from a shell-parsing crate, matching
//! the rest of the engine's built-from-scratch abstract-interpretation
//! style.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::VarAssignKind;
use crate::dataflow::node::{
    AnalysisContext, ControlFlowGraphNode, InterpretationNode, NodeHandle, StatementNode,
};
use crate::dataflow::state::{DebugLabel, State};
use crate::models::location::Location;
use crate::models::scope::Scope;
use crate::models::value::Value;

static VAR_REF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?").unwrap());
static ASSIGNMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)=(.*)$").unwrap());
static FUNC_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:function\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*\(\)\s*\{?\s*$").unwrap()
});
static REDIRECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(>{1,2})\s*(\S+)\s*$").unwrap());
static SUBSHELL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\(([^()]*)\)|`([^`]*)`").unwrap());
static ECHO_KV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^echo\s+"?([A-Za-z_][A-Za-z0-9_]*)=(.*?)"?$"#).unwrap());

/// Splits raw script text into logical lines, dropping blank lines, pure
/// comments, and shebangs.
fn split_statements(script: &str) -> Vec<String> {
    script
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_string())
        .collect()
}

/// Resolves every `$VAR`/`${VAR}` reference in `text` into a [`Value`]
/// concatenation of literal segments and variable reads, and likewise folds
/// `$(...)`/backtick command substitutions into opaque symbolic data (the
/// engine does not recursively analyse the inner command).
fn interpolate(text: &str, scope: &Scope) -> Value {
    let mut without_subshells = String::new();
    let mut last_end = 0;
    for caps in SUBSHELL_RE.captures_iter(text) {
        let m = caps.get(0).unwrap();
        without_subshells.push_str(&text[last_end..m.start()]);
        without_subshells.push_str("\u{0}SUBSHELL\u{0}");
        last_end = m.end();
    }
    without_subshells.push_str(&text[last_end..]);

    let mut result: Option<Value> = None;
    let mut cursor = 0;
    for caps in VAR_REF_RE.captures_iter(&without_subshells) {
        let m = caps.get(0).unwrap();
        let literal = &without_subshells[cursor..m.start()];
        if !literal.is_empty() {
            result = Some(append_literal(result, literal));
        }
        let var_name = &caps[1];
        let read = Value::read(Location::variable(var_name.to_string(), scope.clone()));
        result = Some(match result {
            Some(v) => Value::concat(v, read),
            None => read,
        });
        cursor = m.end();
    }
    let tail = &without_subshells[cursor..];
    if !tail.is_empty() || result.is_none() {
        result = Some(append_literal(result, tail));
    }

    let joined = result.unwrap();
    if without_subshells.contains("\u{0}SUBSHELL\u{0}") {
        Value::concat(joined, Value::symbolic(Value::arbitrary_new_data("subshell-output")))
    } else {
        joined
    }
}

fn append_literal(existing: Option<Value>, literal: &str) -> Value {
    match existing {
        Some(v) => Value::concat(v, Value::string_literal(literal)),
        None => Value::string_literal(literal),
    }
}

/// True if a redirect target names the `$GITHUB_ENV` step-communication
/// file, with or without quoting/braces.
fn targets_github_env(target: &str) -> bool {
    matches!(
        target.trim_matches(|c| c == '"' || c == '\''),
        "$GITHUB_ENV" | "${GITHUB_ENV}"
    )
}

/// The effect of one logical Bash line: a plain variable assignment, a
/// function declaration, an `echo ... >> $GITHUB_ENV` step-env write, a
/// redirect to a filesystem path, or an ordinary command. Each classified
/// variable write is tagged with its [`VarAssignKind`] for trace
/// visibility; this is what a [`BashSingleCommandNode`] is for each of
/// the interpretation's branches.
fn statement_effect(line: String, scope: Scope) -> State {
    let mut state = State::new();
    let label = DebugLabel {
        sequence_number: 0,
        copied: false,
    };

    if let Some(caps) = FUNC_DECL_RE.captures(&line) {
        let name = caps[1].to_string();
        tracing::trace!(kind = ?VarAssignKind::BashFuncDecl, %name, "bash function declaration");
        state.insert(
            Location::variable(name, scope),
            Value::arbitrary_new_data(format!("func:{}", &caps[1])),
            label,
        );
        return state;
    }

    if let Some(caps) = REDIRECT_RE.captures(&line) {
        let target = caps[2].to_string();
        if targets_github_env(&target) {
            let command = REDIRECT_RE.replace(&line, "").trim().to_string();
            if let Some(kv) = ECHO_KV_RE.captures(&command) {
                let name = kv[1].to_string();
                let resolved = interpolate(&kv[2], &scope);
                tracing::trace!(kind = ?VarAssignKind::GithubEnvVar, %name, "GITHUB_ENV write");
                state.insert(Location::variable(name, scope), resolved, label);
                return state;
            }
        }
        let path = target;
        let command = REDIRECT_RE.replace(&line, "").trim().to_string();
        let command_value = interpolate(&command, &scope);
        state.insert(Location::filesystem(path, scope), command_value, label);
        return state;
    }

    if let Some(caps) = ASSIGNMENT_RE.captures(&line) {
        let name = caps[1].to_string();
        let value_text = caps[2].to_string();
        let resolved = interpolate(&value_text, &scope);
        tracing::trace!(kind = ?VarAssignKind::BashEnvVar, %name, "bash variable assignment");
        state.insert(Location::variable(name, scope), resolved, label);
        return state;
    }

    let command_value = interpolate(&line, &scope);
    state.insert(Location::console(scope), command_value, label);
    state
}

/// Builds a single-branch [`ControlFlowGraphNode`] of per-line
/// `BashSingleCommandNode` statements, sharing one scope (Bash has no
/// nested lexical scoping the engine needs to model beyond function
/// bodies, which are treated as opaque symbolic calls — a Non-goal).
fn build_command_sequence(script: &str, scope: Scope) -> NodeHandle {
    let statements: Vec<NodeHandle> = split_statements(script)
        .into_iter()
        .map(|line| {
            let scope = scope.clone();
            let effect: Box<dyn Fn(&State, &AnalysisContext) -> State> =
                Box::new(move |_entry, _ctx| statement_effect(line.clone(), scope.clone()));
            Rc::new(RefCell::new(StatementNode::new(effect))) as NodeHandle
        })
        .collect();
    Rc::new(RefCell::new(ControlFlowGraphNode::new(statements)))
}

/// Builds the `RawBashScriptNode` for a run-step's script: an
/// `InterpretationNode` whose one materialized interpretation is the
/// sequence of `BashSingleCommandNode`s recovered by line-splitting.
/// Conservative by construction: this recognizer finds no other way to
/// interpret a script, so there is exactly one branch, but the
/// expansion still goes through `InterpretationNode` like any other
/// interpretation-bearing node so that a richer recognizer (e.g. one that
/// also materializes an `if`/`else` branch pair) can be dropped in later
/// without changing how callers walk the forest.
pub fn build_bash_script_node(script: &str, scope: Scope, _ctx: &AnalysisContext) -> NodeHandle {
    let sequence = build_command_sequence(script, scope);
    Rc::new(RefCell::new(InterpretationNode::new(vec![sequence])))
}
