//! `mcn_build_as_code_1`: evidence that a component is built
//! and published from CI rather than by a manual, undocumented process.

use serde::Serialize;
use serde_json::Value as Json;

use crate::buildtool::BuildToolCommand;
use crate::ci::github_actions::TRUSTED_PUBLISH_ACTIONS;
use crate::ci_service::{CallGraph, CiService};
use crate::dataflow::ExitType;
use crate::models::location::LocationSpecifier;
use crate::models::value::Value;
use crate::provenance::build_definition::BuildInvocation;

use super::super::confidence;
use super::super::facts::{CheckFact, CheckResult, CheckResultType};

pub const CHECK_ID: &str = "mcn_build_as_code_1";

/// One recovered build-as-code fact:
/// either a trusted-publish action invocation or a deploy-like build-tool
/// command, never both at once.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuildAsCodeFact {
    pub build_tool_name: String,
    pub ci_service_name: String,
    pub build_trigger: Option<String>,
    pub language: Option<String>,
    pub language_distributions: Vec<String>,
    pub language_versions: Vec<String>,
    pub language_url: Option<String>,
    pub deploy_command: Option<String>,
}

impl BuildAsCodeFact {
    fn into_check_fact(self, confidence: f64) -> CheckFact {
        CheckFact {
            confidence,
            data: serde_json::to_value(self).unwrap_or(Json::Null),
        }
    }
}

/// Whether `actual_path` (a workflow's own `ci_path`) is the same workflow
/// provenance reported as its build entry point — the one signal this port
/// uses for confidence scoring based on whether the provenance-reported
/// workflow matches.
fn workflow_matches_provenance(actual_path: &str, provenance_workflow: Option<&BuildInvocation>) -> bool {
    matches!(provenance_workflow, Some((Some(entry_point), _)) if entry_point == actual_path)
}

/// Step 1: BFS every job root in `call_graph` for a
/// trusted-publish action marker (written by [`crate::ci::github_actions::step_effect`]
/// as `Value::ArbitraryNewData("trusted-publish:<action>")` at the job's
/// console location), producing one fact per match.
fn trusted_publish_facts(
    call_graph: &CallGraph,
    ci_service_name: &str,
    provenance_workflow: Option<&BuildInvocation>,
) -> Vec<(BuildAsCodeFact, f64)> {
    let mut facts = Vec::new();

    for workflow in &call_graph.workflows {
        let matches_provenance = workflow_matches_provenance(&workflow.ci_path, provenance_workflow);
        let confidence = if matches_provenance { confidence::HIGH } else { confidence::LOW };

        for (job_name, root) in &workflow.roots {
            let node = root.borrow();
            let Some(default_exit) = node.exit_states().get(&ExitType::Default) else {
                continue;
            };
            for (loc, values) in default_exit.iter() {
                if loc.specifier != LocationSpecifier::Console {
                    continue;
                }
                for value in values.keys() {
                    let Value::ArbitraryNewData(tag) = value else {
                        continue;
                    };
                    let Some(action) = tag.strip_prefix("trusted-publish:") else {
                        continue;
                    };
                    if !TRUSTED_PUBLISH_ACTIONS.contains(&action) {
                        continue;
                    }
                    facts.push((
                        BuildAsCodeFact {
                            build_tool_name: action.to_string(),
                            ci_service_name: ci_service_name.to_string(),
                            build_trigger: Some(format!("{}#{}", workflow.ci_path, job_name)),
                            language: None,
                            language_distributions: Vec::new(),
                            language_versions: Vec::new(),
                            language_url: None,
                            deploy_command: None,
                        },
                        confidence,
                    ));
                }
            }
        }
    }

    facts
}

/// Step 2: every deploy-like [`BuildToolCommand`] already
/// recovered becomes a fact, confidence again keyed by
/// whether its `ci_path` is the provenance-reported workflow.
fn deploy_command_facts(
    build_tools: &[BuildToolCommand],
    ci_service_name: &str,
    provenance_workflow: Option<&BuildInvocation>,
) -> Vec<(BuildAsCodeFact, f64)> {
    build_tools
        .iter()
        .filter(|cmd| cmd.deploy_like)
        .map(|cmd| {
            let matches_provenance = workflow_matches_provenance(&cmd.ci_path, provenance_workflow);
            let confidence = if matches_provenance { confidence::HIGH } else { confidence::MEDIUM };
            (
                BuildAsCodeFact {
                    build_tool_name: cmd.tool.to_string(),
                    ci_service_name: ci_service_name.to_string(),
                    build_trigger: cmd.step_node.as_ref().map(|step| format!("{}#{}", cmd.ci_path, step)),
                    language: cmd.language.clone(),
                    language_distributions: cmd.language_distributions.clone(),
                    language_versions: cmd.language_versions.clone(),
                    language_url: cmd.language_url.clone(),
                    deploy_command: Some(cmd.argv.join(" ")),
                },
                confidence,
            )
        })
        .collect()
}

/// Runs the check against a CI service with an analysed call graph. Overall
/// result is `Passed` iff at least one fact was produced; the
/// highest-confidence fact is recorded first.
pub fn run(
    ci_service_name: &str,
    call_graph: &CallGraph,
    build_tools: &[BuildToolCommand],
    provenance_workflow: Option<&BuildInvocation>,
) -> CheckResult {
    let mut weighted = trusted_publish_facts(call_graph, ci_service_name, provenance_workflow);
    weighted.extend(deploy_command_facts(build_tools, ci_service_name, provenance_workflow));

    // Highest-confidence fact first: it determines the recorded inferred build info.
    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let result_type = if weighted.is_empty() { CheckResultType::Failed } else { CheckResultType::Passed };
    let justification = if weighted.is_empty() {
        vec![format!("no build-as-code evidence found via {ci_service_name}")]
    } else {
        vec![format!(
            "found {} build-as-code fact(s) via {ci_service_name}, highest confidence {:.2}",
            weighted.len(),
            weighted[0].1
        )]
    };

    CheckResult {
        check_id: CHECK_ID.to_string(),
        result_type,
        justification,
        facts: weighted.into_iter().map(|(fact, confidence)| fact.into_check_fact(confidence)).collect(),
    }
}

/// Step 3: fallback for CI services this analyzer
/// cannot parse into a dataflow forest (Travis, CircleCI, GitLab CI).
/// Searches that provider's configuration for one of `deploy_keywords`
/// scoped to `build_tool_name`; a match is always recorded at `LOW`
/// confidence, since a keyword match alone cannot confirm an actual deploy.
pub fn run_unparsed_ci_fallback(
    ci_service: &dyn CiService,
    deploy_keywords: &[&str],
    build_tool_name: &str,
    repo_path: &std::path::Path,
) -> CheckResult {
    match ci_service.has_kws_in_config(deploy_keywords, build_tool_name, repo_path) {
        Some((keyword, config_file)) => CheckResult {
            check_id: CHECK_ID.to_string(),
            result_type: CheckResultType::Passed,
            justification: vec![format!(
                "found deploy keyword {keyword:?} in {config_file} for {build_tool_name} via {}",
                ci_service.name()
            )],
            facts: vec![BuildAsCodeFact {
                build_tool_name: build_tool_name.to_string(),
                ci_service_name: ci_service.name().to_string(),
                build_trigger: Some(config_file),
                language: None,
                language_distributions: Vec::new(),
                language_versions: Vec::new(),
                language_url: None,
                deploy_command: Some(keyword),
            }
            .into_check_fact(confidence::LOW)],
        },
        None => CheckResult {
            check_id: CHECK_ID.to_string(),
            result_type: CheckResultType::Failed,
            justification: vec![format!("no deploy keyword found via {}", ci_service.name())],
            facts: vec![],
        },
    }
}
