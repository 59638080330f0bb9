//! The GitHub Actions [`super::CiService`] adapter: workflow discovery and
//! call-graph construction read already-checked-out files from disk; run
//! history (which genuinely requires the GitHub API) is supplied by the
//! caller as pre-fetched [`WorkflowRunRecord`]s rather than fetched here.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::ci::github_actions::{build_workflow_forest, parse_workflow};
use crate::dataflow::node::AnalysisContext;
use crate::dataflow::Node;
use crate::error::CiParseError;

use super::{CallGraph, CalleeNodeType, CiService, WorkflowCallGraph};

/// Retention window GitHub applies to Actions run logs, past
/// which a run is presumed deleted rather than merely absent from a query.
pub const MAX_WORKFLOW_PERSIST_DAYS: i64 = 400;

const ENTRY_CONF_DIR: &str = ".github/workflows";

#[derive(Debug, Clone)]
pub struct WorkflowRunStep {
    pub name: Option<String>,
    pub step_id: Option<String>,
    pub conclusion: String,
}

#[derive(Debug, Clone)]
pub struct WorkflowRunJob {
    pub name: String,
    pub conclusion: String,
    pub steps: Vec<WorkflowRunStep>,
}

/// One already-fetched GitHub Actions run, as an external collaborator
/// (the real GitHub API client) would supply it; this adapter never makes
/// the HTTP call itself — HTTP client setup remains an external collaborator.
#[derive(Debug, Clone)]
pub struct WorkflowRunRecord {
    pub html_url: String,
    /// The workflow file path as GitHub reports it (e.g.
    /// `.github/workflows/release.yml`), matched by substring per
    /// `workflow_run_in_date_time_range`'s original `path in run["path"]`.
    pub workflow_path: String,
    pub started_at: DateTime<Utc>,
    pub jobs: Vec<WorkflowRunJob>,
}

#[derive(Debug, Default)]
pub struct GithubActionsCiService {
    runs: Vec<WorkflowRunRecord>,
    third_party_configurations: Vec<String>,
}

impl GithubActionsCiService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers already-fetched run history this adapter can search, as an
    /// external GitHub API client would populate after the fact.
    pub fn with_runs(mut self, runs: Vec<WorkflowRunRecord>) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_third_party_configurations(mut self, names: Vec<String>) -> Self {
        self.third_party_configurations = names;
        self
    }

    /// `started_at < publish_time` and `|started_at - commit_time| <=
    /// window_seconds / 2`, mirroring `check_publish_start_commit_timestamps`.
    fn check_publish_start_commit_timestamps(
        started_at: DateTime<Utc>,
        publish_time: DateTime<Utc>,
        commit_time: DateTime<Utc>,
        window_seconds: i64,
    ) -> bool {
        if started_at >= publish_time {
            return false;
        }
        let delta = (started_at - commit_time).num_seconds().abs();
        delta <= window_seconds / 2
    }
}

impl CiService for GithubActionsCiService {
    fn name(&self) -> &str {
        "github_actions"
    }

    fn is_detected(&self, repo_path: &Path) -> bool {
        repo_path.join(ENTRY_CONF_DIR).is_dir()
    }

    fn get_workflows(&self, repo_path: &Path) -> Vec<PathBuf> {
        if !self.is_detected(repo_path) {
            return Vec::new();
        }
        let dir = repo_path.join(ENTRY_CONF_DIR);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut workflows: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| matches!(p.extension().and_then(|e| e.to_str()), Some("yml") | Some("yaml")))
            .collect();
        workflows.sort();
        workflows
    }

    fn build_call_graph(&self, repo_path: &Path) -> Result<CallGraph, CiParseError> {
        let ctx = AnalysisContext::new();
        let mut workflows = Vec::new();

        for path in self.get_workflows(repo_path) {
            let contents = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read workflow file, skipping");
                    continue;
                }
            };
            let workflow = match parse_workflow(&contents) {
                Ok(w) => w,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to parse workflow, skipping");
                    continue;
                }
            };

            let (roots, scopes) = build_workflow_forest(&workflow, &ctx);
            for root in roots.values() {
                root.borrow_mut().analyse(&ctx);
            }

            let ci_path = path
                .strip_prefix(repo_path)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");

            workflows.push(WorkflowCallGraph {
                ci_path,
                roots,
                job_scopes: scopes.job_scopes,
                workflow_var_scope: scopes.workflow_var_scope,
                events: workflow.event_names(),
            });
        }

        Ok(CallGraph { ctx, workflows })
    }

    fn workflow_run_in_date_time_range(
        &self,
        workflow_path_substring: &str,
        publish_time: DateTime<Utc>,
        commit_time: DateTime<Utc>,
        job_id: &str,
        step_name: Option<&str>,
        step_id: Option<&str>,
        window_seconds: i64,
        callee_node_type: CalleeNodeType,
    ) -> HashSet<String> {
        let window_start = publish_time - chrono::Duration::seconds(window_seconds);
        let mut found = HashSet::new();

        for run in &self.runs {
            if !run.workflow_path.contains(workflow_path_substring) {
                continue;
            }
            if run.started_at < window_start || run.started_at > publish_time {
                continue;
            }
            if !Self::check_publish_start_commit_timestamps(run.started_at, publish_time, commit_time, window_seconds) {
                continue;
            }

            let matched = match callee_node_type {
                CalleeNodeType::ReusableWorkflowCall => run
                    .jobs
                    .iter()
                    .any(|job| job.name.starts_with(job_id) && job.conclusion == "success"),
                CalleeNodeType::Step => run.jobs.iter().filter(|job| job.name == job_id).any(|job| {
                    job.steps.iter().any(|step| {
                        let name_matches = step.name.as_deref() == step_name || step.step_id.as_deref() == step_id;
                        name_matches && step.conclusion == "success"
                    })
                }),
            };

            if matched {
                found.insert(run.html_url.clone());
            }
        }

        found
    }

    fn workflow_run_deleted(&self, timestamp: DateTime<Utc>) -> bool {
        Utc::now() - chrono::Duration::days(MAX_WORKFLOW_PERSIST_DAYS) > timestamp
    }

    fn has_kws_in_config(&self, keywords: &[&str], _build_tool_name: &str, repo_path: &Path) -> Option<(String, String)> {
        for path in self.get_workflows(repo_path) {
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            for kw in keywords {
                if contents.contains(kw) {
                    return Some((kw.to_string(), path.to_string_lossy().to_string()));
                }
            }
        }
        None
    }

    fn get_third_party_configurations(&self) -> Vec<String> {
        self.third_party_configurations.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_repo() -> tempfile_shim::TempRepo {
        tempfile_shim::TempRepo::new(&[(
            ".github/workflows/release.yml",
            r#"
name: Release
on: push
jobs:
  publish:
    steps:
      - run: npm publish --token ${{ secrets.NPM_TOKEN }}
"#,
        )])
    }

    /// A tiny scratch-directory helper so these tests don't need the `tempfile`
    /// crate just for a handful of fixture files.
    mod tempfile_shim {
        use std::path::PathBuf;

        pub struct TempRepo {
            pub path: PathBuf,
        }

        impl TempRepo {
            pub fn new(files: &[(&str, &str)]) -> Self {
                let mut path = std::env::temp_dir();
                path.push(format!("slsa-sentry-test-{}-{}", std::process::id(), files.len()));
                let _ = std::fs::remove_dir_all(&path);
                for (rel, contents) in files {
                    let full = path.join(rel);
                    if let Some(parent) = full.parent() {
                        std::fs::create_dir_all(parent).unwrap();
                    }
                    std::fs::write(full, contents).unwrap();
                }
                Self { path }
            }
        }

        impl Drop for TempRepo {
            fn drop(&mut self) {
                let _ = std::fs::remove_dir_all(&self.path);
            }
        }
    }

    #[test]
    fn detects_and_lists_workflow_files() {
        let repo = sample_repo();
        let service = GithubActionsCiService::new();
        assert!(service.is_detected(&repo.path));
        let workflows = service.get_workflows(&repo.path);
        assert_eq!(workflows.len(), 1);
    }

    #[test]
    fn builds_call_graph_with_analysed_jobs() {
        let repo = sample_repo();
        let service = GithubActionsCiService::new();
        let graph = service.build_call_graph(&repo.path).unwrap();
        assert_eq!(graph.workflows.len(), 1);
        assert_eq!(graph.workflows[0].ci_path, ".github/workflows/release.yml");
        assert!(graph.workflows[0].roots.contains_key("publish"));
    }

    #[test]
    fn retention_window_flags_old_runs_as_deleted() {
        let service = GithubActionsCiService::new();
        let old = Utc::now() - chrono::Duration::days(401);
        let recent = Utc::now() - chrono::Duration::days(399);
        assert!(service.workflow_run_deleted(old));
        assert!(!service.workflow_run_deleted(recent));
    }

    #[test]
    fn run_in_range_matches_on_timing_and_step_success() {
        let publish_time = Utc::now();
        let commit_time = publish_time - chrono::Duration::minutes(2);
        let started_at = publish_time - chrono::Duration::minutes(1);

        let service = GithubActionsCiService::new().with_runs(vec![WorkflowRunRecord {
            html_url: "https://github.com/org/repo/actions/runs/1".to_string(),
            workflow_path: ".github/workflows/release.yml".to_string(),
            started_at,
            jobs: vec![WorkflowRunJob {
                name: "publish".to_string(),
                conclusion: "success".to_string(),
                steps: vec![WorkflowRunStep {
                    name: Some("publish".to_string()),
                    step_id: None,
                    conclusion: "success".to_string(),
                }],
            }],
        }]);

        let found = service.workflow_run_in_date_time_range(
            "release.yml",
            publish_time,
            commit_time,
            "publish",
            Some("publish"),
            None,
            600,
            CalleeNodeType::Step,
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn run_outside_window_does_not_match() {
        let publish_time = Utc::now();
        let commit_time = publish_time;
        let started_at = publish_time - chrono::Duration::hours(2);

        let service = GithubActionsCiService::new().with_runs(vec![WorkflowRunRecord {
            html_url: "https://github.com/org/repo/actions/runs/2".to_string(),
            workflow_path: ".github/workflows/release.yml".to_string(),
            started_at,
            jobs: vec![WorkflowRunJob {
                name: "publish".to_string(),
                conclusion: "success".to_string(),
                steps: vec![],
            }],
        }]);

        let found = service.workflow_run_in_date_time_range(
            "release.yml",
            publish_time,
            commit_time,
            "publish",
            None,
            None,
            600,
            CalleeNodeType::Step,
        );
        assert!(found.is_empty());
    }
}
