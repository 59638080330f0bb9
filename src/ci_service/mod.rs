//! CI service adapters: the minimum contract the core needs from a CI
//! provider.
//!
//! The only concrete adapter implemented here, [`github_actions::GithubActionsCiService`],
//! performs no network I/O: workflow discovery reads already-checked-out
//! files from disk, and run-history facts (which really do require the
//! GitHub API) are supplied by the caller as already-fetched
//! [`github_actions::WorkflowRunRecord`]s rather than fetched here.

pub mod github_actions;

use std::path::Path;

use crate::dataflow::node::AnalysisContext;
use crate::dataflow::node::NodeHandle;
use crate::error::CiParseError;
use crate::models::scope::Scope;

/// One workflow file's analysed forest, together with the scope metadata
/// [`crate::buildtool::detect::detect_build_tools`] needs to correlate a
/// command back to its job.
pub struct WorkflowCallGraph {
    pub ci_path: String,
    pub roots: std::collections::HashMap<String, NodeHandle>,
    pub job_scopes: std::collections::HashMap<String, Scope>,
    pub workflow_var_scope: Scope,
    pub events: Vec<String>,
}

/// A whole-repository call graph: one [`WorkflowCallGraph`] per successfully
/// parsed workflow file, plus the [`AnalysisContext`] that owns every scope
/// and node reachable from it. An empty forest is permitted — workflows that
/// fail to parse are skipped, not fatal.
pub struct CallGraph {
    pub ctx: AnalysisContext,
    pub workflows: Vec<WorkflowCallGraph>,
}

impl CallGraph {
    /// All job roots across every workflow, the shape
    /// [`crate::dataflow::forest::NodeForest`]/BFS traversal expects.
    pub fn all_roots(&self) -> Vec<NodeHandle> {
        self.workflows
            .iter()
            .flat_map(|w| w.roots.values().cloned())
            .collect()
    }
}

/// Which kind of node a call-graph identity refers to when matching a run's
/// jobs/steps: an ordinary step, or a reusable workflow call
/// (which has no steps of its own in the calling job).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalleeNodeType {
    Step,
    ReusableWorkflowCall,
}

/// Minimum contract consumed by the core: workflow discovery, parsing into
/// a call graph, run-history queries, and the keyword-search fallback
/// `build_as_code` uses when a CI configuration can't be fully parsed.
pub trait CiService {
    fn name(&self) -> &str;

    /// True if this provider's configuration is present under `repo_path`.
    fn is_detected(&self, repo_path: &Path) -> bool;

    /// Workflow file paths discovered under `repo_path`, relative to it.
    /// Empty if [`CiService::is_detected`] is false.
    fn get_workflows(&self, repo_path: &Path) -> Vec<std::path::PathBuf>;

    /// Parses and analyses every discovered workflow into a [`CallGraph`].
    /// A workflow that fails to parse is skipped rather than failing the
    /// whole call.
    fn build_call_graph(&self, repo_path: &Path) -> Result<CallGraph, CiParseError>;

    /// Run URLs whose execution satisfies every timing/success constraint:
    /// started at or before `publish_time`, within `window_seconds` of it,
    /// within `window_seconds / 2` of `commit_time`, and the named job/step
    /// concluded successfully.
    #[allow(clippy::too_many_arguments)]
    fn workflow_run_in_date_time_range(
        &self,
        workflow_path_substring: &str,
        publish_time: chrono::DateTime<chrono::Utc>,
        commit_time: chrono::DateTime<chrono::Utc>,
        job_id: &str,
        step_name: Option<&str>,
        step_id: Option<&str>,
        window_seconds: i64,
        callee_node_type: CalleeNodeType,
    ) -> std::collections::HashSet<String>;

    /// True if `timestamp` is older than this provider's log retention
    /// window.
    fn workflow_run_deleted(&self, timestamp: chrono::DateTime<chrono::Utc>) -> bool;

    /// Searches this provider's configuration files under `repo_path` for
    /// any of `keywords`, scoped to `build_tool_name`; returns the first
    /// `(keyword, file)` match.
    fn has_kws_in_config(
        &self,
        keywords: &[&str],
        build_tool_name: &str,
        repo_path: &Path,
    ) -> Option<(String, String)>;

    /// Third-party CI configuration file names this provider additionally
    /// recognizes as deploy targets (e.g. a self-hosted registry's action),
    /// consulted by `build_as_code`'s deploy-command classification.
    fn get_third_party_configurations(&self) -> Vec<String> {
        Vec::new()
    }
}
