//! The `slsa-sentry` CLI: a thin external-collaborator shell around the
//! `slsa_sentry` library. Drives the core end to end over a checked-out
//! repository: builds a GitHub Actions call graph, recovers build-tool
//! commands, and runs the representative check corpus against them,
//! printing each check's result as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;

use slsa_sentry::buildtool::detect_build_tools;
use slsa_sentry::checks::corpus::{build_as_code, dockerfile_security};
use slsa_sentry::ci_service::github_actions::GithubActionsCiService;
use slsa_sentry::ci_service::{CallGraph, CiService};
use slsa_sentry::config::{self, AnalyzerConfig};

/// Process exit codes following the `EX_*` `sysexits.h` conventions.
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
enum ExitCodeKind {
    Ok = 0,
    Usage = 64,
    DataErr = 65,
    NoInput = 66,
    OsFile = 72,
}

impl From<ExitCodeKind> for ExitCode {
    fn from(value: ExitCodeKind) -> Self {
        ExitCode::from(value as u8)
    }
}

/// Analyzes a CI pipeline and its SLSA provenance for supply-chain
/// integrity facts.
#[derive(Parser)]
#[clap(
    version = "0.1.0",
    about = "Analyzes a CI pipeline and its SLSA provenance for supply-chain integrity facts"
)]
struct SlsaSentry {
    /// Optional path to a TOML configuration file. Defaults are used when omitted.
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Path to a checked-out repository containing `.github/workflows`.
    #[clap(long, required = true)]
    repo_path: PathBuf,
}

/// Reads a Dockerfile from the repository root, if one exists, trying the
/// same handful of common names the original check tries, without the original's recursive directory
/// walk (out of scope for this thin CLI layer — the library function
/// itself takes already-read content).
fn read_dockerfile(repo_path: &std::path::Path) -> Option<String> {
    for name in ["Dockerfile", "dockerfile", "Dockerfile.prod", "Dockerfile.dev"] {
        if let Ok(contents) = std::fs::read_to_string(repo_path.join(name)) {
            return Some(contents);
        }
    }
    None
}

fn analyze_cmd(repo_path: PathBuf) -> anyhow::Result<()> {
    if !repo_path.is_dir() {
        return Err(anyhow!("repo path {} does not exist or is not a directory", repo_path.display()));
    }

    let service = GithubActionsCiService::new();
    let call_graph: CallGraph = service
        .build_call_graph(&repo_path)
        .map_err(|e| anyhow!("failed to build GitHub Actions call graph: {e}"))?;

    let mut build_tools = Vec::new();
    for workflow in &call_graph.workflows {
        build_tools.extend(detect_build_tools(
            &workflow.ci_path,
            workflow.roots.values().cloned().collect(),
            &workflow.job_scopes,
            &workflow.workflow_var_scope,
            &workflow.events,
        ));
    }

    let build_as_code_result = build_as_code::run(service.name(), &call_graph, &build_tools, None);
    let dockerfile_result = dockerfile_security::run(read_dockerfile(&repo_path).as_deref());

    let summary = serde_json::json!({
        "repo_path": repo_path.display().to_string(),
        "workflows_parsed": call_graph.workflows.len(),
        "build_tool_commands_found": build_tools.len(),
        "checks": {
            build_as_code::CHECK_ID: {
                "result": format!("{:?}", build_as_code_result.result_type),
                "facts": build_as_code_result.facts,
            },
            dockerfile_security::CHECK_ID: {
                "result": format!("{:?}", dockerfile_result.result_type),
                "facts": dockerfile_result.facts,
            },
        },
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let parsed = match path {
        Some(p) => AnalyzerConfig::from_file(p)?,
        None => AnalyzerConfig::default(),
    };
    // `config::init` errors only if already initialized, which cannot
    // happen this early in `main`; a stale process-wide config from a
    // prior call is not possible within one CLI invocation.
    let _ = config::init(parsed);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts = SlsaSentry::parse();

    if let Err(e) = load_config(opts.config.as_ref()) {
        eprintln!("{e}");
        return ExitCodeKind::DataErr.into();
    }

    match analyze_cmd(opts.repo_path) {
        Ok(()) => ExitCodeKind::Ok.into(),
        Err(e) => {
            eprintln!("{e}");
            ExitCodeKind::DataErr.into()
        }
    }
}
