//! Build-tool command facts recovered from CI console invocations.

use std::fmt;

/// Placeholder token substituted for any command-line argument that could
/// not be resolved to a literal string (e.g. it depends on a secret, an
/// unresolved step output, or command substitution). Named after the
/// original engine's sentinel so debug output stays recognisable to anyone
/// who has used it before.
pub const UNKNOWN_ARG: &str = "$MACARON_UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildTool {
    Maven,
    Gradle,
    Npm,
    Pip,
    Go,
    Cargo,
    Make,
    Docker,
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildTool::Maven => "maven",
            BuildTool::Gradle => "gradle",
            BuildTool::Npm => "npm",
            BuildTool::Pip => "pip",
            BuildTool::Go => "go",
            BuildTool::Cargo => "cargo",
            BuildTool::Make => "make",
            BuildTool::Docker => "docker",
        };
        f.write_str(name)
    }
}

/// The recovered shape of a single build-tool invocation.
/// `deploy_like` marks subcommands the corpus
/// treats as publishing artifacts rather than merely
/// building/testing them (`mvn deploy`, `npm publish`, `cargo publish`,
/// `gradle publish`). The `language_*`/`reachable_secrets`/`events` fields
/// are best-effort context gathered at the same CI location as the command;
/// any of them may be empty when that context could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildToolCommand {
    pub tool: BuildTool,
    pub subcommand: String,
    pub argv: Vec<String>,
    pub deploy_like: bool,
    pub ci_path: String,
    pub step_node: Option<String>,
    pub language: Option<String>,
    pub language_versions: Vec<String>,
    pub language_distributions: Vec<String>,
    pub language_url: Option<String>,
    pub reachable_secrets: Vec<String>,
    pub events: Vec<String>,
}

const DEPLOY_SUBCOMMANDS: &[&str] = &["deploy", "publish", "push", "release"];

/// Splits a resolved argv string on whitespace. Tokens that still contain
/// the unresolved marker are left as [`UNKNOWN_ARG`] rather than split
/// further, since we cannot know how many shell words an unresolved
/// expression would expand to.
pub fn tokenize_argv(resolved: &str) -> Vec<String> {
    resolved
        .split_whitespace()
        .map(|tok| {
            if tok.contains('\u{0}') {
                UNKNOWN_ARG.to_string()
            } else {
                tok.to_string()
            }
        })
        .collect()
}

/// Recognizes a known build tool invocation from a resolved command line,
/// if any. `argv[0]` (and `argv[1]` for multi-word invocations like
/// `docker buildx`) determines the tool; `argv[1]` (or `argv[2]`) is taken
/// as the subcommand when present.
pub fn recognize(argv: &[String]) -> Option<BuildToolCommand> {
    let tool = match argv.first().map(String::as_str) {
        Some("mvn") | Some("mvnw") | Some("./mvnw") => BuildTool::Maven,
        Some("gradle") | Some("gradlew") | Some("./gradlew") => BuildTool::Gradle,
        Some("npm") => BuildTool::Npm,
        Some("pip") | Some("pip3") => BuildTool::Pip,
        Some("go") => BuildTool::Go,
        Some("cargo") => BuildTool::Cargo,
        Some("make") => BuildTool::Make,
        Some("docker") => BuildTool::Docker,
        _ => return None,
    };
    let subcommand = argv.get(1).cloned().unwrap_or_default();
    let deploy_like = DEPLOY_SUBCOMMANDS.contains(&subcommand.as_str());
    Some(BuildToolCommand {
        tool,
        subcommand,
        argv: argv.to_vec(),
        deploy_like,
        ci_path: String::new(),
        step_node: None,
        language: None,
        language_versions: Vec::new(),
        language_distributions: Vec::new(),
        language_url: None,
        reachable_secrets: Vec::new(),
        events: Vec::new(),
    })
}

/// A stable stringified form used to sort a sequence of
/// [`BuildToolCommand`]s for deterministic output:
/// tool, subcommand and argv, joined, since those alone identify the
/// invocation regardless of which CI location produced it.
pub fn stringify_for_sort(cmd: &BuildToolCommand) -> String {
    format!("{} {} {}", cmd.tool, cmd.subcommand, cmd.argv.join(" "))
}
