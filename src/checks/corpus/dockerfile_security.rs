//! `mcn_dockerfile_security_1`: static analysis of
//! a repository's Dockerfile(s) for risky instructions.
//!
//! A sound Dockerfile grammar is out of scope; only instruction
//! classification matters, so this reads a Dockerfile the same way the
//! rest of this crate reads line-oriented CI config — one instruction per
//! logical line, with trailing `\` continuations joined first.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as Json;

use super::super::confidence;
use super::super::facts::{CheckFact, CheckResult, CheckResultType};

pub const CHECK_ID: &str = "mcn_dockerfile_security_1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityIssue {
    pub severity: Severity,
    pub instruction: String,
    pub issue: String,
    pub risk_points: u32,
}

const RISKY_PORTS: &[u16] = &[21, 22, 23, 3306];
const SAFE_PRIVILEGED_PORTS: &[u16] = &[80, 443];

const SENSITIVE_ENV_KEYWORDS: &[&str] =
    &["pass", "pswd", "license", "token", "session", "key", "authorized", "secret"];

const OLD_BASE_IMAGE_PATTERNS: &[&str] =
    &["ubuntu:14.04", "ubuntu:16.04", "centos:6", "centos:7", "python:2.7"];

const UNSAFE_VOLUMES: &[&str] = &[
    "/proc",
    "/",
    "/root/.ssh",
    "/var/run/docker.sock",
    "/var/lib/docker",
    "/etc/docker",
    "Docker.service",
    "Docker.socket",
    "/etc/default/docker",
    "/etc/docker/daemon.JSON",
    "/etc/sysconfig/docker",
    "/usr/bin/containerd",
    "/usr/sbin/runc",
];

const SENSITIVE_FILES: &[&str] = &[
    "NOTICE",
    "README.md",
    "LICENSE",
    "AUTHORS.md",
    "CONTRIBUTING.md",
    ".vscode/",
    "vendor/",
    "env/",
    "ENV/",
    "build/",
    "dist/",
    "target/",
    "downloads/",
    "eggs/",
    ".eggs/",
    "lib/",
    "lib64/",
    "parts/",
    "sdist/",
    "var/",
    "Dockerfile",
    ".git",
    ".editorconfig",
    "*.egg-info/",
    ".installed.cfg",
    "*.egg",
    "*.manifest",
    "*.spec",
    ".gcloudignore",
    ".gitignore",
    ".tox/",
    ".dockerignore",
    ".coverage",
    ".coverage.*",
    ".cache",
    "htmlcov/",
    "nosetests.xml",
    "coverage.xml",
    "*,cover",
    ".hypothesis/",
    "ssh/",
    "id_rsa",
    ".git-credentials",
    "config.*",
];

const SECURITY_CRITICAL_FILES: &[&str] = &[
    "id_rsa",
    "id_rsa.pub",
    ".ssh",
    "shadow",
    "/etc/passwd",
    "/etc/group",
    "/etc/profile",
    ".bash_history",
    ".history",
    ".log",
    ".conf",
];

const MALICIOUS_RUN_PATTERNS: &[&str] = &[
    ">&/dev/tcp/",
    "&>/dev/tcp",
    "crontab",
    "linenum.sh",
    "mimikatz",
    "@eval($_post",
    "@eval($_get",
    "@eval($_request",
    "chmod 777",
];

/// One `(instruction, argument)` pair as a minimal Dockerfile tokenizer
/// would yield it, line continuations (`\` at end of line) already joined.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Instruction {
    name: String,
    value: String,
}

/// Splits Dockerfile content into instructions, joining `\`-continued
/// lines and skipping blanks/comments (`#`), mirroring the shape
/// `DockerfileParser.structure` exposes without pulling in a full grammar.
fn parse_instructions(content: &str) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut pending = String::new();

    for raw_line in content.lines() {
        let line = raw_line.trim_end();
        if pending.is_empty() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
        }
        if let Some(stripped) = line.strip_suffix('\\') {
            pending.push_str(stripped.trim_end());
            pending.push(' ');
            continue;
        }
        pending.push_str(line);
        let full = std::mem::take(&mut pending);
        let mut parts = full.trim().splitn(2, char::is_whitespace);
        let Some(name) = parts.next() else { continue };
        let value = parts.next().unwrap_or("").trim().to_string();
        instructions.push(Instruction { name: name.to_uppercase(), value });
    }

    instructions
}

/// Extracts `(image_name, image_version)` from a `FROM` instruction's
/// argument, defaulting the tag to `latest` as `DockerfileParser.baseimage`
/// does.
fn parse_base_image(from_value: &str) -> (String, String) {
    let image = from_value.split_whitespace().next().unwrap_or(from_value);
    match image.split_once(':') {
        Some((name, tag)) => (name.to_string(), tag.to_string()),
        None => (image.to_string(), "latest".to_string()),
    }
}

struct Analyzer {
    issues: Vec<SecurityIssue>,
    risk_score: u32,
}

impl Analyzer {
    fn new() -> Self {
        Self { issues: Vec::new(), risk_score: 0 }
    }

    fn add_issue(&mut self, severity: Severity, instruction: &str, issue: impl Into<String>, risk_points: u32) {
        self.issues.push(SecurityIssue {
            severity,
            instruction: instruction.to_string(),
            issue: issue.into(),
            risk_points,
        });
        self.risk_score += risk_points;
    }

    fn check_from(&mut self, value: &str) {
        let (image_name, tag) = parse_base_image(value);
        if tag == "latest" {
            self.add_issue(
                Severity::Medium,
                "FROM",
                format!("Using 'latest' tag or no tag specified for base image: {image_name}"),
                15,
            );
        }
        let full_image = format!("{image_name}:{tag}");
        if OLD_BASE_IMAGE_PATTERNS.iter().any(|pat| full_image.contains(pat)) {
            self.add_issue(Severity::High, "FROM", format!("Using potentially outdated base image: {full_image}"), 25);
        }
    }

    fn check_user(&mut self, value: &str) {
        let normalized = value.trim().to_lowercase();
        if normalized == "root" || normalized == "0" {
            self.add_issue(Severity::High, "USER", "Running container as root user poses security risks", 30);
        }
    }

    fn check_expose(&mut self, value: &str) {
        for port_str in value.split_whitespace() {
            let port_str = port_str.split('/').next().unwrap_or(port_str);
            let ports: Vec<u16> = if let Some((start, end)) = port_str.split_once('-') {
                match (start.parse::<u16>(), end.parse::<u16>()) {
                    (Ok(s), Ok(e)) if s <= e => (s..=e).collect(),
                    _ => continue,
                }
            } else {
                match port_str.parse::<u16>() {
                    Ok(p) => vec![p],
                    Err(_) => continue,
                }
            };
            for port in ports {
                if RISKY_PORTS.contains(&port) {
                    self.add_issue(Severity::High, "EXPOSE", format!("Exposing risky port {port} (SSH/FTP/MySQL/Telnet)"), 25);
                } else if port < 1024 && !SAFE_PRIVILEGED_PORTS.contains(&port) {
                    self.add_issue(Severity::Medium, "EXPOSE", format!("Exposing privileged port {port}"), 15);
                }
            }
        }
    }

    fn check_env(&mut self, value: &str) {
        let lower = value.to_lowercase();
        for keyword in SENSITIVE_ENV_KEYWORDS {
            if lower.contains(keyword) {
                self.add_issue(
                    Severity::High,
                    "ENV",
                    format!("Potentially sensitive information in environment variable: {keyword}"),
                    20,
                );
            }
        }
        if looks_like_email(value) {
            self.add_issue(Severity::Medium, "ENV", "Email address found in environment variable", 10);
        }
    }

    fn check_volume(&mut self, value: &str) {
        let volumes = parse_list_instruction(value);
        for volume in &volumes {
            if UNSAFE_VOLUMES.iter().any(|unsafe_vol| volume == unsafe_vol || volume.starts_with(unsafe_vol)) {
                self.add_issue(Severity::Critical, "VOLUME", format!("Unsafe volume mount detected: {volume}"), 40);
            }
        }
    }

    fn check_copy_or_add(&mut self, instruction: &str, value: &str, check_urls: bool) {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.is_empty() {
            return;
        }
        let sources: &[&str] = if parts.len() > 1 { &parts[..parts.len() - 1] } else { &parts };

        for &source in sources {
            if check_urls && (source.starts_with("http://") || source.starts_with("https://") || source.starts_with("ftp://")) {
                self.add_issue(Severity::High, instruction, format!("ADD instruction downloading from URL: {source}"), 25);
            }
            if check_urls && [".tar", ".tar.gz", ".tgz", ".zip"].iter().any(|ext| source.ends_with(ext)) {
                self.add_issue(Severity::Medium, instruction, format!("ADD instruction with compressed file: {source}"), 15);
            }
            if source == "." {
                self.add_issue(
                    Severity::Medium,
                    instruction,
                    "Using '.' as source copies entire build context including sensitive files",
                    15,
                );
            }
            self.check_file_sensitivity(instruction, source);
        }
    }

    fn check_file_sensitivity(&mut self, instruction: &str, filepath: &str) {
        if let Some(hit) = SENSITIVE_FILES.iter().find(|f| filepath.contains(*f)) {
            self.add_issue(Severity::Medium, instruction, format!("Potentially sensitive file being copied: {filepath} (matches {hit})"), 10);
        }
        if let Some(hit) = SECURITY_CRITICAL_FILES.iter().find(|f| filepath.contains(*f)) {
            self.add_issue(Severity::Critical, instruction, format!("Security-critical file being copied: {filepath} (matches {hit})"), 35);
        }
    }

    fn check_run(&mut self, value: &str) {
        let lower = value.to_lowercase();
        for pattern in MALICIOUS_RUN_PATTERNS {
            if lower.contains(pattern) {
                self.add_issue(Severity::Critical, "RUN", format!("Potentially malicious command detected: {pattern}"), 40);
            }
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        let Some((local, domain)) = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '@' && c != '.').split_once('@') else {
            return false;
        };
        !local.is_empty() && domain.contains('.') && domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    })
}

/// Parses a `VOLUME`-style instruction argument, accepting either a JSON
/// array (`["/a", "/b"]`) or space-separated bare paths.
fn parse_list_instruction(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<Vec<String>>(trimmed) {
            return parsed;
        }
        return trimmed
            .trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    trimmed.split_whitespace().map(|s| s.trim_matches(|c| c == '"' || c == '\'').to_string()).collect()
}

/// Runs every per-instruction check over a parsed Dockerfile, returning the
/// collected issues, the summed risk score, and the base image identity.
fn analyze_dockerfile_content(content: &str) -> (Vec<SecurityIssue>, u32, String, String) {
    let mut analyzer = Analyzer::new();
    let mut base_image_name = "unknown".to_string();
    let mut base_image_version = "unknown".to_string();
    let mut seen_from = false;

    for instruction in parse_instructions(content) {
        match instruction.name.as_str() {
            "FROM" => {
                if !seen_from {
                    let (name, version) = parse_base_image(&instruction.value);
                    base_image_name = name;
                    base_image_version = version;
                    seen_from = true;
                }
                analyzer.check_from(&instruction.value);
            }
            "USER" => analyzer.check_user(&instruction.value),
            "EXPOSE" => analyzer.check_expose(&instruction.value),
            "ENV" => analyzer.check_env(&instruction.value),
            "VOLUME" => analyzer.check_volume(&instruction.value),
            "COPY" => analyzer.check_copy_or_add("COPY", &instruction.value, false),
            "ADD" => analyzer.check_copy_or_add("ADD", &instruction.value, true),
            "RUN" => analyzer.check_run(&instruction.value),
            _ => {}
        }
    }

    (analyzer.issues, analyzer.risk_score, base_image_name, base_image_version)
}

#[derive(Debug, Clone, Serialize)]
struct DockerfileSecurityFact {
    base_image_name: String,
    base_image_version: String,
    risk_score: u32,
    issues_count: usize,
    issues_by_severity: BTreeMap<String, u32>,
    issues_by_instruction: BTreeMap<String, u32>,
    issues: Vec<SecurityIssue>,
}

fn group_counts<'a>(issues: &'a [SecurityIssue], by_severity: bool) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for issue in issues {
        let key = if by_severity {
            format!("{:?}", issue.severity).to_uppercase()
        } else {
            issue.instruction.clone()
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Runs the full check against the first
/// discovered Dockerfile's raw content. Follows the same risk-score
/// thresholds as the original: `>=100` fails at `HIGH` confidence, `>=50`
/// fails at `MEDIUM`, `>0` still passes (at `MEDIUM`, since some risk was
/// found but not enough to fail), `0` passes at `HIGH`.
pub fn run(dockerfile_content: Option<&str>) -> CheckResult {
    let Some(content) = dockerfile_content else {
        return CheckResult {
            check_id: CHECK_ID.to_string(),
            result_type: CheckResultType::Failed,
            justification: vec!["no Dockerfile found in repository".to_string()],
            facts: vec![],
        };
    };

    let (issues, risk_score, base_image_name, base_image_version) = analyze_dockerfile_content(content);

    let (result_type, fact_confidence) = match risk_score {
        100.. => (CheckResultType::Failed, confidence::HIGH),
        50..=99 => (CheckResultType::Failed, confidence::MEDIUM),
        1..=49 => (CheckResultType::Passed, confidence::MEDIUM),
        _ => (CheckResultType::Passed, confidence::HIGH),
    };

    let fact = DockerfileSecurityFact {
        base_image_name,
        base_image_version,
        risk_score,
        issues_count: issues.len(),
        issues_by_severity: group_counts(&issues, true),
        issues_by_instruction: group_counts(&issues, false),
        issues,
    };

    CheckResult {
        check_id: CHECK_ID.to_string(),
        result_type,
        justification: vec![format!(
            "{} security issue(s) found, risk score {}",
            fact.issues_count, fact.risk_score
        )],
        facts: vec![CheckFact {
            confidence: fact_confidence,
            data: serde_json::to_value(&fact).unwrap_or(Json::Null),
        }],
    }
}
