//! Runs checks in their registry-computed execution order, skipping a check
//! when a parent dependency's result does not match what it declared it
//! needs.

use std::collections::HashMap;

use super::facts::{CheckResult, CheckResultType, SkippedInfo};
use super::registry::{CheckDescriptor, Registry};

/// A runnable check: given the already-collected results of every check
/// that ran before it (by execution order) and whether it was skipped,
/// produces its own result. Skipped checks still run this (mirroring the
/// original passing `skipped_info` to `check.run` rather than bypassing it)
/// so a check can still report a best-effort justification when skipped.
pub trait CheckRunner {
    fn check_id(&self) -> &str;
    fn run(&self, prior_results: &HashMap<String, CheckResult>, skipped: Option<&SkippedInfo>) -> CheckResult;
}

/// Returns `Some` if any of `check`'s parent relationships are unsatisfied
/// in `results` — i.e. the parent's actual result differs from the result
/// this check declared it depends on.
fn should_skip_check(check: &CheckDescriptor, results: &HashMap<String, CheckResult>) -> Option<SkippedInfo> {
    for (parent_id, expected) in &check.depends_on {
        let Some(parent_result) = results.get(parent_id) else {
            continue;
        };
        if parent_result.result_type != *expected {
            let suppress_comment = format!(
                "Check {} is set to {:?} because {} returned {:?}.",
                check.check_id, check.result_on_skip, parent_id, parent_result.result_type
            );
            return Some(SkippedInfo {
                check_id: check.check_id.clone(),
                suppress_comment,
            });
        }
    }
    None
}

/// Runs every check in `registry.checks_to_run`, in `registry.execution_order`,
/// skipping-but-still-invoking checks whose parent relationship is
/// unsatisfied. Checks not in `checks_to_run` are omitted from the result
/// entirely (they were excluded by configuration, not skipped at runtime).
pub fn scan(
    registry: &Registry,
    descriptors: &HashMap<String, CheckDescriptor>,
    runners: &HashMap<String, Box<dyn CheckRunner>>,
) -> HashMap<String, CheckResult> {
    let mut results = HashMap::new();
    let checks_to_run: std::collections::HashSet<&String> = registry.checks_to_run.iter().collect();

    for check_id in &registry.execution_order {
        if !checks_to_run.contains(check_id) {
            continue;
        }
        let Some(descriptor) = descriptors.get(check_id) else {
            results.insert(
                check_id.clone(),
                CheckResult {
                    check_id: check_id.clone(),
                    result_type: CheckResultType::Unknown,
                    justification: vec![format!("check {check_id} has no implementation registered")],
                    facts: vec![],
                },
            );
            continue;
        };
        let Some(runner) = runners.get(check_id) else {
            continue;
        };

        let skipped = should_skip_check(descriptor, &results);
        let result = runner.run(&results, skipped.as_ref());
        results.insert(check_id.clone(), result);
    }

    results
}
