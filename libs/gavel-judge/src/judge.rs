//! Judge orchestrator: drives the pipeline per submission across all
//! test cases and computes the final verdict.
//!
//! Per submission: parse the signature once, assemble one
//! argument-independent driver, compile once, then run every test case
//! sequentially against the shared artifact. A failed compile marks
//! every test case not-executed with the identical diagnostic. All
//! test cases are evaluated even after a disqualifying result, so the
//! full result set is always populated.

use crate::codegen;
use crate::comparator::{normalize, OutputComparator};
use crate::error::JudgeError;
use crate::sandbox::{Artifact, Prepared, Sandbox};
use crate::signature::{self, FunctionSignature};
use crate::splitter;
use chrono::Utc;
use gavel_common::config::LanguageConfigManager;
use gavel_common::types::{
    Problem, Submission, TestCase, TestCaseResult, TestStatus, Verdict,
};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct Judge {
    sandbox: Sandbox,
    comparator: OutputComparator,
}

impl Judge {
    pub fn new(config: LanguageConfigManager) -> Judge {
        Judge {
            sandbox: Sandbox::new(config),
            comparator: OutputComparator::new(),
        }
    }

    /// Build a judge with per-problem comparison overrides registered.
    pub fn with_comparator(config: LanguageConfigManager, comparator: OutputComparator) -> Judge {
        Judge {
            sandbox: Sandbox::new(config),
            comparator,
        }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub async fn judge(
        &self,
        problem: &Problem,
        submission: &Submission,
    ) -> Result<gavel_common::types::JudgeOutcome, JudgeError> {
        self.judge_with_cancel(problem, submission, &CancellationToken::new())
            .await
    }

    /// Judge one submission. Cancellation kills any in-flight
    /// subprocess and surfaces as `JudgeError::Cancelled` — a
    /// cancelled run never produces a verdict. Workspace cleanup runs
    /// regardless.
    #[instrument(
        skip(self, problem, submission, cancel),
        fields(
            submission_id = %submission.id,
            language = %submission.language,
            test_count = problem.test_cases.len(),
        )
    )]
    pub async fn judge_with_cancel(
        &self,
        problem: &Problem,
        submission: &Submission,
        cancel: &CancellationToken,
    ) -> Result<gavel_common::types::JudgeOutcome, JudgeError> {
        let started = Instant::now();

        if cancel.is_cancelled() {
            return Err(JudgeError::Cancelled);
        }

        // Fatal before any execution: without a parsed signature there
        // is nothing to assemble.
        let signature = signature::parse(&problem.function_signature, &problem.function_name)?;

        let assembler = codegen::assembler_for(submission.language);
        let driver = assembler.assemble(&signature, &submission.source_code);
        debug!(driver_bytes = driver.len(), "driver assembled");

        // Compile once; the artifact is reused for every test case.
        let artifact = match self.sandbox.prepare(submission.language, &driver).await? {
            Prepared::Ready(artifact) => artifact,
            Prepared::CompileFailed { diagnostic } => {
                info!(submission_id = %submission.id, "compilation failed");
                return Ok(compilation_error_outcome(
                    problem,
                    submission.id,
                    diagnostic,
                    started,
                ));
            }
        };

        let mut results = Vec::with_capacity(problem.test_cases.len());
        for (index, case) in problem.test_cases.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    completed = results.len(),
                    total = problem.test_cases.len(),
                    "judging cancelled"
                );
                return Err(JudgeError::Cancelled);
            }
            let result = self
                .run_case(problem, &signature, &artifact, index, case, cancel)
                .await;
            debug!(index, status = ?result.status, duration_ms = result.duration_ms, "test case judged");
            results.push(result);
        }
        // A cancel during the last case must not masquerade as a
        // RuntimeError verdict; no verdict exists for a cancelled run.
        if cancel.is_cancelled() {
            return Err(JudgeError::Cancelled);
        }

        let verdict = final_verdict(&results);
        let outcome = build_outcome(submission.id, verdict, results, None, started);
        info!(
            verdict = ?outcome.verdict,
            passed = outcome.passed_count,
            total = outcome.total_tests,
            total_execution_time_ms = outcome.total_execution_time_ms,
            "judging complete"
        );
        Ok(outcome)
    }

    async fn run_case(
        &self,
        problem: &Problem,
        signature: &FunctionSignature,
        artifact: &Artifact,
        index: usize,
        case: &TestCase,
        cancel: &CancellationToken,
    ) -> TestCaseResult {
        // Argument trouble is scoped to this test case; siblings still run.
        let args = match splitter::split(&case.input, signature.params.len()) {
            Ok(args) => args,
            Err(e) => {
                return TestCaseResult {
                    index,
                    input: case.input.clone(),
                    expected: case.expected.clone(),
                    actual_output: String::new(),
                    error: Some(e.to_string()),
                    status: TestStatus::RuntimeError,
                    passed: false,
                    duration_ms: 0,
                    hidden: case.hidden,
                };
            }
        };

        // One split literal per line; the driver reads them back in
        // declaration order.
        let mut stdin = args.join("\n");
        stdin.push('\n');

        let output = self
            .sandbox
            .run(artifact, &stdin, problem.time_limit_ms, cancel)
            .await;

        let actual_output = normalize(&output.stdout);
        let (status, passed, error) = if output.timed_out {
            (TestStatus::TimeLimitExceeded, false, output.error)
        } else if output.runtime_error {
            let stderr = normalize(&output.stderr);
            let error = if stderr.is_empty() { output.error } else { Some(stderr) };
            (TestStatus::RuntimeError, false, error)
        } else {
            let key = problem.id.as_deref().unwrap_or(&problem.title);
            let passed = self
                .comparator
                .matches(Some(key), &case.expected, &actual_output);
            (
                if passed { TestStatus::Passed } else { TestStatus::Failed },
                passed,
                None,
            )
        };

        TestCaseResult {
            index,
            input: case.input.clone(),
            expected: case.expected.clone(),
            actual_output,
            error,
            status,
            passed,
            duration_ms: output.wall_clock_ms,
            hidden: case.hidden,
        }
    }
}

/// Verdict precedence: CompilationError (handled by the caller) >
/// RuntimeError/TimeLimitExceeded > WrongAnswer > Accepted. Within the
/// error tier, the earliest failing test case determines which of the
/// two error verdicts is reported.
pub fn final_verdict(results: &[TestCaseResult]) -> Verdict {
    for result in results {
        match result.status {
            TestStatus::RuntimeError => return Verdict::RuntimeError,
            TestStatus::TimeLimitExceeded => return Verdict::TimeLimitExceeded,
            TestStatus::NotExecuted => return Verdict::CompilationError,
            TestStatus::Passed | TestStatus::Failed => {}
        }
    }
    if results.iter().all(|r| r.passed) && !results.is_empty() {
        Verdict::Accepted
    } else {
        Verdict::WrongAnswer
    }
}

fn compilation_error_outcome(
    problem: &Problem,
    submission_id: Uuid,
    diagnostic: String,
    started: Instant,
) -> gavel_common::types::JudgeOutcome {
    // No test case executes; every result carries the same diagnostic.
    let results = problem
        .test_cases
        .iter()
        .enumerate()
        .map(|(index, case)| TestCaseResult {
            index,
            input: case.input.clone(),
            expected: case.expected.clone(),
            actual_output: String::new(),
            error: Some(diagnostic.clone()),
            status: TestStatus::NotExecuted,
            passed: false,
            duration_ms: 0,
            hidden: case.hidden,
        })
        .collect();
    build_outcome(
        submission_id,
        Verdict::CompilationError,
        results,
        Some(diagnostic),
        started,
    )
}

fn build_outcome(
    submission_id: Uuid,
    verdict: Verdict,
    results: Vec<TestCaseResult>,
    compiler_diagnostic: Option<String>,
    started: Instant,
) -> gavel_common::types::JudgeOutcome {
    let passed_count = results.iter().filter(|r| r.passed).count();
    gavel_common::types::JudgeOutcome {
        submission_id,
        verdict,
        passed_count,
        total_tests: results.len(),
        total_execution_time_ms: started.elapsed().as_millis() as u64,
        results,
        compiler_diagnostic,
        judged_at: Utc::now(),
    }
}
