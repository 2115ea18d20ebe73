use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Supported language families: one ahead-of-time compiled, one
/// VM-managed, one interpreted. Adding a language means one new code
/// assembler and one new toolchain entry, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Java,
    Python,
}

impl Language {
    pub fn from_str(s: &str) -> Option<Language> {
        match s.to_lowercase().as_str() {
            "cpp" | "c++" => Some(Language::Cpp),
            "java" => Some(Language::Java),
            "python" | "py" => Some(Language::Python),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
        }
    }

    pub fn all() -> [Language; 3] {
        [Language::Cpp, Language::Java, Language::Python]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (input literal, expected-output literal) pair. Owned by the
/// problem definition; read-only to the judging core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    #[serde(alias = "output")]
    pub expected: String,
    #[serde(default, alias = "is_hidden", alias = "isHidden")]
    pub hidden: bool,
}

fn default_time_limit_ms() -> u64 {
    2000
}

fn default_memory_limit_mb() -> u32 {
    256
}

/// Problem record as supplied by the storage layer. The core only
/// reads it; persistence lives outside this workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub function_name: String,
    pub function_signature: String,
    pub test_cases: Vec<TestCase>,
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
    // Carried from the problem record; the minimal sandbox enforces
    // wall-clock time only.
    #[serde(default = "default_memory_limit_mb")]
    pub memory_limit_mb: u32,
}

/// Final classification of a submission after judging all test cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
    CompilationError,
}

/// Per-test-case classification. `NotExecuted` appears only when the
/// single compile of the submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Passed,
    Failed,
    TimeLimitExceeded,
    RuntimeError,
    NotExecuted,
}

/// Outcome of judging one test case. Exactly one of these exists per
/// execution attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub index: usize,
    pub input: String,
    pub expected: String,
    pub actual_output: String,
    pub error: Option<String>,
    pub status: TestStatus,
    pub passed: bool,
    pub duration_ms: u64,
    pub hidden: bool,
}

impl TestCaseResult {
    /// Strips the payload of hidden test cases before results leave
    /// the judging core. Status and timing stay visible.
    pub fn redacted(mut self) -> TestCaseResult {
        if self.hidden {
            self.input = "[hidden]".to_string();
            self.expected = "[hidden]".to_string();
            self.actual_output = "[hidden]".to_string();
        }
        self
    }
}

/// A user submission: the function body (or full function, depending
/// on language convention) to judge against a problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub language: Language,
    pub source_code: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Submission {
    pub fn new(language: Language, source_code: impl Into<String>) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            language,
            source_code: source_code.into(),
            user_id: None,
        }
    }
}

/// Aggregated judgement for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeOutcome {
    pub submission_id: Uuid,
    pub verdict: Verdict,
    pub results: Vec<TestCaseResult>,
    pub passed_count: usize,
    pub total_tests: usize,
    pub total_execution_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_diagnostic: Option<String>,
    pub judged_at: DateTime<Utc>,
}

/// Standalone sandbox invocation: run one program with one stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub language: Language,
    pub source_code: String,
    #[serde(default)]
    pub stdin: String,
}

/// Raw result of one compile/run cycle, consumed exactly once by the
/// orchestrator (or returned as-is from the standalone interface).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub wall_clock_ms: u64,
    pub timed_out: bool,
    pub runtime_error: bool,
    pub compilation_failed: bool,
}

impl ExecutionOutput {
    /// An output representing an infrastructure failure (spawn error,
    /// broken pipe, temp-file I/O). Classified as RuntimeError per the
    /// error taxonomy.
    pub fn infrastructure_failure(message: impl Into<String>) -> ExecutionOutput {
        ExecutionOutput {
            stdout: String::new(),
            stderr: String::new(),
            error: Some(message.into()),
            wall_clock_ms: 0,
            timed_out: false,
            runtime_error: true,
            compilation_failed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_round_trips_through_names() {
        for lang in Language::all() {
            assert_eq!(Language::from_str(lang.as_str()), Some(lang));
        }
        assert_eq!(Language::from_str("c++"), Some(Language::Cpp));
        assert_eq!(Language::from_str("cobol"), None);
    }

    #[test]
    fn test_case_accepts_output_alias() {
        let tc: TestCase =
            serde_json::from_str(r#"{"input": "[1,2]", "output": "3", "isHidden": true}"#).unwrap();
        assert_eq!(tc.expected, "3");
        assert!(tc.hidden);
    }

    #[test]
    fn problem_defaults_apply() {
        let p: Problem = serde_json::from_str(
            r#"{
                "title": "Add Two Numbers",
                "function_name": "add",
                "function_signature": "int add(int a, int b)",
                "test_cases": [{"input": "2,3", "expected": "5"}]
            }"#,
        )
        .unwrap();
        assert_eq!(p.time_limit_ms, 2000);
        assert_eq!(p.memory_limit_mb, 256);
        assert!(!p.test_cases[0].hidden);
    }

    #[test]
    fn hidden_results_are_redacted() {
        let result = TestCaseResult {
            index: 0,
            input: "secret".to_string(),
            expected: "secret".to_string(),
            actual_output: "secret".to_string(),
            error: None,
            status: TestStatus::Passed,
            passed: true,
            duration_ms: 3,
            hidden: true,
        };
        let redacted = result.redacted();
        assert_eq!(redacted.input, "[hidden]");
        assert_eq!(redacted.expected, "[hidden]");
        assert_eq!(redacted.actual_output, "[hidden]");
        assert!(redacted.passed);
    }
}
