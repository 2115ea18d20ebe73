// CLI commands for judging and running code locally
use anyhow::{bail, Context, Result};
use gavel_common::config::LanguageConfigManager;
use gavel_common::types::{
    ExecutionRequest, Language, Problem, Submission, TestStatus,
};
use gavel_judge::{Judge, Sandbox};
use std::fs;

fn parse_language(name: &str) -> Result<Language> {
    Language::from_str(name)
        .with_context(|| format!("Unknown language '{}'. Try: cpp, java, python", name))
}

/// Judge a solution file against a problem definition
pub async fn judge(
    problem_path: &str,
    solution_path: &str,
    language: &str,
    json: bool,
) -> Result<()> {
    let language = parse_language(language)?;

    let problem_json = fs::read_to_string(problem_path)
        .with_context(|| format!("Failed to read problem file: {}", problem_path))?;
    let problem: Problem = serde_json::from_str(&problem_json)
        .with_context(|| format!("Failed to parse problem file: {}", problem_path))?;

    let source_code = fs::read_to_string(solution_path)
        .with_context(|| format!("Failed to read solution file: {}", solution_path))?;

    let config = LanguageConfigManager::load_default()?;
    let judge = Judge::new(config);
    let submission = Submission::new(language, source_code);

    println!("⚖️  Judging '{}' ({} test cases)...", problem.title, problem.test_cases.len());

    let outcome = judge.judge(&problem, &submission).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    for result in &outcome.results {
        let mark = match result.status {
            TestStatus::Passed => "✅",
            TestStatus::Failed => "❌",
            TestStatus::TimeLimitExceeded => "⏱️ ",
            TestStatus::RuntimeError => "💥",
            TestStatus::NotExecuted => "⚪",
        };
        if result.hidden {
            println!("  {} Test {} (hidden) - {:?} [{} ms]", mark, result.index + 1, result.status, result.duration_ms);
            continue;
        }
        println!(
            "  {} Test {} - {:?} [{} ms]",
            mark,
            result.index + 1,
            result.status,
            result.duration_ms
        );
        if result.status == TestStatus::Failed {
            println!("      input:    {}", result.input);
            println!("      expected: {}", result.expected);
            println!("      actual:   {}", result.actual_output);
        }
        if let Some(error) = &result.error {
            println!("      error:    {}", error.lines().next().unwrap_or_default());
        }
    }

    if let Some(diagnostic) = &outcome.compiler_diagnostic {
        println!("\n🛠️  Compiler output:\n{}", diagnostic);
    }

    println!(
        "\n{:?}: {}/{} passed in {} ms",
        outcome.verdict, outcome.passed_count, outcome.total_tests, outcome.total_execution_time_ms
    );
    Ok(())
}

/// Compile and run a complete source file once
pub async fn exec(language: &str, file: &str, stdin_path: Option<&str>) -> Result<()> {
    let language = parse_language(language)?;

    let source_code = fs::read_to_string(file)
        .with_context(|| format!("Failed to read source file: {}", file))?;
    let stdin = match stdin_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read stdin file: {}", path))?,
        None => String::new(),
    };

    let config = LanguageConfigManager::load_default()?;
    let sandbox = Sandbox::new(config);

    let output = sandbox
        .execute(&ExecutionRequest {
            language,
            source_code,
            stdin,
        })
        .await?;

    if output.compilation_failed {
        println!("❌ Compilation failed:");
        println!("{}", output.stderr);
        bail!("compilation failed");
    }

    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
    if output.timed_out {
        bail!("execution timed out after {} ms", output.wall_clock_ms);
    }
    if output.runtime_error {
        bail!(
            "{}",
            output.error.unwrap_or_else(|| "runtime error".to_string())
        );
    }

    println!("\n✅ Completed in {} ms", output.wall_clock_ms);
    Ok(())
}

/// List enabled languages and their toolchains
pub fn languages() -> Result<()> {
    let config = LanguageConfigManager::load_default()?;

    println!("📋 Enabled languages:");
    for lang in config.list_languages() {
        let compile = lang
            .compile
            .as_ref()
            .map(|c| c.command.clone())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {} (.{}) compile: {} run: {} [default timeout {} ms]",
            lang.name, lang.version, lang.file_extension, compile, lang.run.command, lang.default_timeout_ms
        );
    }
    Ok(())
}
