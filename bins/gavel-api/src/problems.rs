// Problem catalog loading for the Gavel API

use gavel_common::types::Problem;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Load the problem catalog from a JSON array on disk. A missing file
/// is not fatal; the server then only accepts inline problems.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<HashMap<String, Problem>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "Problem catalog not found, serving inline problems only");
        return Ok(HashMap::new());
    }

    let contents = std::fs::read_to_string(path)?;
    let problems: Vec<Problem> = serde_json::from_str(&contents)?;

    let mut catalog = HashMap::with_capacity(problems.len());
    for problem in problems {
        let Some(id) = problem.id.clone() else {
            warn!(title = %problem.title, "Skipping catalog problem with no id");
            continue;
        };
        if catalog.insert(id.clone(), problem).is_some() {
            warn!(problem_id = %id, "Duplicate problem id in catalog, keeping the last entry");
        }
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_catalog_is_empty_not_fatal() {
        let catalog = load("/nonexistent/problems.json").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn catalog_is_keyed_by_problem_id() {
        let dir = std::env::temp_dir().join(format!("gavel-catalog-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("problems.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"[
                {
                    "id": "two-sum",
                    "title": "Two Sum",
                    "function_name": "two_sum",
                    "function_signature": "def two_sum(nums: list[int], target: int) -> list[int]",
                    "test_cases": [
                        {"input": "[2,7,11,15], 9", "output": "[0,1]", "isHidden": true}
                    ]
                }
            ]"#,
        )
        .unwrap();

        let catalog = load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        let problem = &catalog["two-sum"];
        assert_eq!(problem.function_name, "two_sum");
        assert_eq!(problem.time_limit_ms, 2000);
        assert!(problem.test_cases[0].hidden);

        std::fs::remove_dir_all(&dir).ok();
    }
}
