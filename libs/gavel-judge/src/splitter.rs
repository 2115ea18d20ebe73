//! Argument splitter: one test case's raw input literal into one
//! trimmed literal per declared parameter.
//!
//! Single forward scan with a bracket-depth counter and a string
//! toggle: a comma splits only at depth zero outside a string, so
//! `[1,2,3], 9` is two arguments and `"a,b"` is one. Authored prefixes
//! like `nums = [1,2,3]` are stripped per item.

use crate::error::JudgeError;

pub fn split(input: &str, expected: usize) -> Result<Vec<String>, JudgeError> {
    let args: Vec<String> = split_top_level(input)
        .into_iter()
        .map(strip_name_prefix)
        .collect();
    if args.len() != expected {
        return Err(JudgeError::ArgumentCountMismatch {
            expected,
            found: args.len(),
        });
    }
    Ok(args)
}

fn split_top_level(input: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut prev = '\0';

    for c in input.chars() {
        if c == '"' && prev != '\\' {
            in_string = !in_string;
        }
        if !in_string {
            match c {
                '[' | '{' | '(' => depth += 1,
                ']' | '}' | ')' => depth -= 1,
                ',' if depth == 0 => {
                    pieces.push(current.trim().to_string());
                    current.clear();
                    prev = c;
                    continue;
                }
                _ => {}
            }
        }
        current.push(c);
        prev = c;
    }
    if !current.trim().is_empty() {
        pieces.push(current.trim().to_string());
    }
    pieces
}

/// `nums = [1,2,3]` → `[1,2,3]`. Applies only when the left-hand side
/// is a bare identifier, so string arguments containing `=` and
/// comparisons like `x == 3` pass through untouched.
fn strip_name_prefix(arg: String) -> String {
    if let Some(eq) = arg.find('=') {
        let lhs = arg[..eq].trim();
        let rhs = &arg[eq + 1..];
        let identifier = !lhs.is_empty()
            && lhs.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !lhs.chars().next().is_some_and(|c| c.is_ascii_digit());
        if identifier && !rhs.starts_with('=') {
            return rhs.trim().to_string();
        }
    }
    arg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_scalars() {
        assert_eq!(split("2,3", 2).unwrap(), vec!["2", "3"]);
    }

    #[test]
    fn no_top_level_comma_yields_one_literal() {
        for input in ["[1,2,3]", "\"a,b,c\"", "{1, 2}", "(3, 4)", "42"] {
            assert_eq!(split(input, 1).unwrap().len(), 1, "input: {}", input);
        }
    }

    #[test]
    fn brackets_shield_commas() {
        let args = split("[1,2,3], 9", 2).unwrap();
        assert_eq!(args, vec!["[1,2,3]", "9"]);
    }

    #[test]
    fn strings_shield_commas_and_brackets() {
        let args = split("\"a,[b,c\", 7", 2).unwrap();
        assert_eq!(args, vec!["\"a,[b,c\"", "7"]);
    }

    #[test]
    fn escaped_quotes_do_not_close_strings() {
        let args = split(r#""say \",\" twice", 1"#, 2).unwrap();
        assert_eq!(args[0], r#""say \",\" twice""#);
        assert_eq!(args[1], "1");
    }

    #[test]
    fn strips_name_prefixes() {
        let args = split("nums = [2,7,11,15], target = 9", 2).unwrap();
        assert_eq!(args, vec!["[2,7,11,15]", "9"]);
    }

    #[test]
    fn keeps_equals_inside_strings() {
        let args = split("\"a=b\", 1", 2).unwrap();
        assert_eq!(args[0], "\"a=b\"");
    }

    #[test]
    fn trailing_content_is_final_argument() {
        let args = split("[1,2] , [3,4]", 2).unwrap();
        assert_eq!(args, vec!["[1,2]", "[3,4]"]);
    }

    #[test]
    fn count_mismatch_is_reported() {
        let err = split("[1,2,3], 9", 3).unwrap_err();
        match err {
            JudgeError::ArgumentCountMismatch { expected, found } => {
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nested_structures() {
        let args = split("[[1,2],[3,4]], {\"k\": [5,6]}", 2).unwrap();
        assert_eq!(args[0], "[[1,2],[3,4]]");
        assert_eq!(args[1], "{\"k\": [5,6]}");
    }
}
