//! Signature parser: `<returnType> <name>(<ty1> <p1>, <ty2> <p2>, ...)`
//! into a return type and an ordered, typed parameter list.
//!
//! Signatures are authored as free text, so parsing is positional
//! rather than grammatical: everything before the function name is the
//! return type, the parenthesized segment splits on commas (parameter
//! types are simple identifiers, no generic-internal commas), and the
//! last whitespace-separated token of each segment is the parameter
//! name. Multi-word types such as `unsigned long` survive intact.

use crate::error::JudgeError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

/// Built once per submission; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Param>,
}

pub fn parse(signature: &str, function_name: &str) -> Result<FunctionSignature, JudgeError> {
    if function_name.trim().is_empty() {
        return Err(JudgeError::MalformedSignature(
            "function name is empty".to_string(),
        ));
    }

    let name_at = find_token(signature, function_name).ok_or_else(|| {
        JudgeError::MalformedSignature(format!(
            "function name '{}' not found in '{}'",
            function_name, signature
        ))
    })?;
    let return_type = signature[..name_at].trim().to_string();

    let open = signature[name_at..]
        .find('(')
        .map(|offset| name_at + offset)
        .ok_or_else(|| {
            JudgeError::MalformedSignature(format!("no parameter list in '{}'", signature))
        })?;
    let close = signature.rfind(')').filter(|&close| close > open).ok_or_else(|| {
        JudgeError::MalformedSignature(format!("unclosed parameter list in '{}'", signature))
    })?;

    let mut params = Vec::new();
    for piece in signature[open + 1..close].split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        // `vector<int> nums` → type + name, `nums: list[int]` →
        // name + type; a bare `nums` keeps an empty type and degrades
        // downstream.
        let (ty, name) = if let Some((name, ty)) = piece.split_once(':') {
            (ty.trim().to_string(), name.trim().to_string())
        } else {
            match piece.rsplit_once(char::is_whitespace) {
                Some((ty, name)) => (ty.trim().to_string(), name.to_string()),
                None => (String::new(), piece.to_string()),
            }
        };
        params.push(Param { ty, name });
    }

    Ok(FunctionSignature {
        name: function_name.to_string(),
        return_type,
        params,
    })
}

/// First occurrence of `needle` that is a whole identifier token, so
/// `add` never anchors inside `radd` or `add_all`.
fn find_token(haystack: &str, needle: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let at = from + offset;
        let clear_before = haystack[..at].chars().next_back().map_or(true, |c| !is_ident(c));
        let clear_after = haystack[at + needle.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_ident(c));
        if clear_before && clear_after {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_signature() {
        let sig = parse("int add(int a, int b)", "add").unwrap();
        assert_eq!(sig.return_type, "int");
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0], Param { ty: "int".into(), name: "a".into() });
        assert_eq!(sig.params[1], Param { ty: "int".into(), name: "b".into() });
    }

    #[test]
    fn keeps_declaration_order() {
        let sig = parse(
            "vector<int> twoSum(vector<int> nums, int target)",
            "twoSum",
        )
        .unwrap();
        assert_eq!(sig.return_type, "vector<int>");
        let names: Vec<&str> = sig.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["nums", "target"]);
    }

    #[test]
    fn supports_multi_word_types() {
        let sig = parse("unsigned long count(unsigned long n, int base)", "count").unwrap();
        assert_eq!(sig.return_type, "unsigned long");
        assert_eq!(sig.params[0].ty, "unsigned long");
        assert_eq!(sig.params[0].name, "n");
    }

    #[test]
    fn empty_parameter_list() {
        let sig = parse("int answer()", "answer").unwrap();
        assert!(sig.params.is_empty());
    }

    #[test]
    fn untyped_params_keep_names() {
        let sig = parse("def solve(nums, target)", "solve").unwrap();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].ty, "");
        assert_eq!(sig.params[0].name, "nums");
    }

    #[test]
    fn annotated_params_split_on_colon() {
        let sig = parse(
            "def two_sum(nums: list[int], target: int) -> list[int]",
            "two_sum",
        )
        .unwrap();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].name, "nums");
        assert_eq!(sig.params[0].ty, "list[int]");
        assert_eq!(sig.params[1].name, "target");
        assert_eq!(sig.params[1].ty, "int");
    }

    #[test]
    fn missing_name_is_malformed() {
        let err = parse("int add(int a, int b)", "subtract").unwrap_err();
        assert!(matches!(err, JudgeError::MalformedSignature(_)));
    }

    #[test]
    fn name_matches_whole_tokens_only() {
        // `add` embedded in another identifier must not anchor there
        for sig_text in ["int radd(int a)", "int add_all(int a)", "int adds(int a)"] {
            let err = parse(sig_text, "add").unwrap_err();
            assert!(
                matches!(err, JudgeError::MalformedSignature(_)),
                "signature: {}",
                sig_text
            );
        }
        // a lookalike identifier earlier in the text is skipped over
        let sig = parse("myadd add(int a)", "add").unwrap();
        assert_eq!(sig.return_type, "myadd");
        assert_eq!(sig.params.len(), 1);
    }

    #[test]
    fn missing_parens_is_malformed() {
        let err = parse("int add", "add").unwrap_err();
        assert!(matches!(err, JudgeError::MalformedSignature(_)));
    }

    #[test]
    fn arity_matches_comma_count() {
        for (sig_text, arity) in [
            ("int f(int a)", 1),
            ("int f(int a, int b, int c)", 3),
            ("int f(vector<int> xs, string s, bool flag, double d)", 4),
        ] {
            let sig = parse(sig_text, "f").unwrap();
            assert_eq!(sig.params.len(), arity, "signature: {}", sig_text);
        }
    }
}
