//! Python driver assembly (interpreted family). The user body is
//! embedded verbatim below the `def` line and is expected to carry its
//! own indentation, matching how bodies are authored for this judge.

use super::{classify, CodeAssembler, TypeClass};
use crate::signature::FunctionSignature;
use gavel_common::types::Language;

const HELPERS: &str = r#"

def _gavel_decode_seq(raw):
    raw = raw.strip()
    try:
        value = ast.literal_eval(raw)
    except (ValueError, SyntaxError):
        return [int(x) for x in raw.strip('[]').split(',') if x.strip()]
    return list(value) if isinstance(value, (list, tuple)) else [value]


def _gavel_decode_str(raw):
    raw = raw.strip()
    if len(raw) >= 2 and raw[0] == '"' and raw[-1] == '"':
        try:
            return ast.literal_eval(raw)
        except (ValueError, SyntaxError):
            return raw[1:-1]
    return raw


def _gavel_decode_bool(raw):
    return raw.strip().lower() == 'true'


def _gavel_decode_num(raw):
    raw = raw.strip()
    try:
        return int(raw)
    except ValueError:
        try:
            return float(raw)
        except ValueError:
            return raw


def _gavel_encode(value):
    if isinstance(value, bool):
        return 'true' if value else 'false'
    if isinstance(value, str):
        escaped = (value.replace('\\', '\\\\').replace('"', '\\"')
                        .replace('\n', '\\n').replace('\t', '\\t'))
        return '"' + escaped + '"'
    if isinstance(value, (list, tuple)):
        return '[' + ','.join(_gavel_encode(v) for v in value) + ']'
    return str(value)

"#;

pub struct PythonAssembler;

impl PythonAssembler {
    fn decode_call(declared: &str, line_index: usize) -> String {
        let arg = format!("_gavel_lines[{}]", line_index);
        match classify(declared) {
            TypeClass::IntSeq | TypeClass::StrSeq => format!("_gavel_decode_seq({})", arg),
            TypeClass::Str => format!("_gavel_decode_str({})", arg),
            TypeClass::Bool => format!("_gavel_decode_bool({})", arg),
            TypeClass::Numeric => format!("_gavel_decode_num({})", arg),
        }
    }
}

impl CodeAssembler for PythonAssembler {
    fn language(&self) -> Language {
        Language::Python
    }

    fn assemble(&self, signature: &FunctionSignature, body: &str) -> String {
        let param_names: Vec<&str> = signature.params.iter().map(|p| p.name.as_str()).collect();

        let mut source = String::with_capacity(HELPERS.len() + body.len() + 512);
        source.push_str("import ast\nimport sys\n\n\n");
        source.push_str(&format!("def {}({}):\n", signature.name, param_names.join(", ")));
        source.push_str(body);
        if !body.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(HELPERS);
        source.push_str("\ndef _gavel_main():\n");
        source.push_str("    _gavel_lines = sys.stdin.read().split('\\n')\n");
        for (index, param) in signature.params.iter().enumerate() {
            source.push_str(&format!(
                "    {} = {}\n",
                param.name,
                Self::decode_call(&param.ty, index)
            ));
        }
        source.push_str(&format!(
            "    _gavel_result = {}({})\n",
            signature.name,
            param_names.join(", ")
        ));
        source.push_str("    sys.stdout.write(_gavel_encode(_gavel_result) + '\\n')\n");
        source.push_str("\n\n_gavel_main()\n");
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature;

    #[test]
    fn declares_the_function_with_parameter_names_only() {
        let sig = signature::parse(
            "vector<int> twoSum(vector<int> nums, int target)",
            "twoSum",
        )
        .unwrap();
        let source = PythonAssembler.assemble(&sig, "    return []");
        assert!(source.contains("def twoSum(nums, target):\n    return []"));
    }

    #[test]
    fn decodes_one_line_per_param_in_order() {
        let sig = signature::parse(
            "bool f(vector<int> xs, string s, bool flag, int n)",
            "f",
        )
        .unwrap();
        let source = PythonAssembler.assemble(&sig, "    return flag");
        assert!(source.contains("xs = _gavel_decode_seq(_gavel_lines[0])"));
        assert!(source.contains("s = _gavel_decode_str(_gavel_lines[1])"));
        assert!(source.contains("flag = _gavel_decode_bool(_gavel_lines[2])"));
        assert!(source.contains("n = _gavel_decode_num(_gavel_lines[3])"));
    }

    #[test]
    fn writes_single_encoded_line() {
        let sig = signature::parse("int f(int n)", "f").unwrap();
        let source = PythonAssembler.assemble(&sig, "    return n");
        assert!(source.contains("sys.stdout.write(_gavel_encode(_gavel_result) + '\\n')"));
    }

    #[test]
    fn string_results_go_through_the_escaper() {
        let sig = signature::parse("def echo(s: str) -> str", "echo").unwrap();
        let source = PythonAssembler.assemble(&sig, "    return s");
        assert!(source.contains(r"value.replace('\\', '\\\\')"));
        assert!(source.contains(r".replace('\n', '\\n')"));
    }

    #[test]
    fn appends_missing_trailing_newline_to_body() {
        let sig = signature::parse("int f(int n)", "f").unwrap();
        let source = PythonAssembler.assemble(&sig, "    return n");
        assert!(source.contains("    return n\n"));
    }
}
