//! C++ driver assembly (ahead-of-time compiled family).

use super::{classify, CodeAssembler, TypeClass};
use crate::signature::FunctionSignature;
use gavel_common::types::Language;

const PRELUDE: &str = r#"#include <algorithm>
#include <cctype>
#include <iostream>
#include <sstream>
#include <string>
#include <unordered_map>
#include <vector>
using namespace std;

static string __read_arg() {
    string line;
    getline(cin, line);
    return line;
}

static string __trim(const string& raw) {
    size_t b = 0, e = raw.size();
    while (b < e && isspace((unsigned char)raw[b])) ++b;
    while (e > b && isspace((unsigned char)raw[e - 1])) --e;
    return raw.substr(b, e - b);
}

static vector<int> __decode_int_seq(const string& raw) {
    string s = raw;
    s.erase(remove(s.begin(), s.end(), '['), s.end());
    s.erase(remove(s.begin(), s.end(), ']'), s.end());
    vector<int> out;
    stringstream ss(s);
    int v;
    while (ss >> v) {
        out.push_back(v);
        if (ss.peek() == ',') ss.ignore();
    }
    return out;
}

static string __decode_str(const string& raw) {
    string s = __trim(raw);
    if (s.size() >= 2 && s.front() == '"' && s.back() == '"') s = s.substr(1, s.size() - 2);
    string out;
    for (size_t i = 0; i < s.size(); ++i) {
        if (s[i] == '\\' && i + 1 < s.size()) {
            char next = s[++i];
            if (next == 'n') out += '\n';
            else if (next == 't') out += '\t';
            else out += next;
        } else {
            out += s[i];
        }
    }
    return out;
}

static vector<string> __decode_str_seq(const string& raw) {
    string s = __trim(raw);
    if (!s.empty() && s.front() == '[') s.erase(s.begin());
    if (!s.empty() && s.back() == ']') s.pop_back();
    vector<string> out;
    string curr;
    bool in_str = false;
    for (size_t i = 0; i < s.size(); ++i) {
        char c = s[i];
        if (c == '"' && (i == 0 || s[i - 1] != '\\')) in_str = !in_str;
        if (c == ',' && !in_str) {
            out.push_back(__decode_str(curr));
            curr.clear();
        } else {
            curr += c;
        }
    }
    if (!__trim(curr).empty()) out.push_back(__decode_str(curr));
    return out;
}

static bool __decode_bool(const string& raw) {
    string s = __trim(raw);
    for (size_t i = 0; i < s.size(); ++i) s[i] = (char)tolower((unsigned char)s[i]);
    return s == "true";
}

static string __escape(const string& v) {
    string out;
    for (size_t i = 0; i < v.size(); ++i) {
        char c = v[i];
        if (c == '"' || c == '\\') { out += '\\'; out += c; }
        else if (c == '\n') out += "\\n";
        else if (c == '\t') out += "\\t";
        else out += c;
    }
    return out;
}

static void __emit(const vector<int>& v) {
    cout << '[';
    for (size_t i = 0; i < v.size(); ++i) {
        if (i) cout << ',';
        cout << v[i];
    }
    cout << ']';
}

static void __emit(const vector<string>& v) {
    cout << '[';
    for (size_t i = 0; i < v.size(); ++i) {
        if (i) cout << ',';
        cout << '"' << __escape(v[i]) << '"';
    }
    cout << ']';
}

static void __emit(const string& v) { cout << '"' << __escape(v) << '"'; }

static void __emit(bool v) { cout << (v ? "true" : "false"); }

template <typename T>
static void __emit(const T& v) { cout << v; }
"#;

pub struct CppAssembler;

impl CppAssembler {
    fn declaration(signature: &FunctionSignature, body: &str) -> String {
        let return_type = if signature.return_type.is_empty() {
            "auto"
        } else {
            signature.return_type.as_str()
        };
        let params: Vec<String> = signature
            .params
            .iter()
            .map(|p| {
                if p.ty.is_empty() {
                    p.name.clone()
                } else {
                    format!("{} {}", p.ty, p.name)
                }
            })
            .collect();
        format!(
            "{} {}({}) {{\n{}\n}}\n",
            return_type,
            signature.name,
            params.join(", "),
            body
        )
    }

    fn argument_decoders(signature: &FunctionSignature) -> String {
        let mut out = String::new();
        for param in &signature.params {
            let line = match classify(&param.ty) {
                TypeClass::IntSeq => {
                    format!("    vector<int> {} = __decode_int_seq(__read_arg());\n", param.name)
                }
                TypeClass::StrSeq => {
                    format!("    vector<string> {} = __decode_str_seq(__read_arg());\n", param.name)
                }
                TypeClass::Str => {
                    format!("    string {} = __decode_str(__read_arg());\n", param.name)
                }
                TypeClass::Bool => {
                    format!("    bool {} = __decode_bool(__read_arg());\n", param.name)
                }
                TypeClass::Numeric => {
                    let ty = if param.ty.is_empty() { "long long" } else { param.ty.as_str() };
                    format!(
                        "    {ty} {name}{{}};\n    {{ stringstream __ss_{name}(__read_arg()); __ss_{name} >> {name}; }}\n",
                        ty = ty,
                        name = param.name
                    )
                }
            };
            out.push_str(&line);
        }
        out
    }
}

impl CodeAssembler for CppAssembler {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn assemble(&self, signature: &FunctionSignature, body: &str) -> String {
        let call_args: Vec<&str> = signature.params.iter().map(|p| p.name.as_str()).collect();
        let mut source = String::with_capacity(PRELUDE.len() + body.len() + 512);
        source.push_str(PRELUDE);
        source.push('\n');
        source.push_str(&Self::declaration(signature, body));
        source.push_str("\nint main() {\n");
        source.push_str(&Self::argument_decoders(signature));
        source.push_str(&format!(
            "    auto __result = {}({});\n",
            signature.name,
            call_args.join(", ")
        ));
        source.push_str("    __emit(__result);\n    cout << '\\n';\n    return 0;\n}\n");
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature;

    #[test]
    fn declares_the_user_function_verbatim() {
        let sig = signature::parse("int add(int a, int b)", "add").unwrap();
        let source = CppAssembler.assemble(&sig, "    return a + b;");
        assert!(source.contains("int add(int a, int b) {"));
        assert!(source.contains("    return a + b;"));
        assert!(source.contains("auto __result = add(a, b);"));
    }

    #[test]
    fn sequence_params_use_runtime_decoders() {
        let sig = signature::parse(
            "vector<int> twoSum(vector<int> nums, int target)",
            "twoSum",
        )
        .unwrap();
        let source = CppAssembler.assemble(&sig, "    return {};");
        assert!(source.contains("vector<int> nums = __decode_int_seq(__read_arg());"));
        assert!(source.contains("int target{};"));
        assert!(source.contains("__ss_target >> target;"));
    }

    #[test]
    fn string_and_bool_params() {
        let sig = signature::parse(
            "bool check(string s, bool strict, vector<string> words)",
            "check",
        )
        .unwrap();
        let source = CppAssembler.assemble(&sig, "    return strict;");
        assert!(source.contains("string s = __decode_str(__read_arg());"));
        assert!(source.contains("bool strict = __decode_bool(__read_arg());"));
        assert!(source.contains("vector<string> words = __decode_str_seq(__read_arg());"));
    }

    #[test]
    fn string_results_go_through_the_escaper() {
        let sig = signature::parse("string echo(string s)", "echo").unwrap();
        let source = CppAssembler.assemble(&sig, "    return s;");
        // quotes, backslashes and newlines inside a result must be
        // re-escaped so the output stays a single canonical line
        assert!(source.contains(r#"cout << '"' << __escape(v) << '"';"#));
        assert!(source.contains(r#"cout << '"' << __escape(v[i]) << '"';"#));
        assert!(source.contains(r#"if (c == '"' || c == '\\')"#));
    }

    #[test]
    fn emits_exactly_one_result_line() {
        let sig = signature::parse("int f()", "f").unwrap();
        let source = CppAssembler.assemble(&sig, "    return 1;");
        assert_eq!(source.matches("__emit(__result);").count(), 1);
        assert!(source.contains("cout << '\\n';"));
    }
}
