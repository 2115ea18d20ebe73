//! Java driver assembly (managed/VM family). The public class is
//! `Main`, so the sandbox must write this source as `Main.java`.

use super::{classify, CodeAssembler, TypeClass};
use crate::signature::FunctionSignature;
use gavel_common::types::Language;

const HELPERS: &str = r#"
    private static int[] __decodeIntSeq(String raw) {
        String s = raw.trim();
        if (s.startsWith("[")) s = s.substring(1);
        if (s.endsWith("]")) s = s.substring(0, s.length() - 1);
        s = s.trim();
        if (s.isEmpty()) return new int[0];
        String[] parts = s.split(",");
        int[] out = new int[parts.length];
        for (int i = 0; i < parts.length; i++) out[i] = Integer.parseInt(parts[i].trim());
        return out;
    }

    private static String __decodeStr(String raw) {
        String s = raw.trim();
        if (s.length() >= 2 && s.charAt(0) == '"' && s.charAt(s.length() - 1) == '"') {
            s = s.substring(1, s.length() - 1);
        }
        StringBuilder out = new StringBuilder();
        for (int i = 0; i < s.length(); i++) {
            char c = s.charAt(i);
            if (c == '\\' && i + 1 < s.length()) {
                char next = s.charAt(++i);
                if (next == 'n') out.append('\n');
                else if (next == 't') out.append('\t');
                else out.append(next);
            } else {
                out.append(c);
            }
        }
        return out.toString();
    }

    private static String[] __decodeStrSeq(String raw) {
        String s = raw.trim();
        if (s.startsWith("[")) s = s.substring(1);
        if (s.endsWith("]")) s = s.substring(0, s.length() - 1);
        java.util.List<String> out = new java.util.ArrayList<>();
        StringBuilder curr = new StringBuilder();
        boolean inStr = false;
        for (int i = 0; i < s.length(); i++) {
            char c = s.charAt(i);
            if (c == '"' && (i == 0 || s.charAt(i - 1) != '\\')) inStr = !inStr;
            if (c == ',' && !inStr) {
                out.add(__decodeStr(curr.toString()));
                curr.setLength(0);
            } else {
                curr.append(c);
            }
        }
        if (curr.toString().trim().length() > 0) out.add(__decodeStr(curr.toString()));
        return out.toArray(new String[0]);
    }

    private static boolean __decodeBool(String raw) {
        return raw.trim().equalsIgnoreCase("true");
    }

    private static String __escape(String s) {
        StringBuilder out = new StringBuilder();
        for (int i = 0; i < s.length(); i++) {
            char c = s.charAt(i);
            if (c == '"' || c == '\\') out.append('\\').append(c);
            else if (c == '\n') out.append("\\n");
            else if (c == '\t') out.append("\\t");
            else out.append(c);
        }
        return out.toString();
    }

    private static String __encode(Object value) {
        if (value instanceof int[]) {
            int[] v = (int[]) value;
            StringBuilder sb = new StringBuilder("[");
            for (int i = 0; i < v.length; i++) {
                if (i > 0) sb.append(',');
                sb.append(v[i]);
            }
            return sb.append(']').toString();
        }
        if (value instanceof String[]) {
            String[] v = (String[]) value;
            StringBuilder sb = new StringBuilder("[");
            for (int i = 0; i < v.length; i++) {
                if (i > 0) sb.append(',');
                sb.append('"').append(__escape(v[i])).append('"');
            }
            return sb.append(']').toString();
        }
        if (value instanceof java.util.List<?>) {
            java.util.List<?> v = (java.util.List<?>) value;
            StringBuilder sb = new StringBuilder("[");
            for (int i = 0; i < v.size(); i++) {
                if (i > 0) sb.append(',');
                sb.append(__encode(v.get(i)));
            }
            return sb.append(']').toString();
        }
        if (value instanceof String) {
            return "\"" + __escape((String) value) + "\"";
        }
        return String.valueOf(value);
    }
"#;

pub struct JavaAssembler;

impl JavaAssembler {
    /// Map a free-text declared type onto a Java type.
    fn java_type(declared: &str) -> String {
        match classify(declared) {
            TypeClass::IntSeq => "int[]".to_string(),
            TypeClass::StrSeq => "String[]".to_string(),
            TypeClass::Str => "String".to_string(),
            TypeClass::Bool => "boolean".to_string(),
            TypeClass::Numeric => match declared.trim().to_ascii_lowercase().as_str() {
                "int" | "integer" => "int".to_string(),
                "long" => "long".to_string(),
                "double" => "double".to_string(),
                "float" => "float".to_string(),
                _ => "long".to_string(),
            },
        }
    }

    fn decode_expr(declared: &str) -> String {
        match classify(declared) {
            TypeClass::IntSeq => "__decodeIntSeq(__in.readLine())".to_string(),
            TypeClass::StrSeq => "__decodeStrSeq(__in.readLine())".to_string(),
            TypeClass::Str => "__decodeStr(__in.readLine())".to_string(),
            TypeClass::Bool => "__decodeBool(__in.readLine())".to_string(),
            TypeClass::Numeric => match Self::java_type(declared).as_str() {
                "int" => "Integer.parseInt(__in.readLine().trim())".to_string(),
                "double" => "Double.parseDouble(__in.readLine().trim())".to_string(),
                "float" => "Float.parseFloat(__in.readLine().trim())".to_string(),
                _ => "Long.parseLong(__in.readLine().trim())".to_string(),
            },
        }
    }
}

impl CodeAssembler for JavaAssembler {
    fn language(&self) -> Language {
        Language::Java
    }

    fn assemble(&self, signature: &FunctionSignature, body: &str) -> String {
        let params: Vec<String> = signature
            .params
            .iter()
            .map(|p| format!("{} {}", Self::java_type(&p.ty), p.name))
            .collect();
        let call_args: Vec<&str> = signature.params.iter().map(|p| p.name.as_str()).collect();
        let return_type = Self::java_type(&signature.return_type);

        let mut source = String::with_capacity(HELPERS.len() + body.len() + 1024);
        source.push_str("import java.io.*;\nimport java.util.*;\n\npublic class Main {\n\n");
        source.push_str(&format!(
            "    static {} {}({}) {{\n{}\n    }}\n",
            return_type,
            signature.name,
            params.join(", "),
            body
        ));
        source.push_str(HELPERS);
        source.push_str("\n    public static void main(String[] args) throws IOException {\n");
        source.push_str(
            "        BufferedReader __in = new BufferedReader(new InputStreamReader(System.in));\n",
        );
        for param in &signature.params {
            source.push_str(&format!(
                "        {} {} = {};\n",
                Self::java_type(&param.ty),
                param.name,
                Self::decode_expr(&param.ty)
            ));
        }
        source.push_str(&format!(
            "        {} __result = {}({});\n",
            return_type,
            signature.name,
            call_args.join(", ")
        ));
        source.push_str("        System.out.println(__encode(__result));\n    }\n}\n");
        source
    }
}
