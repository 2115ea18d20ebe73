//! Per-language code assembly.
//!
//! Each assembler emits one complete, self-contained driver program:
//! the user function declared in native syntax with the user body
//! embedded verbatim, a decoder that reads one split argument literal
//! per line from stdin and materializes native values, the function
//! invocation, and an encoder that prints exactly one canonical result
//! line to stdout. Diagnostics never touch stdout.
//!
//! Because arguments arrive on stdin instead of being baked into the
//! source, one assembled program serves every test case of a
//! submission: compile once, run many. Drivers are built from typed
//! section builders, not inline string splicing of user values.

mod cpp;
mod java;
mod python;

pub use cpp::CppAssembler;
pub use java::JavaAssembler;
pub use python::PythonAssembler;

use crate::signature::FunctionSignature;
use gavel_common::types::Language;

/// Language-neutral classification of a declared parameter or return
/// type, driving argument decoding and result encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    IntSeq,
    StrSeq,
    Str,
    Bool,
    /// Anything unrecognized is assumed numeric and passed through
    /// best-effort rather than rejected; signatures are free text.
    Numeric,
}

pub fn classify(declared: &str) -> TypeClass {
    let ty = declared
        .trim()
        .trim_end_matches('&')
        .trim()
        .to_ascii_lowercase();
    if ty.contains("vector<string>") || ty.contains("string[]") || ty.contains("list[str]") {
        TypeClass::StrSeq
    } else if ty.contains("vector") || ty.contains("[]") || ty.contains("list") {
        TypeClass::IntSeq
    } else if ty == "string" || ty == "std::string" || ty == "str" {
        TypeClass::Str
    } else if ty == "bool" || ty == "boolean" {
        TypeClass::Bool
    } else {
        TypeClass::Numeric
    }
}

pub trait CodeAssembler {
    fn language(&self) -> Language;

    /// Emit the complete driver program for this signature and user
    /// body. The program reads `signature.params.len()` lines from
    /// stdin and prints one encoded result line.
    fn assemble(&self, signature: &FunctionSignature, body: &str) -> String;
}

pub fn assembler_for(language: Language) -> Box<dyn CodeAssembler + Send + Sync> {
    match language {
        Language::Cpp => Box::new(CppAssembler),
        Language::Java => Box::new(JavaAssembler),
        Language::Python => Box::new(PythonAssembler),
    }
}
