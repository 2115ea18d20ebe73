//! Gavel judging core: turn a function signature, a user-authored
//! function body and free-text test-case literals into runnable
//! programs, execute them in time-bounded temp workspaces, and decide
//! pass/fail per test case and a final verdict per submission.

pub mod codegen;
pub mod comparator;
pub mod error;
pub mod judge;
pub mod sandbox;
pub mod signature;
pub mod splitter;


pub use error::JudgeError;
pub use judge::Judge;
pub use sandbox::Sandbox;
