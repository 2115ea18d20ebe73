// Language toolchain configuration, loaded from config/languages.json
// with built-in defaults when the file is absent.

use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse languages.json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown language '{0}' in languages.json")]
    UnknownLanguage(String),
    #[error("no languages configured")]
    Empty,
    #[error("language '{0}' is not configured")]
    NotConfigured(Language),
}

/// One toolchain invocation. `{source}`, `{binary}` and `{dir}` in the
/// command or args are substituted with workspace paths at run time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainCommand {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolchainCommand {
    pub fn new(command: &str, args: &[&str]) -> ToolchainCommand {
        ToolchainCommand {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub name: String,
    pub version: String,
    pub file_extension: String,
    /// Absent for languages the sandbox runs straight from source.
    #[serde(default)]
    pub compile: Option<ToolchainCommand>,
    pub run: ToolchainCommand,
    #[serde(default = "default_timeout")]
    pub default_timeout_ms: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Debug, Serialize, Deserialize)]
struct LanguagesFile {
    languages: Vec<LanguageConfig>,
}

/// Authoritative registry of configured language toolchains.
#[derive(Debug, Clone)]
pub struct LanguageConfigManager {
    configs: HashMap<Language, LanguageConfig>,
}

impl LanguageConfigManager {
    /// Load toolchain configuration from a languages.json file.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.display().to_string(),
            source,
        })?;
        let file: LanguagesFile = serde_json::from_str(&content)?;

        let mut configs = HashMap::new();
        for config in file.languages {
            let language = Language::from_str(&config.name)
                .ok_or_else(|| ConfigError::UnknownLanguage(config.name.clone()))?;
            configs.insert(language, config);
        }
        if configs.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(Self { configs })
    }

    /// Load from config/languages.json, falling back to the built-in
    /// host toolchain defaults when the file does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let default_path = Path::new("config/languages.json");
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::builtin())
        }
    }

    /// Built-in defaults for a host with g++, a JDK and python3 on PATH.
    pub fn builtin() -> Self {
        let mut configs = HashMap::new();
        configs.insert(
            Language::Cpp,
            LanguageConfig {
                name: "cpp".to_string(),
                version: "c++17".to_string(),
                file_extension: "cpp".to_string(),
                compile: Some(ToolchainCommand::new(
                    "g++",
                    &["-O2", "-std=c++17", "{source}", "-o", "{binary}"],
                )),
                run: ToolchainCommand::new("{binary}", &[]),
                default_timeout_ms: DEFAULT_TIMEOUT_MS,
            },
        );
        configs.insert(
            Language::Java,
            LanguageConfig {
                name: "java".to_string(),
                version: "17".to_string(),
                file_extension: "java".to_string(),
                compile: Some(ToolchainCommand::new("javac", &["{source}"])),
                run: ToolchainCommand::new("java", &["-cp", "{dir}", "Main"]),
                default_timeout_ms: DEFAULT_TIMEOUT_MS,
            },
        );
        configs.insert(
            Language::Python,
            LanguageConfig {
                name: "python".to_string(),
                version: "3".to_string(),
                file_extension: "py".to_string(),
                compile: Some(ToolchainCommand::new(
                    "python3",
                    &["-m", "py_compile", "{source}"],
                )),
                run: ToolchainCommand::new("python3", &["-u", "{source}"]),
                default_timeout_ms: DEFAULT_TIMEOUT_MS,
            },
        );
        Self { configs }
    }

    pub fn get_config(&self, language: Language) -> Result<&LanguageConfig, ConfigError> {
        self.configs
            .get(&language)
            .ok_or(ConfigError::NotConfigured(language))
    }

    pub fn is_enabled(&self, language: Language) -> bool {
        self.configs.contains_key(&language)
    }

    pub fn list_languages(&self) -> Vec<&LanguageConfig> {
        let mut all: Vec<&LanguageConfig> = self.configs.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_all_languages() {
        let manager = LanguageConfigManager::builtin();
        for lang in Language::all() {
            assert!(manager.is_enabled(lang), "missing builtin for {}", lang);
        }
    }

    #[test]
    fn compiled_languages_have_compile_steps() {
        let manager = LanguageConfigManager::builtin();
        assert!(manager.get_config(Language::Cpp).unwrap().compile.is_some());
        assert!(manager.get_config(Language::Java).unwrap().compile.is_some());
    }

    #[test]
    fn load_parses_inline_json() {
        let json = r#"{
            "languages": [
                {
                    "name": "python",
                    "version": "3.12",
                    "file_extension": "py",
                    "run": { "command": "python3", "args": ["-u", "{source}"] }
                }
            ]
        }"#;
        let dir = std::env::temp_dir().join(format!("gavel-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("languages.json");
        fs::write(&path, json).unwrap();

        let manager = LanguageConfigManager::load(&path).unwrap();
        assert!(manager.is_enabled(Language::Python));
        assert!(!manager.is_enabled(Language::Java));
        let config = manager.get_config(Language::Python).unwrap();
        assert_eq!(config.default_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(config.compile.is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unknown_language_is_rejected() {
        let json = r#"{"languages": [{"name": "cobol", "version": "85", "file_extension": "cob", "run": {"command": "cobc"}}]}"#;
        let dir = std::env::temp_dir().join(format!("gavel-config-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("languages.json");
        fs::write(&path, json).unwrap();

        let err = LanguageConfigManager::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLanguage(_)));

        fs::remove_dir_all(&dir).ok();
    }
}
