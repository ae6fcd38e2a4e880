//! `.wisprc` configuration (§4.10).
//!
//! Follows the builder-style `Config`/`with_*` pattern this crate family
//! uses for its compiler configuration: start from [`Config::default`],
//! layer in file settings, then CLI flags override whatever the file set.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt1: String,
    pub prompt2: String,
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt1: "> ".to_string(),
            prompt2: "| ".to_string(),
            history_file: default_history_file(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    prompt1: Option<String>,
    prompt2: Option<String>,
    history_file: Option<PathBuf>,
}

fn default_history_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("wisp").join("history"))
}

impl Config {
    pub fn with_prompt1(mut self, prompt1: impl Into<String>) -> Self {
        self.prompt1 = prompt1.into();
        self
    }

    pub fn with_prompt2(mut self, prompt2: impl Into<String>) -> Self {
        self.prompt2 = prompt2.into();
        self
    }

    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Layer in `.wisprc` from the current directory, falling back to
    /// `$HOME`, if either exists and parses.
    pub fn with_file_config(mut self) -> Self {
        let candidates = [
            Path::new(".wisprc").to_path_buf(),
            dirs::home_dir().map(|h| h.join(".wisprc")).unwrap_or_default(),
        ];
        for path in candidates {
            if let Ok(text) = std::fs::read_to_string(&path) {
                match toml::from_str::<FileConfig>(&text) {
                    Ok(file) => {
                        if let Some(p1) = file.prompt1 {
                            self.prompt1 = p1;
                        }
                        if let Some(p2) = file.prompt2 {
                            self.prompt2 = p2;
                        }
                        if let Some(h) = file.history_file {
                            self.history_file = Some(h);
                        }
                        tracing::info!(path = %path.display(), "loaded .wisprc");
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "ignoring malformed .wisprc");
                    }
                }
                break;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_reasonable() {
        let cfg = Config::default();
        assert_eq!(cfg.prompt1, "> ");
        assert_eq!(cfg.prompt2, "| ");
    }

    #[test]
    fn builder_overrides_apply() {
        let cfg = Config::default().with_prompt1(">>> ").with_prompt2("... ");
        assert_eq!(cfg.prompt1, ">>> ");
        assert_eq!(cfg.prompt2, "... ");
    }
}
