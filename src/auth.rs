use std::fmt;
use std::path::Path;

use log::debug;

use crate::error::{Result, StepStatsError};

/// Loads `KEY=value` pairs from a dotenv file into the process environment.
///
/// Variables already set in the environment win. A missing file is not an
/// error.
pub fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(StepStatsError::Config(format!(
            "Failed to load {}: {e}",
            path.display()
        ))),
    }
}

/// A GitHub personal access token.
///
/// `Debug` never prints the secret so tokens can't leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Picks the first non-blank token from the command line / environment
    /// value and the configuration file value, in that order.
    pub fn resolve(cli: Option<&str>, config: Option<&str>) -> Result<Self> {
        [cli, config]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(Token::from)
            .ok_or_else(|| {
                StepStatsError::MissingToken(
                    "set GIT_TOKEN, pass --token, or add `token` to the [github] config section"
                        .to_string(),
                )
            })
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_token_wins_over_config() {
        let token = Token::resolve(Some("from-cli"), Some("from-config")).unwrap();
        assert_eq!(token.as_str(), "from-cli");
    }

    #[test]
    fn test_falls_back_to_config_token() {
        let token = Token::resolve(None, Some("from-config")).unwrap();
        assert_eq!(token.as_str(), "from-config");
    }

    #[test]
    fn test_blank_cli_token_is_ignored() {
        let token = Token::resolve(Some("   "), Some("from-config")).unwrap();
        assert_eq!(token.as_str(), "from-config");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let result = Token::resolve(None, None);
        assert!(matches!(result, Err(StepStatsError::MissingToken(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let token = Token::from("ghp_secret");
        assert_eq!(format!("{token:?}"), "Token(***)");
    }

    mod env_file_tests {
        use super::*;
        use std::fs;
        use tempfile::TempDir;

        #[test]
        fn test_env_file_sets_missing_variables() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join(".env");
            fs::write(&path, "STEPSTATS_ENV_FILE_TOKEN=from-dotenv\n").unwrap();

            load_env_file(&path).unwrap();

            assert_eq!(
                std::env::var("STEPSTATS_ENV_FILE_TOKEN").unwrap(),
                "from-dotenv"
            );
        }

        #[test]
        fn test_missing_env_file_is_ignored() {
            let dir = TempDir::new().unwrap();

            assert!(load_env_file(&dir.path().join(".env")).is_ok());
        }

        #[test]
        fn test_malformed_env_file_is_an_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join(".env");
            fs::write(&path, "not a valid line\n").unwrap();

            let result = load_env_file(&path);

            assert!(matches!(result, Err(StepStatsError::Config(_))));
        }
    }
}
