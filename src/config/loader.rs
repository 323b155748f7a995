use std::fs;
use std::path::{Path, PathBuf};

use super::ValidationConfig;
use crate::errors::ValidateError;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".debtmap-validate.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse a TOML document and validate the resulting configuration.
pub fn parse_and_validate_config(contents: &str) -> Result<ValidationConfig, ValidateError> {
    let config = toml::from_str::<ValidationConfig>(contents)
        .map_err(|e| ValidateError::Config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    config.validated()
}

/// Load configuration from an explicit path.
///
/// Unlike discovery, an explicit path that cannot be read is an error.
pub fn load_config_from_path(path: &Path) -> Result<ValidationConfig, ValidateError> {
    let contents = fs::read_to_string(path).map_err(|e| ValidateError::io(path, e))?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try a discovered config path, falling back to `None` on read or parse failures.
fn try_load_config_from_path(config_path: &Path) -> Option<ValidationConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// The directory itself followed by its ancestors, up to `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Discover the configuration starting from `start`, or defaults when none is found.
pub fn load_config_from(start: PathBuf) -> ValidationConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No {} found after checking {} directories. Using default config.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            ValidationConfig::default()
        })
}

/// Discover the configuration from the current working directory.
pub fn load_config() -> ValidationConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            ValidationConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatchSensitivity, ScoreTolerance};
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            matching = "exact"

            [thresholds]
            critical = 20.0
            high = 10.0
            medium = 5.0
        "#})
        .unwrap();

        assert_eq!(config.matching, MatchSensitivity::Exact);
        assert_eq!(config.thresholds.critical, 20.0);
        assert_eq!(config.new_critical_penalty, 25.0);
        assert_eq!(config.tolerance, ScoreTolerance::Absolute(0.01));
    }

    #[test]
    fn test_parse_relative_tolerance() {
        let config = parse_and_validate_config(indoc! {r#"
            [tolerance]
            mode = "relative"
            value = 0.05
        "#})
        .unwrap();
        assert_eq!(config.tolerance, ScoreTolerance::Relative(0.05));
    }

    #[test]
    fn test_parse_rejects_invalid_thresholds() {
        let result = parse_and_validate_config(indoc! {r#"
            [thresholds]
            critical = 2.0
            high = 6.0
            medium = 4.0
        "#});
        assert!(matches!(result, Err(ValidateError::Config(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let result = parse_and_validate_config("thresholds = [");
        assert!(result.is_err());
    }

    #[test]
    fn test_discovery_walks_up_to_parent() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "new_critical_penalty = 10.0\n",
        )
        .unwrap();

        let config = load_config_from(nested);
        assert_eq!(config.new_critical_penalty, 10.0);
    }

    #[test]
    fn test_discovery_falls_back_to_defaults_on_invalid_file() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();

        let config = load_config_from(root.path().to_path_buf());
        assert_eq!(config, ValidationConfig::default());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let root = TempDir::new().unwrap();
        let result = load_config_from_path(&root.path().join("missing.toml"));
        assert!(matches!(result, Err(ValidateError::Io { .. })));
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }
}
