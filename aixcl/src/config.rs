//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with a
//! fallback name, and assembles the final [`StackConfig`] from an optional
//! YAML file plus environment overrides.

use aixcl_common::{ConfigError, StackConfig};
use std::path::PathBuf;

/// Get an environment variable with fallback to a secondary name
///
/// If the primary variable is set, returns its value.
/// If only the fallback variable is set, returns its value and logs which
/// name was used.
///
/// # Arguments
/// * `primary` - The preferred environment variable name
/// * `fallback` - The variable consulted when `primary` is unset
///
/// # Example
/// ```
/// use aixcl::config::get_env_with_fallback;
///
/// let file = get_env_with_fallback("AIXCL_COMPOSE_FILE", "COMPOSE_FILE");
/// ```
pub fn get_env_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    if let Ok(val) = std::env::var(primary) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(fallback) {
        tracing::debug!(
            "Environment variable '{}' not set, using '{}'",
            primary,
            fallback
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(primary: &str, fallback: &str, default: &str) -> String {
    get_env_with_fallback(primary, fallback).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    primary: &str,
    fallback: &str,
    default: T,
) -> T {
    get_env_with_fallback(primary, fallback)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Log filter used when nothing is configured.
///
/// Human-facing output goes to stdout, so the CLI only logs warnings by default.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log filter from `AIXCL_LOG_LEVEL` (fallback: `RUST_LOG`).
pub fn get_log_level() -> String {
    get_env_with_fallback_or("AIXCL_LOG_LEVEL", "RUST_LOG", DEFAULT_LOG_LEVEL)
}

/// Build the stack configuration.
///
/// Resolution order:
/// 1. `path` argument, else `AIXCL_CONFIG`, parsed as YAML; defaults otherwise
/// 2. `AIXCL_COMPOSE_FILE` (fallback `COMPOSE_FILE`)
/// 3. `AIXCL_PROJECT_NAME` (fallback `COMPOSE_PROJECT_NAME`)
/// 4. `AIXCL_DOCKER_BIN`
/// 5. `AIXCL_STARTUP_ATTEMPTS`, `AIXCL_STARTUP_INTERVAL`, `AIXCL_STOP_TIMEOUT`
///    (unparsable values keep the configured value)
pub fn load_stack_config(path: Option<PathBuf>) -> Result<StackConfig, ConfigError> {
    let path = path.or_else(|| std::env::var("AIXCL_CONFIG").ok().map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading stack config");
            StackConfig::from_yaml_file(&path)?
        }
        None => StackConfig::default(),
    };

    if let Some(file) = get_env_with_fallback("AIXCL_COMPOSE_FILE", "COMPOSE_FILE") {
        config.compose_file = PathBuf::from(file);
    }
    if let Some(project) = get_env_with_fallback("AIXCL_PROJECT_NAME", "COMPOSE_PROJECT_NAME") {
        config.project_name = Some(project);
    }
    if let Ok(bin) = std::env::var("AIXCL_DOCKER_BIN") {
        config.docker_bin = bin;
    }
    config.startup_attempts = get_env_with_fallback_parse(
        "AIXCL_STARTUP_ATTEMPTS",
        "AIXCL_STARTUP_ATTEMPTS",
        config.startup_attempts,
    );
    config.startup_interval_secs = get_env_with_fallback_parse(
        "AIXCL_STARTUP_INTERVAL",
        "AIXCL_STARTUP_INTERVAL",
        config.startup_interval_secs,
    );
    config.stop_timeout_secs = get_env_with_fallback_parse(
        "AIXCL_STOP_TIMEOUT",
        "AIXCL_STOP_TIMEOUT",
        config.stop_timeout_secs,
    );

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_stack_env() {
        for name in [
            "AIXCL_CONFIG",
            "AIXCL_COMPOSE_FILE",
            "COMPOSE_FILE",
            "AIXCL_PROJECT_NAME",
            "COMPOSE_PROJECT_NAME",
            "AIXCL_DOCKER_BIN",
            "AIXCL_STARTUP_ATTEMPTS",
            "AIXCL_STARTUP_INTERVAL",
            "AIXCL_STOP_TIMEOUT",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_get_env_with_fallback_primary() {
        std::env::set_var("TEST_AIXCL_PRIMARY", "primary_value");
        std::env::remove_var("TEST_AIXCL_FALLBACK");

        let result = get_env_with_fallback("TEST_AIXCL_PRIMARY", "TEST_AIXCL_FALLBACK");
        assert_eq!(result, Some("primary_value".to_string()));

        std::env::remove_var("TEST_AIXCL_PRIMARY");
    }

    #[test]
    #[serial]
    fn test_get_env_with_fallback_secondary() {
        std::env::remove_var("TEST_AIXCL_PRIMARY2");
        std::env::set_var("TEST_AIXCL_FALLBACK2", "fallback_value");

        let result = get_env_with_fallback("TEST_AIXCL_PRIMARY2", "TEST_AIXCL_FALLBACK2");
        assert_eq!(result, Some("fallback_value".to_string()));

        std::env::remove_var("TEST_AIXCL_FALLBACK2");
    }

    #[test]
    #[serial]
    fn test_get_env_with_fallback_primary_takes_precedence() {
        std::env::set_var("TEST_AIXCL_PRIMARY3", "primary");
        std::env::set_var("TEST_AIXCL_FALLBACK3", "fallback");

        let result = get_env_with_fallback("TEST_AIXCL_PRIMARY3", "TEST_AIXCL_FALLBACK3");
        assert_eq!(result, Some("primary".to_string()));

        std::env::remove_var("TEST_AIXCL_PRIMARY3");
        std::env::remove_var("TEST_AIXCL_FALLBACK3");
    }

    #[test]
    #[serial]
    fn test_get_env_with_fallback_parse_invalid_uses_default() {
        std::env::set_var("TEST_AIXCL_PARSE", "not-a-number");
        std::env::remove_var("TEST_AIXCL_PARSE_OLD");

        let result: u32 = get_env_with_fallback_parse("TEST_AIXCL_PARSE", "TEST_AIXCL_PARSE_OLD", 30);
        assert_eq!(result, 30);

        std::env::remove_var("TEST_AIXCL_PARSE");
    }

    #[test]
    #[serial]
    fn test_get_log_level_default() {
        std::env::remove_var("AIXCL_LOG_LEVEL");
        std::env::remove_var("RUST_LOG");
        assert_eq!(get_log_level(), "warn");
    }

    #[test]
    #[serial]
    fn test_load_stack_config_defaults() {
        clear_stack_env();

        let config = load_stack_config(None).unwrap();
        assert_eq!(config, StackConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_stack_config_env_overrides() {
        clear_stack_env();
        std::env::set_var("COMPOSE_FILE", "/srv/aixcl/compose.yml");
        std::env::set_var("AIXCL_PROJECT_NAME", "aixcl");
        std::env::set_var("AIXCL_DOCKER_BIN", "/usr/local/bin/docker");

        let config = load_stack_config(None).unwrap();
        assert_eq!(config.compose_file, PathBuf::from("/srv/aixcl/compose.yml"));
        assert_eq!(config.project_name.as_deref(), Some("aixcl"));
        assert_eq!(config.docker_bin, "/usr/local/bin/docker");

        clear_stack_env();
    }

    #[test]
    #[serial]
    fn test_load_stack_config_numeric_env_overrides() {
        clear_stack_env();
        std::env::set_var("AIXCL_STARTUP_ATTEMPTS", "60");
        std::env::set_var("AIXCL_STARTUP_INTERVAL", "soon");
        std::env::set_var("AIXCL_STOP_TIMEOUT", "10");

        let config = load_stack_config(None).unwrap();
        assert_eq!(config.startup_attempts, 60);
        // 解釈できない値は設定値のまま
        assert_eq!(config.startup_interval_secs, 2);
        assert_eq!(config.stop_timeout_secs, 10);

        clear_stack_env();
    }

    #[test]
    #[serial]
    fn test_load_stack_config_zero_attempts_from_env_rejected() {
        clear_stack_env();
        std::env::set_var("AIXCL_STARTUP_ATTEMPTS", "0");

        let result = load_stack_config(None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        clear_stack_env();
    }

    #[test]
    #[serial]
    fn test_load_stack_config_from_env_path() {
        clear_stack_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "startup_attempts: 3\nstartup_interval_secs: 1").unwrap();
        std::env::set_var("AIXCL_CONFIG", file.path());

        let config = load_stack_config(None).unwrap();
        assert_eq!(config.startup_attempts, 3);
        assert_eq!(config.startup_interval_secs, 1);

        clear_stack_env();
    }

    #[test]
    #[serial]
    fn test_load_stack_config_invalid_file() {
        clear_stack_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "startup_attempts: 0").unwrap();

        let result = load_stack_config(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
