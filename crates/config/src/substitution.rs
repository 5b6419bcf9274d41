use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const PLACEHOLDER_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

fn placeholder_regex() -> Result<Regex> {
    Regex::new(PLACEHOLDER_PATTERN).context("Invalid placeholder pattern")
}

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = placeholder_regex()?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
        let placeholder = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let Some(var_name) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
            return placeholder.to_string();
        };

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                // Left in place so the validator can report it
                placeholder.to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Get environment variable with a default value
pub fn get_env_or_default(var_name: &str, default: &str) -> String {
    match env::var(var_name) {
        Ok(value) => {
            debug!("Using environment variable: {} = \"{}\"", var_name, value);
            value
        }
        Err(_) => {
            debug!(
                "Environment variable '{}' not set, using default: \"{}\"",
                var_name, default
            );
            default.to_string()
        }
    }
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    placeholder_regex()
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_both_forms() {
        env::set_var("CLIMATE_SUBST_DIR", "/data");
        env::set_var("CLIMATE_SUBST_FILE", "hawaii.sqlite");

        let out = substitute_env_vars("url: sqlite://${CLIMATE_SUBST_DIR}/$CLIMATE_SUBST_FILE").unwrap();
        assert_eq!(out, "url: sqlite:///data/hawaii.sqlite");
    }

    #[test]
    fn test_missing_var_keeps_placeholder() {
        env::remove_var("CLIMATE_SUBST_MISSING");

        let out = substitute_env_vars("host: ${CLIMATE_SUBST_MISSING}").unwrap();
        assert_eq!(out, "host: ${CLIMATE_SUBST_MISSING}");
        assert!(has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_get_env_or_default() {
        env::remove_var("CLIMATE_SUBST_UNSET");
        assert_eq!(get_env_or_default("CLIMATE_SUBST_UNSET", "5000"), "5000");

        env::set_var("CLIMATE_SUBST_SET", "8080");
        assert_eq!(get_env_or_default("CLIMATE_SUBST_SET", "5000"), "8080");
    }

    #[test]
    fn test_plain_text_has_no_placeholders() {
        assert!(!has_unresolved_env_vars("sqlite://hawaii.sqlite"));
    }
}
