//! Environment variable handling.

use std::env;

/// Set to a truthy value to emit logs as JSON lines.
pub const LOG_JSON_ENV: &str = "WORKITT_LOG_JSON";

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_var_missing() {
        assert!(get_var("WORKITT_TEST_SURELY_UNSET_VAR").is_none());
        assert!(!get_bool("WORKITT_TEST_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_get_bool_values() {
        env::set_var("WORKITT_TEST_BOOL_YES", "Yes");
        env::set_var("WORKITT_TEST_BOOL_ZERO", "0");
        assert!(get_bool("WORKITT_TEST_BOOL_YES"));
        assert!(!get_bool("WORKITT_TEST_BOOL_ZERO"));
        env::remove_var("WORKITT_TEST_BOOL_YES");
        env::remove_var("WORKITT_TEST_BOOL_ZERO");
    }
}
