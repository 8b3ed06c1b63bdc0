use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref ENV_VAR_PATTERN: Regex = Regex::new(
        r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)|%([A-Za-z_][A-Za-z0-9_()]*)%"
    ).unwrap();
}

/// Expand `${VAR}`, `$VAR` and `%VAR%` references in a configured path.
///
/// Unset variables are left exactly as written so the resulting path still
/// shows what was asked for.
pub fn expand_env_vars(path: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(path, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();

            match std::env::var(name) {
                Ok(value) => value,
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Normalize path separators for the current OS
pub fn normalize_path_for_os(path: &str) -> String {
    if cfg!(windows) {
        path.replace('/', "\\")
    } else {
        path.replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_brace_and_dollar_styles() {
        env::set_var("IRIS_TEST_CASE_DIR", "/cases/42");

        assert_eq!(expand_env_vars("${IRIS_TEST_CASE_DIR}/reports"), "/cases/42/reports");
        assert_eq!(expand_env_vars("$IRIS_TEST_CASE_DIR/reports"), "/cases/42/reports");
        assert_eq!(expand_env_vars("$IRIS_TEST_CASE_DIR-old"), "/cases/42-old");

        env::remove_var("IRIS_TEST_CASE_DIR");
    }

    #[test]
    fn test_percent_style() {
        env::set_var("IRIS_TEST_PROFILE", "C:\\Users\\analyst");

        assert_eq!(
            expand_env_vars("%IRIS_TEST_PROFILE%\\Desktop\\reports"),
            "C:\\Users\\analyst\\Desktop\\reports"
        );

        env::remove_var("IRIS_TEST_PROFILE");
    }

    #[test]
    fn test_mixed_references() {
        env::set_var("IRIS_TEST_ROOT", "/srv");
        env::set_var("IRIS_TEST_HOST", "ws01");

        assert_eq!(
            expand_env_vars("$IRIS_TEST_ROOT/${IRIS_TEST_HOST}/%IRIS_TEST_HOST%"),
            "/srv/ws01/ws01"
        );

        env::remove_var("IRIS_TEST_ROOT");
        env::remove_var("IRIS_TEST_HOST");
    }

    #[test]
    fn test_unset_variables_are_kept() {
        assert_eq!(expand_env_vars("$IRIS_TEST_UNSET_VAR/x"), "$IRIS_TEST_UNSET_VAR/x");
        assert_eq!(expand_env_vars("${IRIS_TEST_UNSET_VAR}"), "${IRIS_TEST_UNSET_VAR}");
        assert_eq!(expand_env_vars("%IRIS_TEST_UNSET_VAR%"), "%IRIS_TEST_UNSET_VAR%");
    }

    #[test]
    fn test_plain_and_malformed_paths() {
        assert_eq!(expand_env_vars("reports"), "reports");
        assert_eq!(expand_env_vars("$"), "$");
        assert_eq!(expand_env_vars("${"), "${");
        assert_eq!(expand_env_vars("100%"), "100%");
        assert_eq!(expand_env_vars("%%"), "%%");
    }

    #[test]
    fn test_normalize_path_for_os() {
        if cfg!(windows) {
            assert_eq!(normalize_path_for_os("C:/cases/reports"), "C:\\cases\\reports");
        } else {
            assert_eq!(normalize_path_for_os("cases\\reports"), "cases/reports");
            assert_eq!(normalize_path_for_os("/already/fine"), "/already/fine");
        }
    }
}
