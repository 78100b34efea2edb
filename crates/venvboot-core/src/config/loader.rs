//! Environment variable loading
//!
//! Keeps the primary → alias → default fallback chain in one place so call sites
//! don't repeat `or_else` ladders.

use std::env;
use std::path::Path;

/// Parse `.env` content into key/value pairs, in file order.
///
/// Blank lines and `#` comments are skipped, matching quotes are stripped, and an
/// inline `# comment` is dropped when the value is unquoted.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}

/// Load `<dir>/.env` into the process environment without overriding variables that
/// are already set. Returns the number of variables applied.
///
/// Must run before any other thread is spawned.
pub fn load_dotenv_from_dir(dir: &Path) -> usize {
    let path = dir.join(".env");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return 0;
    };
    let mut applied = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(&key).is_none() {
            set_env_var(&key, &value);
            applied += 1;
        }
    }
    applied
}

/// Read the primary variable, then each alias, falling back to `default`.
/// Empty values count as unset.
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(primary, aliases).unwrap_or_else(default)
}

/// Read the primary variable or its aliases; empty values count as unset.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// Parse a boolean variable: 0/false/no/off are false, anything else set is true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

// All writes to the process environment go through here.
// SAFETY: callers run this before any thread is spawned.
#[allow(unsafe_code, unused_unsafe)]
pub fn set_env_var(key: &str, value: &str) {
    unsafe { env::set_var(key, value) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv_quotes_and_comments() {
        let content = "\
# leading comment
VENVBOOT_PYTHON=/usr/bin/python3.12
VENVBOOT_VENV_DIR=\".venv\"
export PIP_INDEX_URL='https://mirror.example/simple'
VENVBOOT_NO_PAUSE=1 # ci only
NOT_A_PAIR
";
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![
                ("VENVBOOT_PYTHON".to_string(), "/usr/bin/python3.12".to_string()),
                ("VENVBOOT_VENV_DIR".to_string(), ".venv".to_string()),
                (
                    "PIP_INDEX_URL".to_string(),
                    "https://mirror.example/simple".to_string()
                ),
                ("VENVBOOT_NO_PAUSE".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_dotenv_does_not_override() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(".env"),
            "VENVBOOT_TEST_DOTENV_EXISTING=from_file\nVENVBOOT_TEST_DOTENV_NEW=fresh\n",
        )
        .unwrap();
        set_env_var("VENVBOOT_TEST_DOTENV_EXISTING", "from_process");

        let applied = load_dotenv_from_dir(tmp.path());

        assert_eq!(applied, 1);
        assert_eq!(
            env::var("VENVBOOT_TEST_DOTENV_EXISTING").unwrap(),
            "from_process"
        );
        assert_eq!(env::var("VENVBOOT_TEST_DOTENV_NEW").unwrap(), "fresh");
    }

    #[test]
    fn test_load_dotenv_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_dotenv_from_dir(tmp.path()), 0);
    }

    #[test]
    fn test_env_bool_and_optional() {
        set_env_var("VENVBOOT_TEST_BOOL_OFF", "off");
        set_env_var("VENVBOOT_TEST_BOOL_ON", "yes");
        set_env_var("VENVBOOT_TEST_EMPTY", "   ");
        assert!(!env_bool("VENVBOOT_TEST_BOOL_OFF", &[], true));
        assert!(env_bool("VENVBOOT_TEST_BOOL_ON", &[], false));
        assert!(env_bool("VENVBOOT_TEST_BOOL_UNSET", &[], true));
        assert_eq!(env_optional("VENVBOOT_TEST_EMPTY", &[]), None);
        assert_eq!(
            env_or("VENVBOOT_TEST_UNSET_X", &["VENVBOOT_TEST_BOOL_ON"], || "d".into()),
            "yes"
        );
    }
}
