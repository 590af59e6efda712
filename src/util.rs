use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SESSION_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:.\s]+$").unwrap());

/// Error type returned when a session name is invalid.
#[derive(Debug)]
pub struct SessionNameError(String);

impl std::error::Error for SessionNameError {}

impl fmt::Display for SessionNameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates a session name.
///
/// The name doubles as a tmux target and as a config file stem, so it must
/// be non-empty and free of `:`, `.` and whitespace.
///
/// # Examples
/// ```
/// # use tsm::validate_session_name;
/// assert!(validate_session_name("web-frontend_2").is_ok());
/// assert!(validate_session_name("web:1").is_err());
/// ```
pub fn validate_session_name(name: &str) -> Result<String, SessionNameError> {
    if !SESSION_NAME_RE.is_match(name) {
        Err(SessionNameError(
            "Session name must be non-empty and not contain ':', '.' or whitespace"
                .into(),
        ))
    } else {
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        for name in ["web", "api-2", "my_session", "Ünïcode"] {
            assert!(validate_session_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_target_separators() {
        for name in ["", "web:1", "web.0", "two words", "tab\tname"] {
            assert!(validate_session_name(name).is_err(), "{name:?}");
        }
    }
}
