//! Interpreter version check.
//!
//! Packaging only makes sense on a supported interpreter, so the version is
//! queried and checked before any packaging command runs.

use crate::config::InterpreterConfig;
use crate::error::{GateError, Result};
use crate::shell::execute_quiet;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("valid regex"));

/// An interpreter version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first `MAJOR.MINOR[.PATCH]` found in `text`.
    ///
    /// Works on raw version output such as `Python 3.8.10`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = VERSION_PATTERN.captures(text)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Supported versions, as the lowest acceptable version per major series.
///
/// The floor with the greatest major not above the candidate's major
/// applies. A candidate in that same series must reach the floor; a
/// candidate in a later series is accepted; a candidate older than every
/// floor is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportPolicy {
    floors: Vec<Version>,
}

impl SupportPolicy {
    pub fn new(mut floors: Vec<Version>) -> Self {
        floors.sort();
        Self { floors }
    }

    /// Build from config strings, skipping anything unparseable.
    ///
    /// The validator reports malformed entries before this is reached.
    pub fn from_config(minimums: &[String]) -> Self {
        Self::new(minimums.iter().filter_map(|m| Version::parse(m)).collect())
    }

    pub fn supports(&self, version: Version) -> bool {
        match self
            .floors
            .iter()
            .rev()
            .find(|floor| floor.major <= version.major)
        {
            Some(floor) if floor.major == version.major => version >= *floor,
            Some(_) => true,
            None => false,
        }
    }

    /// Human-readable requirement, e.g. `2.7 or 3.3 or above`.
    pub fn describe(&self) -> String {
        let floors: Vec<_> = self
            .floors
            .iter()
            .map(|v| format!("{}.{}", v.major, v.minor))
            .collect();
        format!("{} or above", floors.join(" or "))
    }
}

impl Default for SupportPolicy {
    fn default() -> Self {
        Self::new(vec![Version::new(2, 7, 0), Version::new(3, 3, 0)])
    }
}

/// Run the version command and read the version from its output.
///
/// Older interpreters print their version to stderr, so both streams are
/// searched.
pub fn detect_version(config: &InterpreterConfig, project_root: &Path) -> Result<Version> {
    let result = execute_quiet(&config.command, Some(project_root))?;

    if !result.success {
        return Err(GateError::InterpreterVersionUnknown {
            interpreter: config.program().to_string(),
            message: format!("'{}' exited with {:?}", config.command, result.exit_code),
        });
    }

    let combined = format!("{}\n{}", result.stdout, result.stderr);
    Version::parse(&combined).ok_or_else(|| GateError::InterpreterVersionUnknown {
        interpreter: config.program().to_string(),
        message: format!("no version in output: {}", combined.trim()),
    })
}

/// Query the interpreter and reject unsupported versions.
pub fn check_interpreter(
    config: &InterpreterConfig,
    package: &str,
    project_root: &Path,
) -> Result<Version> {
    let version = detect_version(config, project_root)?;
    let policy = SupportPolicy::from_config(&config.minimums);

    tracing::debug!("Interpreter {} reports {}", config.program(), version);

    if policy.supports(version) {
        Ok(version)
    } else {
        Err(GateError::UnsupportedInterpreter {
            package: package.to_string(),
            interpreter: config.program().to_string(),
            found: version.to_string(),
            required: policy.describe(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn v(major: u32, minor: u32) -> Version {
        Version::new(major, minor, 0)
    }

    #[test]
    fn parse_extracts_version_from_banner() {
        assert_eq!(Version::parse("Python 3.8.10"), Some(Version::new(3, 8, 10)));
        assert_eq!(Version::parse("Python 2.7"), Some(v(2, 7)));
        assert_eq!(Version::parse("3.3"), Some(v(3, 3)));
        assert_eq!(Version::parse("no digits here"), None);
    }

    #[test]
    fn default_policy_accepts_supported_versions() {
        let policy = SupportPolicy::default();
        assert!(policy.supports(v(2, 7)));
        assert!(policy.supports(Version::new(2, 7, 18)));
        assert!(policy.supports(v(3, 3)));
        assert!(policy.supports(v(3, 12)));
        assert!(policy.supports(v(4, 0)));
    }

    #[test]
    fn default_policy_rejects_unsupported_versions() {
        let policy = SupportPolicy::default();
        assert!(!policy.supports(v(2, 6)));
        assert!(!policy.supports(v(1, 5)));
        assert!(!policy.supports(v(3, 0)));
        assert!(!policy.supports(Version::new(3, 2, 5)));
    }

    #[test]
    fn policy_from_config_sorts_floors() {
        let policy = SupportPolicy::from_config(&["3.3".to_string(), "2.7".to_string()]);
        assert_eq!(policy, SupportPolicy::default());
        assert_eq!(policy.describe(), "2.7 or 3.3 or above");
    }

    #[test]
    fn single_floor_policy() {
        let policy = SupportPolicy::from_config(&["3.8".to_string()]);
        assert!(policy.supports(v(3, 8)));
        assert!(!policy.supports(v(3, 7)));
        assert!(!policy.supports(v(2, 7)));
    }

    fn interpreter(command: &str) -> InterpreterConfig {
        InterpreterConfig {
            command: command.to_string(),
            minimums: vec!["2.7".to_string(), "3.3".to_string()],
        }
    }

    #[test]
    fn check_accepts_supported_version_output() {
        let temp = TempDir::new().unwrap();
        let version =
            check_interpreter(&interpreter("echo Python 3.6.1"), "quantlab", temp.path()).unwrap();
        assert_eq!(version, Version::new(3, 6, 1));
    }

    #[test]
    fn check_reads_version_from_stderr() {
        let temp = TempDir::new().unwrap();
        let version =
            check_interpreter(&interpreter("echo Python 2.7.18 >&2"), "quantlab", temp.path())
                .unwrap();
        assert_eq!(version, Version::new(2, 7, 18));
    }

    #[test]
    fn check_rejects_unsupported_version() {
        let temp = TempDir::new().unwrap();
        let err = check_interpreter(&interpreter("echo Python 3.2.5"), "quantlab", temp.path())
            .unwrap_err();

        assert!(matches!(err, GateError::UnsupportedInterpreter { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("2.7 or 3.3 or above"));
    }

    #[test]
    fn check_fails_when_version_command_fails() {
        let temp = TempDir::new().unwrap();
        let err = check_interpreter(&interpreter("exit 3"), "quantlab", temp.path()).unwrap_err();
        assert!(matches!(err, GateError::InterpreterVersionUnknown { .. }));
    }

    #[test]
    fn check_fails_when_output_has_no_version() {
        let temp = TempDir::new().unwrap();
        let err =
            check_interpreter(&interpreter("echo hello"), "quantlab", temp.path()).unwrap_err();
        assert!(matches!(err, GateError::InterpreterVersionUnknown { .. }));
    }
}
