//! Deprecated-setting precedence rules and the warning sink they report to.
//!
//! Each rule is written out on its own. They do not share a direction: the
//! legacy google group list overrides its replacement, while the forced
//! code challenge method only fills a gap left by the modern setting.

use std::fmt;
use tracing::warn;

/// A non-fatal finding produced while migrating a legacy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationWarning {
    /// A deprecated setting was used in place of its replacement.
    Deprecated {
        deprecated: &'static str,
        replacement: &'static str,
    },
    /// A `static://` upstream did not name a valid status code.
    InvalidStaticCode { upstream: String, host: String },
}

impl fmt::Display for MigrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationWarning::Deprecated {
                deprecated,
                replacement,
            } => write!(
                f,
                "the '{deprecated}' option is deprecated and will likely be removed \
                 in the next major release, use '{replacement}' instead"
            ),
            MigrationWarning::InvalidStaticCode { upstream, host } => write!(
                f,
                "unable to convert {host:?} from upstream {upstream:?} to a status code, \
                 using default 200"
            ),
        }
    }
}

/// Collects warnings for the caller and mirrors each one to the log.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<MigrationWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: MigrationWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[MigrationWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<MigrationWarning> {
        self.warnings
    }
}

/// `google_group` beats `google_groups` whenever it is set and differs.
pub fn legacy_google_groups_win(
    google_group: &[String],
    google_groups: &[String],
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    if !google_group.is_empty() && google_group != google_groups {
        diagnostics.warn(MigrationWarning::Deprecated {
            deprecated: "google_group",
            replacement: "google_groups",
        });
        return google_group.to_vec();
    }
    google_groups.to_vec()
}

/// `force_code_challenge_method` is only adopted when `code_challenge_method`
/// is empty.
pub fn forced_code_challenge_fills_gap(
    code_challenge_method: &str,
    force_code_challenge_method: &str,
    diagnostics: &mut Diagnostics,
) -> String {
    if code_challenge_method.is_empty() && !force_code_challenge_method.is_empty() {
        diagnostics.warn(MigrationWarning::Deprecated {
            deprecated: "force_code_challenge_method",
            replacement: "code_challenge_method",
        });
        return force_code_challenge_method.to_string();
    }
    code_challenge_method.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_google_group_overrides_differing_replacement() {
        let mut diagnostics = Diagnostics::new();
        let resolved =
            legacy_google_groups_win(&groups(&["g1"]), &groups(&["g2"]), &mut diagnostics);

        assert_eq!(resolved, groups(&["g1"]));
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_google_group_equal_lists_do_not_warn() {
        let mut diagnostics = Diagnostics::new();
        let resolved = legacy_google_groups_win(
            &groups(&["g1", "g2"]),
            &groups(&["g1", "g2"]),
            &mut diagnostics,
        );

        assert_eq!(resolved, groups(&["g1", "g2"]));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_google_group_unset_keeps_replacement() {
        let mut diagnostics = Diagnostics::new();
        let resolved = legacy_google_groups_win(&[], &groups(&["g2"]), &mut diagnostics);

        assert_eq!(resolved, groups(&["g2"]));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_forced_code_challenge_only_fills_empty_method() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(forced_code_challenge_fills_gap("", "S256", &mut diagnostics), "S256");
        assert_eq!(diagnostics.warnings().len(), 1);

        let mut diagnostics = Diagnostics::new();
        assert_eq!(
            forced_code_challenge_fills_gap("plain", "S256", &mut diagnostics),
            "plain"
        );
        assert!(diagnostics.warnings().is_empty());

        let mut diagnostics = Diagnostics::new();
        assert_eq!(forced_code_challenge_fills_gap("", "", &mut diagnostics), "");
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_each_warning_is_logged_at_warn_level() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let warnings = tracing::subscriber::with_default(subscriber, || {
            let mut diagnostics = Diagnostics::new();
            legacy_google_groups_win(&groups(&["g1"]), &groups(&["g2"]), &mut diagnostics);
            diagnostics.warn(MigrationWarning::InvalidStaticCode {
                upstream: "static://abc".to_string(),
                host: "abc".to_string(),
            });
            diagnostics.into_warnings()
        });

        let output = logs.contents();
        assert_eq!(output.lines().filter(|line| line.contains("WARN")).count(), 2);
        for warning in &warnings {
            assert!(output.contains(&warning.to_string()), "missing {warning} in {output}");
        }
    }

    #[test]
    fn test_warning_names_both_settings() {
        let warning = MigrationWarning::Deprecated {
            deprecated: "google_group",
            replacement: "google_groups",
        };
        let message = warning.to_string();
        assert!(message.contains("'google_group'"));
        assert!(message.contains("'google_groups'"));
    }
}
