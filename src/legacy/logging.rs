use crate::config::{
    DEFAULT_AUTH_LOGGING_FORMAT, DEFAULT_REQUEST_LOGGING_FORMAT, DEFAULT_STANDARD_LOGGING_FORMAT,
    LogFileOptions, Logging,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyLogging {
    #[serde(rename = "exclude_logging_paths")]
    pub exclude_paths: Vec<String>,
    #[serde(rename = "logging_local_time")]
    pub local_time: bool,
    #[serde(rename = "silence_ping_logging")]
    pub silence_ping: bool,
    pub request_id_header: String,
    #[serde(rename = "auth_logging")]
    pub auth_enabled: bool,
    #[serde(rename = "auth_logging_format")]
    pub auth_format: String,
    #[serde(rename = "request_logging")]
    pub request_enabled: bool,
    #[serde(rename = "request_logging_format")]
    pub request_format: String,
    #[serde(rename = "standard_logging")]
    pub standard_enabled: bool,
    #[serde(rename = "standard_logging_format")]
    pub standard_format: String,
    #[serde(rename = "errors_to_info_log")]
    pub err_to_info: bool,

    #[serde(rename = "logging_filename")]
    pub filename: String,
    #[serde(rename = "logging_max_size")]
    pub max_size: u32,
    #[serde(rename = "logging_max_age")]
    pub max_age: u32,
    #[serde(rename = "logging_max_backups")]
    pub max_backups: u32,
    #[serde(rename = "logging_compress")]
    pub compress: bool,
}

impl Default for LegacyLogging {
    fn default() -> Self {
        Self {
            exclude_paths: Vec::new(),
            local_time: true,
            silence_ping: false,
            request_id_header: "X-Request-Id".to_string(),
            auth_enabled: true,
            auth_format: DEFAULT_AUTH_LOGGING_FORMAT.to_string(),
            request_enabled: true,
            request_format: DEFAULT_REQUEST_LOGGING_FORMAT.to_string(),
            standard_enabled: true,
            standard_format: DEFAULT_STANDARD_LOGGING_FORMAT.to_string(),
            err_to_info: false,
            filename: String::new(),
            max_size: 100,
            max_age: 7,
            max_backups: 0,
            compress: false,
        }
    }
}

impl LegacyLogging {
    pub fn convert(&self) -> Logging {
        Logging {
            auth_enabled: self.auth_enabled,
            auth_format: self.auth_format.clone(),
            request_enabled: self.request_enabled,
            request_format: self.request_format.clone(),
            standard_enabled: self.standard_enabled,
            standard_format: self.standard_format.clone(),
            err_to_info: self.err_to_info,
            exclude_paths: self.exclude_paths.clone(),
            local_time: self.local_time,
            silence_ping: self.silence_ping,
            request_id_header: self.request_id_header.clone(),
            file: LogFileOptions {
                filename: self.filename.clone(),
                max_size: self.max_size,
                max_age: self.max_age,
                max_backups: self.max_backups,
                compress: self.compress,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_structured_defaults() {
        assert_eq!(LegacyLogging::default().convert(), Logging::default());
    }

    #[test]
    fn test_file_rotation_group() {
        let legacy = LegacyLogging {
            filename: "/var/log/proxy.log".to_string(),
            max_backups: 3,
            compress: true,
            ..LegacyLogging::default()
        };

        let logging = legacy.convert();

        assert_eq!(logging.file.filename, "/var/log/proxy.log");
        assert_eq!(logging.file.max_size, 100);
        assert_eq!(logging.file.max_backups, 3);
        assert!(logging.file.compress);
    }
}
