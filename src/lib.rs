//! GDM Screen core library
//!
//! Client side of the gestational diabetes screening tool: typed clients for
//! the clinical, ECG and chat prediction services, the workflows that collect
//! input and track request state, and the text presentation of results.

pub mod app;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;
pub mod workflow;

pub use app::App;
pub use error::{ReportError, ServiceError, ServiceKind, SetupError, UploadError};

/// Application configuration
pub mod config {
    use serde::Deserialize;

    pub const ENV_PREFIX: &str = "GDM";

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct AppConfig {
        #[serde(default)]
        pub services: ServicesConfig,
        #[serde(default)]
        pub report: ReportConfig,
        #[serde(default)]
        pub log: LogConfig,
    }

    /// Base URLs of the remote services. Host and port are the only things
    /// that vary between deployments; paths are fixed by the clients.
    #[derive(Debug, Clone, Deserialize)]
    pub struct ServicesConfig {
        #[serde(default = "ServicesConfig::default_clinical_url")]
        pub clinical_url: String,
        #[serde(default = "ServicesConfig::default_ecg_url")]
        pub ecg_url: String,
        #[serde(default = "ServicesConfig::default_chat_url")]
        pub chat_url: String,
    }

    impl ServicesConfig {
        fn default_clinical_url() -> String {
            "http://localhost:5000".into()
        }

        fn default_ecg_url() -> String {
            "http://localhost:5001".into()
        }

        fn default_chat_url() -> String {
            "http://localhost:5002".into()
        }
    }

    impl Default for ServicesConfig {
        fn default() -> Self {
            Self {
                clinical_url: Self::default_clinical_url(),
                ecg_url: Self::default_ecg_url(),
                chat_url: Self::default_chat_url(),
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ReportConfig {
        #[serde(default = "ReportConfig::default_output_dir")]
        pub output_dir: String,
        /// Cosmetic pause before the report is written.
        #[serde(default = "ReportConfig::default_generation_delay_ms")]
        pub generation_delay_ms: u64,
    }

    impl ReportConfig {
        fn default_output_dir() -> String {
            ".".into()
        }

        fn default_generation_delay_ms() -> u64 {
            1500
        }
    }

    impl Default for ReportConfig {
        fn default() -> Self {
            Self {
                output_dir: Self::default_output_dir(),
                generation_delay_ms: Self::default_generation_delay_ms(),
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogFormat {
        #[default]
        Pretty,
        Json,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct LogConfig {
        #[serde(default = "LogConfig::default_level")]
        pub level: String,
        #[serde(default)]
        pub format: LogFormat,
    }

    impl LogConfig {
        fn default_level() -> String {
            "info".into()
        }
    }

    impl Default for LogConfig {
        fn default() -> Self {
            Self {
                level: Self::default_level(),
                format: LogFormat::default(),
            }
        }
    }

    /// Load configuration from file
    ///
    /// `config/default` and `config/{GDM_ENV}` are both optional. Environment
    /// variables override files, e.g. `GDM_SERVICES__CHAT_URL`.
    pub fn load_config() -> Result<AppConfig, config::ConfigError> {
        let env = std::env::var("GDM_ENV").unwrap_or_else(|_| "development".into());
        load_from(&["config/default".to_string(), format!("config/{}", env)])
    }

    /// Load configuration from the given file stems, later files winning.
    pub fn load_from(paths: &[String]) -> Result<AppConfig, config::ConfigError> {
        let mut builder = config::Config::builder();

        for path in paths {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn defaults_point_at_local_services() {
            let config = AppConfig::default();

            assert_eq!(config.services.clinical_url, "http://localhost:5000");
            assert_eq!(config.services.ecg_url, "http://localhost:5001");
            assert_eq!(config.services.chat_url, "http://localhost:5002");
            assert_eq!(config.report.generation_delay_ms, 1500);
            assert_eq!(config.log.format, LogFormat::Pretty);
        }

        #[test]
        fn file_values_override_defaults() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("gdm.toml");
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(
                file,
                "[services]\nchat_url = \"http://chat.internal:9000\"\n\n[report]\ngeneration_delay_ms = 0\n\n[log]\nformat = \"json\""
            )
            .unwrap();

            let stem = dir.path().join("gdm").to_string_lossy().into_owned();
            let config = load_from(&[stem]).unwrap();

            assert_eq!(config.services.chat_url, "http://chat.internal:9000");
            assert_eq!(config.services.clinical_url, "http://localhost:5000");
            assert_eq!(config.report.generation_delay_ms, 0);
            assert_eq!(config.log.format, LogFormat::Json);
        }

        #[test]
        fn missing_files_fall_back_to_defaults() {
            let config = load_from(&["does/not/exist".to_string()]).unwrap();
            assert_eq!(config.report.output_dir, ".");
        }
    }
}
