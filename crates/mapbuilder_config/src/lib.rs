pub mod errors;

pub use errors::*;

use serde::{Deserialize, Deserializer};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "MAPBUILDER_CONFIG";

/// Largest `[json] recursion_limit` honoured; higher values are lowered to it.
pub const MAX_RECURSION_LIMIT: usize = 1000;

/// Root of `config/default.toml`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub json: JsonConfig,
    #[serde(default)]
    pub xaml: XamlConfig,
}

impl BuilderConfig {
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Finds the configuration: `explicit` first, then `MAPBUILDER_CONFIG`,
    /// then `./config/default.toml`. Built-in defaults apply when none exists.
    pub fn discover(explicit: Option<&Path>) -> ConfigResult<Self> {
        let cwd = env::current_dir().map_err(|source| ConfigError::Context {
            message: "Failed to get current working directory".to_string(),
            source,
        })?;
        Self::discover_from(explicit, env::var_os(CONFIG_ENV), &cwd)
    }

    fn discover_from(explicit: Option<&Path>, env_path: Option<OsString>, cwd: &Path) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env_path {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = cwd.join("config").join("default.toml");
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Default level for the log filter; `RUST_LOG` directives override it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonConfig {
    /// Nesting depth accepted by the reader and serializer, at most
    /// [`MAX_RECURSION_LIMIT`].
    #[serde(
        default = "JsonConfig::default_recursion_limit",
        deserialize_with = "JsonConfig::capped_recursion_limit"
    )]
    pub recursion_limit: usize,
    #[serde(default)]
    pub pretty: bool,
    #[serde(default = "JsonConfig::default_indent")]
    pub indent: String,
}

impl JsonConfig {
    fn default_recursion_limit() -> usize {
        100
    }

    fn capped_recursion_limit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        Ok(usize::deserialize(deserializer)?.min(MAX_RECURSION_LIMIT))
    }

    fn default_indent() -> String {
        "  ".to_string()
    }
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            recursion_limit: Self::default_recursion_limit(),
            pretty: false,
            indent: Self::default_indent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct XamlConfig {
    /// Spaces per nesting level; 0 writes everything on one line.
    #[serde(default = "XamlConfig::default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub xml_declaration: bool,
}

impl XamlConfig {
    fn default_indent() -> usize {
        2
    }
}

impl Default for XamlConfig {
    fn default() -> Self {
        Self {
            indent: Self::default_indent(),
            xml_declaration: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_returned_when_file_missing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cfg = BuilderConfig::discover_from(None, None, dir.path()).expect("discover should succeed");
        assert_eq!(cfg, BuilderConfig::default());
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.json.recursion_limit, 100);
        assert_eq!(cfg.xaml.indent, 2);
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [logging]
            level = "debug"

            [json]
            recursion_limit = 12
            pretty = true

            [xaml]
            indent = 0
            xml_declaration = true
            "#
        )
        .unwrap();

        let cfg = BuilderConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.json.recursion_limit, 12);
        assert!(cfg.json.pretty);
        assert_eq!(cfg.json.indent, "  ");
        assert_eq!(cfg.xaml.indent, 0);
        assert!(cfg.xaml.xml_declaration);
    }

    #[test]
    fn discovery_order() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config").join("default.toml"), "[logging]\nlevel = \"warn\"\n").unwrap();
        let env_file = dir.path().join("env.toml");
        fs::write(&env_file, "[logging]\nlevel = \"trace\"\n").unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "[logging]\nlevel = \"error\"\n").unwrap();

        let level = |explicit: Option<&Path>, env_path: Option<OsString>| {
            BuilderConfig::discover_from(explicit, env_path, dir.path())
                .unwrap()
                .logging
                .level
        };
        assert_eq!(level(None, None), "warn");
        assert_eq!(level(None, Some(env_file.clone().into_os_string())), "trace");
        assert_eq!(level(Some(&explicit), Some(env_file.into_os_string())), "error");
    }

    #[test]
    fn recursion_limit_is_capped() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[json]\nrecursion_limit = 1000000").unwrap();
        let cfg = BuilderConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.json.recursion_limit, MAX_RECURSION_LIMIT);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[xaml]\nindent = \"wide\"").unwrap();
        let err = BuilderConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == file.path()));
    }
}
