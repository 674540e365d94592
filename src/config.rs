//! Build configuration read from `dartbind.yaml`.

use crate::binding::{BuildTarget, FlutterConfig, Project};
use crate::error::{BindingError, Result};
use crate::logging::{LogFormat, LogLevel};
use crate::runtime::RuntimeConfig;
use crate::stage::DartModuleSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "dartbind.yaml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Dart,
    Flutter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    Debug,
    Release,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Root of the Dart or Flutter project receiving the generated files.
    pub project_root: PathBuf,
    pub project: ProjectKind,
    /// Required for Flutter projects.
    pub plugin_name: Option<String>,
    pub lib_name: String,
    pub target: TargetKind,
    /// Build the library of this cargo example instead of the crate itself.
    pub example: Option<String>,
    /// Import of the ffigen output, as written in the generated module.
    pub ffigen_binding: String,
    /// Cargo target directory, relative to the generated module.
    pub path_to_target: String,
    pub headers: Vec<PathBuf>,
    pub worker_count: Option<usize>,
    pub stop_on_error: bool,
    /// Seconds to wait for `dart run ffigen`.
    pub ffigen_timeout: u64,
    pub log: LogConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let dart = DartModuleSettings::default();
        Self {
            project_root: PathBuf::from("."),
            project: ProjectKind::Dart,
            plugin_name: None,
            lib_name: dart.lib_name,
            target: TargetKind::Debug,
            example: None,
            ffigen_binding: dart.ffigen_binding,
            path_to_target: dart.path_to_target,
            headers: Vec::new(),
            worker_count: None,
            stop_on_error: false,
            ffigen_timeout: 120,
            log: LogConfig::default(),
        }
    }
}

impl BuildConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: BuildConfig = serde_yaml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BindingError::io(path, e))?;
        let mut config = Self::from_yaml(&text)?;
        // Relative project roots are taken from the config file's directory.
        if config.project_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.project_root = dir.join(&config.project_root);
            }
        }
        tracing::debug!(path = %path.display(), "loaded build config");
        Ok(config)
    }

    /// Load `dartbind.yaml` from `dir` if present, otherwise use defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self {
                project_root: dir.to_path_buf(),
                ..Self::default()
            })
        }
    }

    fn check(&self) -> Result<()> {
        if self.project == ProjectKind::Flutter && self.plugin_name.is_none() {
            return Err(BindingError::Config(
                "flutter projects need a 'plugin_name'".to_string(),
            ));
        }
        if self.worker_count == Some(0) {
            return Err(BindingError::Config(
                "'worker_count' must be at least 1".to_string(),
            ));
        }
        if self.lib_name.is_empty() {
            return Err(BindingError::Config("'lib_name' is empty".to_string()));
        }
        Ok(())
    }

    pub fn project(&self) -> Project {
        match (self.project, &self.plugin_name) {
            (ProjectKind::Flutter, Some(plugin_name)) => Project::Flutter(FlutterConfig {
                plugin_name: plugin_name.clone(),
            }),
            _ => Project::Dart,
        }
    }

    pub fn build_target(&self) -> BuildTarget {
        match (self.target, &self.example) {
            (TargetKind::Release, _) => BuildTarget::Release,
            (TargetKind::Debug, Some(example)) => BuildTarget::DebugExample(example.clone()),
            (TargetKind::Debug, None) => BuildTarget::Debug,
        }
    }

    pub fn dart_settings(&self) -> DartModuleSettings {
        DartModuleSettings {
            ffigen_binding: self.ffigen_binding.clone(),
            path_to_target: self.path_to_target.clone(),
            lib_name: self.lib_name.clone(),
            target: self.build_target(),
            project: self.project(),
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            worker_count: self.worker_count.unwrap_or(defaults.worker_count),
            stop_on_error: self.stop_on_error,
        }
    }

    /// Header paths resolved against the project root.
    pub fn header_paths(&self) -> Vec<PathBuf> {
        self.headers
            .iter()
            .map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    self.project_root.join(p)
                }
            })
            .collect()
    }
}
