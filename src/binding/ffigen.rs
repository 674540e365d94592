//! ffigen configuration and invocation.
//!
//! See https://github.com/dart-lang/ffigen#configurations

use super::constants::{FFI_NATIVE_LIBRARY_NAME, RAW_STRUCT_PREFIX};
use super::project::Project;
use crate::error::{BindingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

const FFIGEN_RUNNER: &str = "dart";

const IGNORE_FOR_FILE: [&str; 5] = [
    "non_constant_identifier_names",
    "unused_import",
    "unused_field",
    "unused_element",
    "camel_case_types",
];

const LINUX_LLVM_PATHS: [&str; 6] = [
    "/usr/lib/llvm-6.0/lib/libclang.so",
    "/usr/lib/llvm-9/lib/libclang.so",
    "/usr/lib/llvm-10/lib/libclang.so",
    "/usr/lib/llvm-11/lib/libclang.so",
    "/usr/lib/libclang.so",
    "/usr/lib64/libclang.so",
];
const MACOS_LLVM_PATHS: [&str; 1] = ["/usr/local/opt/llvm/lib/"];
const WINDOWS_LLVM_PATHS: [&str; 1] = [r#"C:\Program Files\LLVM\bin\"#];

/// Properties of the machine running ffigen.
#[derive(Debug, Clone)]
pub struct HostProps {
    pub llvm_paths: Vec<&'static str>,
}

impl HostProps {
    pub fn for_os(os: &str) -> Result<Self> {
        let llvm_paths = match os {
            "linux" => LINUX_LLVM_PATHS.to_vec(),
            "macos" => MACOS_LLVM_PATHS.to_vec(),
            "windows" => WINDOWS_LLVM_PATHS.to_vec(),
            other => return Err(BindingError::UnsupportedHost(other.to_string())),
        };
        Ok(Self { llvm_paths })
    }

    pub fn current() -> Result<Self> {
        Self::for_os(std::env::consts::OS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    #[serde(rename = "entry-points")]
    pub entry_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructRename {
    pub rename: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YamlConfig {
    pub name: String,
    pub description: String,
    pub comments: bool,
    pub preamble: String,
    #[serde(rename = "llvm-path")]
    pub llvm_paths: Vec<String>,
    pub output: String,
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structs: Option<StructRename>,
}

impl YamlConfig {
    pub fn new(
        project: &Project,
        host_props: &HostProps,
        project_root: &Path,
        structs_to_prefix_raw: &[String],
    ) -> Self {
        let c_bindings = project.paths_to_generated_c_bindings(project_root);
        debug_assert!(
            !c_bindings.is_empty(),
            "Need at least one generated c-binding header file"
        );

        let structs = (!structs_to_prefix_raw.is_empty()).then(|| {
            let mut rename = BTreeMap::new();
            rename.insert(
                format!("({})", structs_to_prefix_raw.join("|")),
                format!("{}$1", RAW_STRUCT_PREFIX),
            );
            StructRename { rename }
        });

        Self {
            name: FFI_NATIVE_LIBRARY_NAME.to_string(),
            description: "Generated ffigen config by dartbind".to_string(),
            comments: false,
            preamble: format!("// ignore_for_file: {}\n", IGNORE_FOR_FILE.join(", ")),
            llvm_paths: host_props.llvm_paths.iter().map(|p| p.to_string()).collect(),
            output: project
                .path_to_generated_ffigen(project_root)
                .to_string_lossy()
                .to_string(),
            headers: Headers {
                entry_points: c_bindings
                    .first()
                    .map(|p| vec![p.to_string_lossy().to_string()])
                    .unwrap_or_default(),
            },
            structs,
        }
    }

    pub fn render(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("# Generated ffigen config by dartbind\n{}", yaml))
    }
}

/// Run `dart run ffigen` with the rendered config from the project root.
pub async fn run_ffigen(config: &YamlConfig, project_root: &Path, timeout: Duration) -> Result<()> {
    let yaml_string = config.render()?;
    trace!("ffigen config:\n{}", yaml_string);

    let tmp_dir = tempfile::tempdir().map_err(|e| BindingError::io(std::env::temp_dir(), e))?;
    let config_path = tmp_dir.path().join("ffigen_config.yaml");
    tokio::fs::write(&config_path, yaml_string.as_bytes())
        .await
        .map_err(|e| BindingError::io(&config_path, e))?;

    let command_line = format!("{} run ffigen", FFIGEN_RUNNER);
    let mut cmd = if cfg!(target_os = "windows") {
        // dart is a batch script on windows and only resolves through a shell
        let mut cmd = tokio::process::Command::new("powershell");
        cmd.args(["-c", FFIGEN_RUNNER]);
        cmd
    } else {
        tokio::process::Command::new(FFIGEN_RUNNER)
    };
    cmd.args(["run", "ffigen", "--config"])
        .arg(&config_path)
        .current_dir(project_root)
        .kill_on_drop(true);

    debug!("Running '{:?}' from: '{}'", cmd, project_root.display());
    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(output) => output.map_err(|e| BindingError::Command {
            command: command_line.clone(),
            detail: e.to_string(),
        })?,
        Err(_) => {
            return Err(BindingError::Timeout {
                command: command_line,
                seconds: timeout.as_secs(),
            })
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    check_ffigen_output(&command_line, output.status.success(), &stdout, &stderr)?;

    tmp_dir
        .close()
        .map_err(|e| BindingError::io(std::env::temp_dir(), e))
}

fn check_ffigen_output(command: &str, success: bool, stdout: &str, stderr: &str) -> Result<()> {
    if !success {
        return Err(BindingError::Command {
            command: command.to_string(),
            detail: format!("stderr: \"{}\"\nstdout: \"{}\"", stderr, stdout),
        });
    }

    // ffigen logs to stdout
    trace!("{}", stdout);
    if stdout.contains("[SEVERE]") {
        return Err(BindingError::Command {
            command: command.to_string(),
            detail: format!("severe error(s):\n\n{}", stdout),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::project::FlutterConfig;

    fn linux_config(structs: &[String]) -> YamlConfig {
        let host = HostProps::for_os("linux").unwrap();
        YamlConfig::new(&Project::Dart, &host, Path::new("/app"), structs)
    }

    #[test]
    fn test_host_props() {
        assert_eq!(HostProps::for_os("macos").unwrap().llvm_paths.len(), 1);
        assert!(matches!(
            HostProps::for_os("solaris"),
            Err(BindingError::UnsupportedHost(_))
        ));
    }

    #[test]
    fn test_yaml_config_fields() {
        let config = linux_config(&["Foo".to_string(), "Bar".to_string()]);

        assert_eq!(config.name, "NativeLibrary");
        assert_eq!(config.output, "/app/lib/generated/ffigen_binding.dart");
        assert_eq!(
            config.headers.entry_points,
            vec!["/app/lib/generated/bindings.h".to_string()]
        );
        let rename = &config.structs.as_ref().unwrap().rename;
        assert_eq!(rename.get("(Foo|Bar)").map(String::as_str), Some("Raw$1"));
    }

    #[test]
    fn test_yaml_render_uses_ffigen_keys() {
        let config = linux_config(&["Foo".to_string()]);
        let rendered = config.render().unwrap();

        assert!(rendered.starts_with("# Generated ffigen config by dartbind\n"));
        let value: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        assert!(value.get("llvm-path").is_some());
        assert!(value["headers"].get("entry-points").is_some());
        assert_eq!(value["comments"], serde_yaml::Value::Bool(false));

        let back: YamlConfig = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_no_structs_no_rename() {
        let config = linux_config(&[]);
        assert!(config.structs.is_none());
        assert!(!config.render().unwrap().contains("rename"));
    }

    #[test]
    fn test_flutter_entry_point() {
        let host = HostProps::for_os("linux").unwrap();
        let project = Project::Flutter(FlutterConfig {
            plugin_name: "plugin".to_string(),
        });
        let config = YamlConfig::new(&project, &host, Path::new("/app"), &[]);
        assert_eq!(
            config.headers.entry_points,
            vec!["/app/plugin/ios/Classes/binding.h".to_string()]
        );
    }

    #[test]
    fn test_check_ffigen_output() {
        assert!(check_ffigen_output("dart run ffigen", true, "[INFO] done", "").is_ok());
        assert!(matches!(
            check_ffigen_output("dart run ffigen", true, "[SEVERE] bad header", ""),
            Err(BindingError::Command { .. })
        ));
        assert!(check_ffigen_output("dart run ffigen", false, "", "boom").is_err());
    }
}
