//! Locations of generated artifacts inside a Dart or Flutter project.

use super::constants::{
    C_BINDINGS_FILE, FFIGEN_BINDING_FILE, GENERATED_DIR, IOS_BINDINGS_FILE, RID_GENERATED_FILE,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlutterConfig {
    pub plugin_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Project {
    Dart,
    Flutter(FlutterConfig),
}

impl Project {
    pub fn path_to_generated_dir(&self, project_root: &Path) -> PathBuf {
        match self {
            Project::Dart => project_root.join("lib").join(GENERATED_DIR),
            Project::Flutter(FlutterConfig { plugin_name }) => project_root
                .join(plugin_name)
                .join("lib")
                .join(GENERATED_DIR),
        }
    }

    // TODO: read the ffigen output from pubspec.yaml once projects override it.
    pub fn path_to_generated_ffigen(&self, project_root: &Path) -> PathBuf {
        self.path_to_generated_dir(project_root)
            .join(FFIGEN_BINDING_FILE)
    }

    pub fn path_to_generated_rid(&self, project_root: &Path) -> PathBuf {
        self.path_to_generated_dir(project_root)
            .join(RID_GENERATED_FILE)
    }

    /// Headers to write, the first one is the ffigen entry point.
    pub fn paths_to_generated_c_bindings(&self, project_root: &Path) -> Vec<PathBuf> {
        match self {
            Project::Dart => vec![self.path_to_generated_dir(project_root).join(C_BINDINGS_FILE)],
            Project::Flutter(FlutterConfig { plugin_name }) => ["ios", "macos"]
                .iter()
                .map(|platform| {
                    project_root
                        .join(plugin_name)
                        .join(platform)
                        .join("Classes")
                        .join(IOS_BINDINGS_FILE)
                })
                .collect(),
        }
    }

    /// Existing Swift plugin sources, sorted. Dart projects have none.
    pub fn paths_to_swift_plugin_files(&self, project_root: &Path) -> Vec<PathBuf> {
        let plugin_name = match self {
            Project::Dart => return Vec::new(),
            Project::Flutter(FlutterConfig { plugin_name }) => plugin_name,
        };

        let mut files: Vec<PathBuf> = ["ios", "macos"]
            .iter()
            .map(|platform| project_root.join(plugin_name).join(platform).join("Classes"))
            .filter_map(|dir| std::fs::read_dir(dir).ok())
            .flat_map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()))
            .filter(|p| p.extension().map(|ext| ext == "swift").unwrap_or(false))
            .collect();
        files.sort();
        files
    }
}

/// Which build of the native library the generated module loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTarget {
    Release,
    Debug,
    DebugExample(String),
}

impl BuildTarget {
    /// Folder under `target/` holding the library.
    pub fn sub_folder(&self) -> &'static str {
        match self {
            BuildTarget::Release => "release",
            BuildTarget::Debug => "debug",
            BuildTarget::DebugExample(_) => "debug/examples",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dart_paths() {
        let root = Path::new("/app");
        let project = Project::Dart;

        assert_eq!(
            project.path_to_generated_rid(root),
            PathBuf::from("/app/lib/generated/rid_generated.dart")
        );
        assert_eq!(
            project.path_to_generated_ffigen(root),
            PathBuf::from("/app/lib/generated/ffigen_binding.dart")
        );
        assert_eq!(
            project.paths_to_generated_c_bindings(root),
            vec![PathBuf::from("/app/lib/generated/bindings.h")]
        );
        assert!(project.paths_to_swift_plugin_files(root).is_empty());
    }

    #[test]
    fn test_flutter_paths() {
        let root = Path::new("/app");
        let project = Project::Flutter(FlutterConfig {
            plugin_name: "plugin".to_string(),
        });

        assert_eq!(
            project.path_to_generated_rid(root),
            PathBuf::from("/app/plugin/lib/generated/rid_generated.dart")
        );
        assert_eq!(
            project.paths_to_generated_c_bindings(root),
            vec![
                PathBuf::from("/app/plugin/ios/Classes/binding.h"),
                PathBuf::from("/app/plugin/macos/Classes/binding.h"),
            ]
        );
    }

    #[test]
    fn test_swift_plugin_files() {
        let dir = tempfile::tempdir().unwrap();
        let classes = dir.path().join("plugin").join("ios").join("Classes");
        std::fs::create_dir_all(&classes).unwrap();
        std::fs::write(classes.join("SwiftPlugin.swift"), "").unwrap();
        std::fs::write(classes.join("binding.h"), "").unwrap();

        let project = Project::Flutter(FlutterConfig {
            plugin_name: "plugin".to_string(),
        });
        assert_eq!(
            project.paths_to_swift_plugin_files(dir.path()),
            vec![classes.join("SwiftPlugin.swift")]
        );
    }

    #[test]
    fn test_target_sub_folder() {
        assert_eq!(BuildTarget::Release.sub_folder(), "release");
        assert_eq!(
            BuildTarget::DebugExample("demo".to_string()).sub_folder(),
            "debug/examples"
        );
    }
}
