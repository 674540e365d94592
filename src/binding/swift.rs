//! Swift dummy calls that keep exported symbols alive in iOS/macOS builds.

use super::parsed::ParsedBindings;
use super::project::Project;
use crate::error::{BindingError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const PREVENT_TREESHAKE_START: &str = "// <rid:prevent_tree_shake Start>";
pub const PREVENT_TREESHAKE_END: &str = "// <rid:prevent_tree_shake End>";

/// Render a Swift function calling every exported function once.
pub fn render_swift_calls(bindings: &ParsedBindings) -> String {
    let calls: String = bindings
        .functions
        .iter()
        .map(|f| format!("    {}\n", f.render_swift_call()))
        .collect();
    format!("func dummyCallsToPreventTreeShaking() {{\n{}}}", calls)
}

/// Inject Swift code into plugin files so Swift does not purge the exported
/// symbols from the binary.
pub struct SwiftInjector<'a> {
    pub project: &'a Project,
}

impl<'a> SwiftInjector<'a> {
    /// Returns the files that were rewritten.
    pub fn inject(&self, project_root: &Path, inject_code: &str) -> Result<Vec<PathBuf>> {
        let swift_plugin_files = self.project.paths_to_swift_plugin_files(project_root);

        for file in &swift_plugin_files {
            let plugin_content =
                fs::read_to_string(file).map_err(|e| BindingError::io(file, e))?;
            let content_injected = inject_into(&plugin_content, inject_code);
            fs::write(file, content_injected).map_err(|e| BindingError::io(file, e))?;
            tracing::debug!(file = %file.display(), "injected swift dummy calls");
        }

        Ok(swift_plugin_files)
    }
}

/// Replace any earlier injected region and append a new one.
pub fn inject_into(plugin_content: &str, inject_code: &str) -> String {
    let mut lines: Vec<&str> = vec![];
    let mut inside_injection = false;
    for line in plugin_content.lines() {
        if line.trim() == PREVENT_TREESHAKE_START {
            inside_injection = true;
            continue;
        }
        if line.trim() == PREVENT_TREESHAKE_END {
            inside_injection = false;
            continue;
        }
        if !inside_injection {
            lines.push(line);
        }
    }
    let plugin_code = lines.join("\n");

    format!(
        "{}\n{}\n{}\n{}",
        plugin_code, PREVENT_TREESHAKE_START, inject_code, PREVENT_TREESHAKE_END
    )
}
