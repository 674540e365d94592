//! Structured view of a cbindgen header: opaque structs, declarations and
//! the Dart extensions embedded in doc comments.

use super::constants::RAW_STRUCT_PREFIX;
use super::function_header::{parse_function_header, FunctionHeader};
use crate::error::{BindingError, Result};

const CBINDGEN_BANNER: &str = "Generated with cbindgen:";
const DART_FENCE_OPEN: &str = "* ```dart";
const FENCE_CLOSE: &str = "* ```";

/// A Dart code block found inside a header doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DartSection {
    /// 1-based line of the opening fence.
    pub line: usize,
    /// Lines with the comment marker removed.
    pub lines: Vec<String>,
}

impl DartSection {
    /// Name of the extension, i.e. `Rid_ExtOnPointerFoo`.
    pub fn extension_name(&self) -> Option<&str> {
        let first = self.lines.first()?;
        first
            .trim()
            .strip_prefix("extension ")?
            .split_whitespace()
            .next()
    }

    /// Struct the extension is declared on, i.e. `Foo` for
    /// `dart_ffi.Pointer<ffigen_bind.Foo>`.
    pub fn extended_struct(&self) -> Option<&str> {
        let first = self.lines.first()?;
        let (_, on) = first.split_once(" on ")?;
        let open = on.find('<')?;
        let close = on[open..].find('>')? + open;
        on[open + 1..close].rsplit('.').next().map(str::trim)
    }

    /// Render the section with its body indented by two spaces.
    pub fn render(&self) -> String {
        let last_line = self.lines.len().saturating_sub(1);
        self.lines
            .iter()
            .enumerate()
            .fold(String::new(), |mut acc, (idx, line)| {
                if idx == 0 {
                    acc.push_str(line);
                } else if idx == last_line {
                    acc.push('\n');
                    acc.push_str(line);
                } else {
                    acc.push_str("\n  ");
                    acc.push_str(line);
                }
                acc
            })
    }
}

/// Everything extracted from one header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBindings {
    /// Version from the `Generated with cbindgen:<version>` banner.
    pub cbindgen_version: Option<String>,
    /// Opaque structs in declaration order.
    pub structs: Vec<String>,
    pub functions: Vec<FunctionHeader>,
    pub dart_sections: Vec<DartSection>,
}

impl ParsedBindings {
    /// Parse a header produced by cbindgen.
    pub fn parse(header: &str) -> Result<Self> {
        let mut parsed = ParsedBindings::default();
        let mut dart_section: Option<DartSection> = None;
        let mut pending_decl: Option<String> = None;

        for (idx, line) in header.lines().enumerate() {
            let trimmed = line.trim();

            if let Some(section) = dart_section.as_mut() {
                if trimmed.starts_with(FENCE_CLOSE) {
                    if let Some(done) = dart_section.take() {
                        if !done.lines.is_empty() {
                            parsed.dart_sections.push(done);
                        }
                    }
                } else {
                    section.lines.push(strip_comment_marker(trimmed).to_string());
                }
                continue;
            }

            if trimmed.starts_with(DART_FENCE_OPEN) {
                dart_section = Some(DartSection {
                    line: idx + 1,
                    lines: Vec::new(),
                });
                continue;
            }

            if parsed.cbindgen_version.is_none() {
                if let Some(version) = banner_version(trimmed) {
                    parsed.cbindgen_version = Some(version);
                    continue;
                }
            }

            if let Some(name) = opaque_typedef(trimmed) {
                parsed.structs.push(name.to_string());
                continue;
            }

            // cbindgen wraps long parameter lists over several lines.
            let decl = match pending_decl.take() {
                Some(mut pending) => {
                    pending.push(' ');
                    pending.push_str(trimmed);
                    pending
                }
                None if is_declaration_start(trimmed) => trimmed.to_string(),
                None => continue,
            };
            if !decl.contains(')') {
                pending_decl = Some(decl);
                continue;
            }
            if let Some(function) = parse_function_header(&decl) {
                parsed.functions.push(function);
            }
        }

        if let Some(section) = dart_section {
            return Err(BindingError::UnterminatedDartSection { line: section.line });
        }

        tracing::debug!(
            structs = parsed.structs.len(),
            functions = parsed.functions.len(),
            dart_sections = parsed.dart_sections.len(),
            "parsed binding header"
        );
        Ok(parsed)
    }

    /// All Dart extensions, in header order, one after the other.
    pub fn dart_code(&self) -> String {
        self.dart_sections
            .iter()
            .map(DartSection::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Struct names as ffigen exposes them after renaming.
    pub fn renamed_structs(&self) -> Vec<String> {
        self.structs
            .iter()
            .map(|s| format!("{}{}", RAW_STRUCT_PREFIX, s))
            .collect()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionHeader> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn has_struct(&self, name: &str) -> bool {
        self.structs.iter().any(|s| s == name)
    }

    /// Dart section extending the given struct, under its own or its `Raw` name.
    pub fn dart_section_for(&self, struct_name: &str) -> Option<&DartSection> {
        let renamed = format!("{}{}", RAW_STRUCT_PREFIX, struct_name);
        self.dart_sections.iter().find(|s| {
            s.extended_struct()
                .map(|ext| ext == struct_name || ext == renamed)
                .unwrap_or(false)
        })
    }
}

fn strip_comment_marker(trimmed: &str) -> &str {
    trimmed
        .strip_prefix("* ")
        .or_else(|| trimmed.strip_prefix('*'))
        .unwrap_or(trimmed)
}

fn banner_version(trimmed: &str) -> Option<String> {
    let (_, rest) = trimmed.split_once(CBINDGEN_BANNER)?;
    let version = rest.trim_end_matches("*/").trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// `typedef struct Foo Foo;` yields `Foo`.
fn opaque_typedef(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix("typedef struct ")?.strip_suffix(';')?;
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(tag), Some(alias), None) if tag == alias => Some(alias),
        _ => None,
    }
}

fn is_declaration_start(trimmed: &str) -> bool {
    !(trimmed.is_empty()
        || trimmed.starts_with('*')
        || trimmed.starts_with('/')
        || trimmed.starts_with('#')
        || trimmed.starts_with("typedef"))
        && trimmed.contains('(')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::function_header::CType;

    const PRIMS_STRINGS: &str = include_str!("../../fixtures/prims_strings_binding.h");
    const THREE_STRUCTS: &str = include_str!("../../fixtures/three_structs_binding.h");
    const TWO_STRUCTS: &str = include_str!("../../fixtures/two_structs_binding.h");

    #[test]
    fn test_dart_extensions_single_struct_prims_and_strings() {
        let parsed = ParsedBindings::parse(PRIMS_STRINGS).unwrap();
        let expected = "extension Rid_ExtOnPointerSimple on Pointer<ffigen_bind.Simple> {
  @ffi.Int32() int get prim_u8 => rid_ffi.rid_simple_prim_u8(this);
  @ffi.Int32() int get prim_u16 => rid_ffi.rid_simple_prim_u16(this);
  @ffi.Int64() int get prim_u64 => rid_ffi.rid_simple_prim_u64(this);
  String get cstring => {
    int len = rid_ffi.rid_simple_cstring_len(this);
    return rid_ffi.rid_simple_cstring(this).toDartString(len);
  }
  String get string => {
    int len = rid_ffi.rid_simple_string_len(this);
    return rid_ffi.rid_simple_string(this).toDartString(len);
  }
  int get f => rid_ffi.rid_simple_f(this) != 0;
}";
        assert_eq!(parsed.dart_code(), expected);
    }

    #[test]
    fn test_dart_extensions_three_structs() {
        let parsed = ParsedBindings::parse(THREE_STRUCTS).unwrap();
        let expected = "extension PointerRidBindFoo on Pointer<ridBind.Foo> {
  @ffi.Int32() int get prim_u8 => rid_ffi.rid_foo_prim_u8(this);
  @ffi.Int32() int get prim_u16 => rid_ffi.rid_foo_prim_u16(this);
}
extension PointerRidBindBar on Pointer<ridBind.Bar> {
  int get f => rid_ffi.rid_bar_f(this) != 0;
}
extension PointerRidBindBaz on Pointer<ridBind.Baz> {
  String get name => {
    int len = rid_ffi.rid_baz_name_len(this);
    return rid_ffi.rid_baz_name(this).toDartString(len);
  }
}";
        assert_eq!(parsed.dart_code(), expected);
    }

    #[test]
    fn test_structs_and_functions() {
        let parsed = ParsedBindings::parse(TWO_STRUCTS).unwrap();

        assert_eq!(parsed.cbindgen_version.as_deref(), Some("0.17.0"));
        assert_eq!(parsed.structs, vec!["Bar", "Foo"]);
        assert_eq!(parsed.renamed_structs(), vec!["RawBar", "RawFoo"]);

        let names: Vec<_> = parsed.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["rid_foo_prim_u8", "rid_bar_f"]);
        assert_eq!(parsed.function("rid_bar_f").unwrap().return_type, CType::Bool);

        let foo = parsed.dart_section_for("Foo").unwrap();
        assert_eq!(foo.extension_name(), Some("Rid_ExtOnPointerFoo"));
        assert_eq!(
            foo.render(),
            "extension Rid_ExtOnPointerFoo on dart_ffi.Pointer<ffigen_bind.Foo> {
  @dart_ffi.Int32()
  int get prim_u8 => rid_ffi.rid_foo_prim_u8(this);
}"
        );
    }

    #[test]
    fn test_wrapped_declaration() {
        let header = "enum BindStatus rid_baz_new(const char *name,
                             uintptr_t name_len,
                             struct Baz **out_handle);";
        let parsed = ParsedBindings::parse(header).unwrap();

        assert_eq!(parsed.functions.len(), 1);
        let f = &parsed.functions[0];
        assert_eq!(f.name, "rid_baz_new");
        assert_eq!(f.params.len(), 3);
        assert_eq!(f.params[2].name.as_deref(), Some("out_handle"));
    }

    #[test]
    fn test_unterminated_dart_section() {
        let header = "/**\n * ```dart\n * extension X on Pointer<bind.X> {\n * }\n */";
        let result = ParsedBindings::parse(header);
        assert!(matches!(
            result,
            Err(BindingError::UnterminatedDartSection { line: 2 })
        ));
    }

    #[test]
    fn test_empty_and_bare_marker_lines() {
        let header = "/**\n * ```dart\n * ```\n * ```dart\n * extension A on Pointer<b.A> {\n *\n * }\n * ```\n */";
        let parsed = ParsedBindings::parse(header).unwrap();

        assert_eq!(parsed.dart_sections.len(), 1);
        assert_eq!(parsed.dart_code(), "extension A on Pointer<b.A> {\n  \n}");
    }
}
