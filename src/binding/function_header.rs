//! Parsing of single C function declarations as emitted by cbindgen.

/// A C type as it appears in a return position or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CType {
    Void,
    Bool,
    /// Unsigned fixed width integer, `uint<bits>_t`.
    UInt(u8),
    /// Signed fixed width integer, `int<bits>_t`.
    Int(u8),
    UIntPtr,
    IntPtr,
    Float,
    Double,
    /// `char *` or `const char *`.
    CString,
    /// `struct X *`.
    StructPointer(String),
    /// Any other pointer, holding the pointee text.
    Pointer(String),
    /// `struct X` passed by value.
    Struct(String),
    /// `enum X` passed by value.
    Enum(String),
    /// Typedef'd or otherwise unknown name.
    Named(String),
}

impl CType {
    /// Classify the textual type of a return value or parameter.
    pub fn parse(text: &str) -> CType {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if let Some(pointee) = normalized.strip_suffix('*') {
            let pointee = pointee.trim();
            if pointee.ends_with('*') {
                return CType::Pointer(pointee.to_string());
            }
            let base = pointee.strip_prefix("const ").unwrap_or(pointee).trim();
            return match base {
                "char" => CType::CString,
                _ => match base.strip_prefix("struct ") {
                    Some(name) => CType::StructPointer(name.trim().to_string()),
                    None => CType::Pointer(base.to_string()),
                },
            };
        }

        match normalized.as_str() {
            "void" => CType::Void,
            "bool" | "_Bool" => CType::Bool,
            "uintptr_t" | "size_t" => CType::UIntPtr,
            "intptr_t" | "ptrdiff_t" => CType::IntPtr,
            "float" => CType::Float,
            "double" => CType::Double,
            other => {
                if let Some(bits) = fixed_width(other, "uint") {
                    CType::UInt(bits)
                } else if let Some(bits) = fixed_width(other, "int") {
                    CType::Int(bits)
                } else if let Some(name) = other.strip_prefix("struct ") {
                    CType::Struct(name.to_string())
                } else if let Some(name) = other.strip_prefix("enum ") {
                    CType::Enum(name.to_string())
                } else {
                    CType::Named(other.to_string())
                }
            }
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            CType::CString | CType::StructPointer(_) | CType::Pointer(_)
        )
    }

    /// Render back to the C spelling cbindgen uses.
    pub fn c_name(&self) -> String {
        match self {
            CType::Void => "void".to_string(),
            CType::Bool => "bool".to_string(),
            CType::UInt(bits) => format!("uint{}_t", bits),
            CType::Int(bits) => format!("int{}_t", bits),
            CType::UIntPtr => "uintptr_t".to_string(),
            CType::IntPtr => "intptr_t".to_string(),
            CType::Float => "float".to_string(),
            CType::Double => "double".to_string(),
            CType::CString => "const char *".to_string(),
            CType::StructPointer(name) => format!("struct {} *", name),
            CType::Pointer(name) => format!("{} *", name),
            CType::Struct(name) => format!("struct {}", name),
            CType::Enum(name) => format!("enum {}", name),
            CType::Named(name) => name.clone(),
        }
    }
}

fn fixed_width(text: &str, prefix: &str) -> Option<u8> {
    let bits = text.strip_prefix(prefix)?.strip_suffix("_t")?;
    match bits {
        "8" | "16" | "32" | "64" => bits.parse().ok(),
        _ => None,
    }
}

/// Argument category used to render dummy Swift calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionArg {
    Pointer,
    Int,
    Struct(String),
    Enum(String),
}

impl FunctionArg {
    fn from_type(ty: &CType) -> FunctionArg {
        match ty {
            t if t.is_pointer() => FunctionArg::Pointer,
            CType::Named(name) if name.starts_with("PointerMut_") => FunctionArg::Pointer,
            CType::Struct(name) => FunctionArg::Struct(name.clone()),
            CType::Enum(name) => FunctionArg::Enum(name.clone()),
            _ => FunctionArg::Int,
        }
    }

    fn render_swift(&self) -> String {
        use FunctionArg::*;
        match self {
            Pointer => "nil".to_string(),
            Int => "0".to_string(),
            Struct(_) => "nil".to_string(),
            Enum(name) => format!("{}(rawValue: 0)", name),
        }
    }
}

/// One parameter of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: CType,
    pub name: Option<String>,
}

/// Parsed C function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader {
    /// Name of the function
    pub name: String,
    pub return_type: CType,
    pub params: Vec<Param>,
}

impl FunctionHeader {
    /// Argument categories, in declaration order.
    pub fn args(&self) -> Vec<FunctionArg> {
        self.params.iter().map(|p| FunctionArg::from_type(&p.ty)).collect()
    }

    /// Struct this function takes as its only argument, if it is `struct X *`.
    pub fn receiver(&self) -> Option<&str> {
        match self.params.as_slice() {
            [Param {
                ty: CType::StructPointer(name),
                ..
            }] => Some(name),
            _ => None,
        }
    }

    pub fn render_swift_call(&self) -> String {
        let args: Vec<String> = self.args().iter().map(|x| x.render_swift()).collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

/// Parse a declaration that fits on one line.
///
/// Comment lines, preprocessor directives and typedefs are not declarations.
pub fn parse_function_header(line: &str) -> Option<FunctionHeader> {
    let line = line.trim();
    if line.starts_with('*')
        || line.starts_with('/')
        || line.starts_with('#')
        || line.starts_with("typedef")
        || !line.contains('(')
    {
        return None;
    }

    let (head, rest) = line.split_once('(')?;
    let raw_name = head.split_whitespace().last()?;
    let name = raw_name.trim_start_matches('*');
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let return_text = head.trim_end().strip_suffix(name)?;
    let return_type = CType::parse(return_text);

    let args_str = rest.split_once(')').map(|(args, _)| args)?;
    let params = args_str
        .split(',')
        .filter_map(|x| parse_param(x.trim()))
        .collect();

    Some(FunctionHeader {
        name: name.to_string(),
        return_type,
        params,
    })
}

fn parse_param(arg: &str) -> Option<Param> {
    if arg.is_empty() || arg == "void" {
        return None;
    }

    let split = arg.rfind(|c: char| !(c.is_alphanumeric() || c == '_'));
    let (ty, name) = match split {
        Some(idx) => {
            let (ty, name) = arg.split_at(idx + 1);
            match ty.trim() {
                "struct" | "enum" | "const" | "unsigned" | "signed" => (arg, None),
                _ => (ty, Some(name.to_string())),
            }
        }
        None => (arg, None),
    };

    Some(Param {
        ty: CType::parse(ty),
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_function_headers() {
        let res = parse_function_header("const char *rid_model_debug(struct Model *ptr);").unwrap();
        assert_eq!(res.name, "rid_model_debug");
        assert_eq!(res.return_type, CType::CString);
        assert_eq!(res.args(), vec![FunctionArg::Pointer]);
        assert_eq!(res.receiver(), Some("Model"));

        let res = parse_function_header("void rid_cstring_free(char *ptr);").unwrap();
        assert_eq!(res.name, "rid_cstring_free");
        assert_eq!(res.return_type, CType::Void);
        assert_eq!(res.args(), vec![FunctionArg::Pointer]);

        let res = parse_function_header(
            "const struct Todo *rid_vec_Todo_get(struct Vec_Todo *ptr, uintptr_t idx);",
        )
        .unwrap();
        assert_eq!(res.name, "rid_vec_Todo_get");
        assert_eq!(res.return_type, CType::StructPointer("Todo".to_string()));
        assert_eq!(res.args(), vec![FunctionArg::Pointer, FunctionArg::Int]);
        assert_eq!(res.params[1].name.as_deref(), Some("idx"));
        assert_eq!(res.receiver(), None);

        let res = parse_function_header(
            "Pointer_Todo rid_get_item_Pointer_Todo(struct RidVec_Pointer_Todo vec, uintptr_t idx);",
        )
        .unwrap();
        assert_eq!(
            res.args(),
            vec![
                FunctionArg::Struct("RidVec_Pointer_Todo".to_string()),
                FunctionArg::Int
            ]
        );
        assert_eq!(
            res.render_swift_call(),
            "rid_get_item_Pointer_Todo(nil, 0)"
        );

        let res = parse_function_header("void rid_free_Model(PointerMut_Model ptr);").unwrap();
        assert_eq!(res.args(), vec![FunctionArg::Pointer]);

        let res = parse_function_header("PointerMut_Model initModel(void);").unwrap();
        assert_eq!(res.name, "initModel");
        assert_eq!(res.return_type, CType::Named("PointerMut_Model".to_string()));
        assert!(res.params.is_empty());
    }

    #[test]
    fn not_function_headers() {
        for s in [
            "typedef struct Model *PointerMut_Model;",
            "/**",
            " * int get f => rid_ffi.rid_bar_f(this) != 0;",
            "* func dummyCalls_rid_model_debug_rid_model_debug_pretty() {",
            "uintptr_t length;",
            "#include \"stdint.h\"",
            "typedef void (*Callback)(uint32_t stage);",
        ] {
            assert_eq!(parse_function_header(s), None, "{}", s);
        }
    }

    #[test]
    fn fixture_accessor_types() {
        let cases = [
            ("uint8_t rid_simple_prim_u8(struct Simple *ptr);", CType::UInt(8)),
            ("uint16_t rid_simple_prim_u16(struct Simple *ptr);", CType::UInt(16)),
            ("uint64_t rid_simple_prim_u64(struct Simple *ptr);", CType::UInt(64)),
            ("uintptr_t rid_simple_cstring_len(struct Simple *ptr);", CType::UIntPtr),
            ("bool rid_simple_f(struct Simple *ptr);", CType::Bool),
        ];
        for (line, expected) in cases {
            let header = parse_function_header(line).unwrap();
            assert_eq!(header.return_type, expected);
            assert_eq!(header.receiver(), Some("Simple"));
        }
    }

    #[test]
    fn render_swift_calls() {
        let header = parse_function_header(
            "enum BindStatus rid_baz_new(const char *name, uintptr_t name_len, struct Baz **out_handle);",
        )
        .unwrap();
        assert_eq!(header.return_type, CType::Enum("BindStatus".to_string()));
        assert_eq!(header.render_swift_call(), "rid_baz_new(nil, 0, nil)");

        let header = parse_function_header("void rid_set_mode(enum Mode mode);").unwrap();
        assert_eq!(header.render_swift_call(), "rid_set_mode(Mode(rawValue: 0))");
    }

    #[test]
    fn c_type_round_trip_names() {
        assert_eq!(CType::parse("const char *").c_name(), "const char *");
        assert_eq!(CType::parse("struct Foo *").c_name(), "struct Foo *");
        assert_eq!(CType::parse("uint32_t").c_name(), "uint32_t");
        assert_eq!(CType::parse("int7_t"), CType::Named("int7_t".to_string()));
    }
}
