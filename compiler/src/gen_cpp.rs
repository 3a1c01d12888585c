use fuse_wire_schema::{FuseWire, SENTINEL};
use crate::{
    compiler::accessors,
    types::FuseDocument,
    utils::{c_hex, hex_array, quote},
};

/// Where the generated code lives and how the source finds its header.
#[derive(Debug, Clone, PartialEq)]
pub struct CodegenOptions {
    pub namespace:      String,
    pub header_include: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            namespace:      "electron".to_string(),
            header_include: "electron/fuses.h".to_string(),
        }
    }
}

impl CodegenOptions {
    /// `electron/fuses.h` becomes `ELECTRON_FUSES_H_`.
    pub fn include_guard(&self) -> String {
        let mut guard: String = self
            .header_include
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        guard.push('_');
        guard
    }
}

/// Renders the declarations header: the exported wire and one
/// `FUSE_EXPORT bool Is<Name>Enabled();` per fuse.
pub fn compile_header(doc: &FuseDocument, options: &CodegenOptions) -> String {
    let guard = options.include_guard();
    let mut code: Vec<String> = Vec::new();

    code.push(format!("#ifndef {}", guard));
    code.push(format!("#define {}", guard));
    code.push("".to_string());
    code.push("#if defined(WIN32)".to_string());
    code.push("#define FUSE_EXPORT __declspec(dllexport)".to_string());
    code.push("#else".to_string());
    code.push("#define FUSE_EXPORT __attribute__((visibility(\"default\")))".to_string());
    code.push("#endif".to_string());
    code.push("".to_string());

    open_namespaces(&mut code, options);

    // volatile: patched bytes must be read at runtime
    code.push("extern const volatile char kFuseWire[];".to_string());
    code.push("".to_string());

    let getters = accessors(doc);
    if !getters.is_empty() {
        for accessor in &getters {
            code.push(format!("FUSE_EXPORT bool {}();", accessor.name));
        }
        code.push("".to_string());
    }

    close_namespaces(&mut code, options);
    code.push("".to_string());
    code.push(format!("#endif  // {}", guard));
    code.push("".to_string());

    code.join("\n")
}

/// Renders the definitions source: the wire bytes as hex literals and one
/// accessor body per fuse reading its fixed offset.
pub fn compile_source(doc: &FuseDocument, wire: &FuseWire, options: &CodegenOptions) -> String {
    let bytes = wire.encode();
    let (sentinel, rest) = bytes.split_at(SENTINEL.len());
    let mut code: Vec<String> = Vec::new();

    code.push(format!("#include {}", quote(&options.header_include)));
    code.push("".to_string());

    open_namespaces(&mut code, options);

    code.push(format!(
        "const volatile char kFuseWire[] = {{ /* sentinel */ {}, /* fuse_version */ {}, /* fuse_wire_length */ {}, /* fuse_wire */ {}}};",
        hex_array(sentinel),
        c_hex(rest[0]),
        c_hex(rest[1]),
        hex_array(&rest[2..]),
    ));
    code.push("".to_string());

    for accessor in accessors(doc) {
        code.push(format!("bool {}() {{", accessor.name));
        code.push(format!("  return kFuseWire[{}] == '1';", accessor.offset));
        code.push("}".to_string());
        code.push("".to_string());
    }

    close_namespaces(&mut code, options);
    code.push("".to_string());

    code.join("\n")
}

fn open_namespaces(code: &mut Vec<String>, options: &CodegenOptions) {
    code.push(format!("namespace {} {{", options.namespace));
    code.push("".to_string());
    code.push("namespace fuses {".to_string());
    code.push("".to_string());
}

fn close_namespaces(code: &mut Vec<String>, options: &CodegenOptions) {
    code.push("}  // namespace fuses".to_string());
    code.push("".to_string());
    code.push(format!("}}  // namespace {}", options.namespace));
}
