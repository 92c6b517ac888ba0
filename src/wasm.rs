//! WASM bindings for build-tool integration.
//!
//! Exposes icon compilation to JavaScript hosts (bundler plugins, worker
//! pools). Records cross the boundary as JSON strings; the host side
//! already speaks that shape.

use wasm_bindgen::prelude::*;

use crate::{CompileOptions, Compiler};

/// Initialize panic hook for better error messages in the host console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Compile SVG text into an icon record, returned as a JSON string.
///
/// `module_id` is the path plus optional `?prefix=...&icon-name=...&
/// aliases=...` query, exactly as the library's native entry point takes
/// it.
#[wasm_bindgen]
pub fn compile_icon(
    module_id: &str,
    source: &str,
    prefix: Option<String>,
    infer_prefix: Option<bool>,
) -> Result<String, JsValue> {
    let mut compiler = Compiler::new(CompileOptions {
        prefix: prefix.unwrap_or_else(|| crate::DEFAULT_PREFIX.to_string()),
        infer_prefix: infer_prefix.unwrap_or(false),
        ..Default::default()
    });

    let record = compiler
        .compile(module_id, source)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Simplify SVG text with the default pipeline and return the serialized
/// result, for hosts that want the cleaned markup rather than a record.
#[wasm_bindgen]
pub fn simplify_svg(source: &str) -> Result<String, JsValue> {
    crate::simplify_svg(source)
        .map(|doc| doc.to_svg())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
