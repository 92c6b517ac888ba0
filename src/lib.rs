//! # ikona
//!
//! A build-time compiler from SVG sources to structured icon records.
//!
//! ## Pipeline
//!
//! Raw SVG text is parsed into a mutable tree, simplified by an ordered
//! pipeline of transform units run to a size fixed point, and the result
//! extracted into `{ prefix, iconName, icon: [w, h, aliases, "", paths] }`
//! for direct JSON or module serialization.
//!
//! ## Quick Start
//!
//! ```
//! use ikona::{CompileOptions, Compiler};
//!
//! let svg = r#"<svg viewBox="0 0 24 24"><rect width="10" height="10"/></svg>"#;
//! let mut compiler = Compiler::new(CompileOptions::default());
//! let record = compiler.compile("icons/box.svg", svg).unwrap();
//!
//! assert_eq!(record.icon_name, "box");
//! assert_eq!(record.icon.width, Some(24.0));
//! ```
//!
//! ## Extending the pipeline
//!
//! Callers can add their own [`Pass`] units, either as a flat list running
//! before the defaults or split around them:
//!
//! ```
//! use ikona::{CompileOptions, Compiler, ExtraPasses};
//!
//! let options = CompileOptions {
//!     extra_passes: Some(ExtraPasses::Slotted { before: vec![], after: vec![] }),
//!     ..Default::default()
//! };
//! let mut compiler = Compiler::new(options);
//! # let _ = compiler.compile("icons/x.svg", "<svg><path d=\"M0 0\"/></svg>");
//! ```

pub mod dom;
pub mod error;
pub mod extract;
pub mod name;
pub mod path;
pub mod record;
pub mod simplify;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use dom::Document;
pub use error::{Error, Result};
pub use extract::{ExtractedIcon, extract_icon};
pub use name::{NameInput, NameParser, ParsedName, ResolvedName, normalize_words};
pub use record::{IconData, IconRecord, PathData};
pub use simplify::{
    ExtraPasses, MAX_PASS_ITERATIONS, Pass, Pipeline, assemble_pipeline, default_pipeline,
    simplify,
};

/// Prefix used when neither options, query, nor inference provide one.
/// Short for "custom".
pub const DEFAULT_PREFIX: &str = "cu";

/// Compiler configuration.
///
/// `extra_passes` is consumed when the [`Compiler`] is built; everything
/// else applies per compile.
pub struct CompileOptions {
    /// Default icon prefix.
    pub prefix: String,
    /// Promote a first filename word starting with `prefix` to the prefix.
    pub infer_prefix: bool,
    /// Full override of filename/query parsing.
    pub name_parser: Option<Box<NameParser>>,
    /// Additional transform units merged into the default pipeline.
    pub extra_passes: Option<ExtraPasses>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            infer_prefix: false,
            name_parser: None,
            extra_passes: None,
        }
    }
}

/// Reusable icon compiler: one assembled pipeline, many inputs.
///
/// Each compile owns its own tree; no state flows between inputs beyond
/// the unit instances themselves, which reset per run.
pub struct Compiler {
    prefix: String,
    infer_prefix: bool,
    name_parser: Option<Box<NameParser>>,
    pipeline: Pipeline,
}

impl Compiler {
    /// Assemble the pipeline and keep the naming options.
    pub fn new(options: CompileOptions) -> Self {
        let CompileOptions {
            prefix,
            infer_prefix,
            name_parser,
            extra_passes,
        } = options;
        Self {
            prefix,
            infer_prefix,
            name_parser,
            pipeline: assemble_pipeline(extra_passes),
        }
    }

    /// Compile SVG text into an icon record.
    ///
    /// `module_id` carries the file path and an optional `?key=value`
    /// query (`prefix`, `icon-name`, `aliases`); the path part is used for
    /// naming and error messages, not I/O.
    pub fn compile(&mut self, module_id: &str, source: &str) -> Result<IconRecord> {
        let (file_path, resolved) = name::resolve_name(
            module_id,
            &self.prefix,
            self.infer_prefix,
            self.name_parser.as_deref(),
        )?;

        let mut doc = dom::parse_svg(source)?;
        simplify::simplify(&mut doc, &mut self.pipeline);
        let extracted = extract::extract_icon(&doc, &file_path)?;

        let path_data =
            PathData::from_paths(extracted.paths).ok_or_else(|| Error::NoPathData {
                file: file_path.clone(),
            })?;

        Ok(IconRecord {
            prefix: resolved.prefix,
            icon_name: resolved.icon_name,
            icon: IconData {
                width: extracted.width,
                height: extracted.height,
                aliases: resolved.aliases,
                path_data,
            },
        })
    }

    /// Read the file named by `module_id`'s path part and compile it.
    pub fn compile_file(&mut self, module_id: &str) -> Result<IconRecord> {
        let file_path = module_id.split('?').next().unwrap_or(module_id);
        let source = std::fs::read_to_string(file_path)?;
        self.compile(module_id, &source)
    }
}

/// Parse and simplify SVG text with the default pipeline, returning the
/// converged tree. The building block for callers that want the tree
/// rather than an icon record.
pub fn simplify_svg(source: &str) -> Result<Document> {
    let mut doc = dom::parse_svg(source)?;
    let mut pipeline = default_pipeline();
    simplify::simplify(&mut doc, &mut pipeline);
    Ok(doc)
}
