//! Iterative SVG simplification: the transform units, the pipeline they
//! form, and the fixed-point scheduler that drives them.
//!
//! ## Default pipeline order
//!
//! 1. `merge_styles` — fold every `<style>` sheet into one
//! 2. `inline_styles` — move matching rules onto elements
//! 3. `convert_style_to_attrs` — style declarations to attributes
//! 4. `remove_style_element` — drop `<style>` elements
//! 5. `cleanup_numeric_values` — round numbers, strip `px`
//! 6. `move_group_attrs_to_elems` — push group transforms down
//! 7. `convert_shape_to_path` — shapes to `<path>` (arcs included)
//! 8. `remove_off_canvas_paths` — drop invisible geometry
//! 9. `remove_fill` — recolorable icons
//! 10. `remove_class` — no class leakage
//! 11. `apply_transforms` — flatten transforms into coordinates
//! 12. `merge_paths` — combine sibling paths (forced)
//! 13. `convert_path_data` — compact `d` syntax
//! 14. `collapse_groups` — remove redundant `<g>` wrappers
//! 15. `remove_irrelevant_elements` — only `<g>`/`<path>` under the root
//!
//! Order is a strict total order: later units see the tree as earlier
//! units left it within the same pass.

mod apply_transforms;
mod groups;
mod merge;
mod numeric;
mod offcanvas;
mod pass;
mod pathdata;
mod shapes;
mod strip;
mod styles;

pub use apply_transforms::ApplyTransforms;
pub use groups::{CollapseGroups, MoveGroupAttrsToElems};
pub use merge::MergePaths;
pub use numeric::CleanupNumericValues;
pub use offcanvas::RemoveOffCanvasPaths;
pub use pass::{Pass, run_unit};
pub use pathdata::ConvertPathData;
pub use shapes::ConvertShapeToPath;
pub use strip::{RemoveClass, RemoveFill, RemoveIrrelevantElements};
pub use styles::{ConvertStyleToAttrs, InlineStyles, MergeStyles, RemoveStyleElement};

use tracing::{debug, warn};

use crate::dom::Document;

/// Iteration budget for the convergence loop. Not a hard ceiling: a pass
/// that still changes the tree at the budget earns exactly one more pass.
pub const MAX_PASS_ITERATIONS: usize = 10;

/// Size sentinel meaning "no previous pass"; larger than any real
/// serialization, so the first comparison always differs.
const NO_PREVIOUS_SIZE: usize = usize::MAX;

/// The ordered list of transform units applied each pass.
pub type Pipeline = Vec<Box<dyn Pass>>;

/// The default unit list, in the order documented on this module.
pub fn default_pipeline() -> Pipeline {
    vec![
        Box::new(MergeStyles),
        Box::new(InlineStyles),
        Box::new(ConvertStyleToAttrs),
        Box::new(RemoveStyleElement),
        Box::new(CleanupNumericValues::default()),
        Box::new(MoveGroupAttrsToElems),
        Box::new(ConvertShapeToPath {
            convert_arcs: true,
            ..Default::default()
        }),
        Box::new(RemoveOffCanvasPaths::default()),
        Box::new(RemoveFill),
        Box::new(RemoveClass),
        Box::new(ApplyTransforms::default()),
        Box::new(MergePaths { force: true }),
        Box::new(ConvertPathData::default()),
        Box::new(CollapseGroups),
        Box::new(RemoveIrrelevantElements),
    ]
}

/// Caller-supplied additions to the default pipeline.
pub enum ExtraPasses {
    /// Run entirely before the defaults.
    Flat(Vec<Box<dyn Pass>>),
    /// Run around the defaults: `before`, defaults, `after`.
    Slotted {
        before: Vec<Box<dyn Pass>>,
        after: Vec<Box<dyn Pass>>,
    },
}

/// Merge caller units with the defaults.
///
/// Duplicate names are allowed — a later unit simply observes whatever the
/// earlier one left behind — but get a diagnostic since they are usually
/// accidental.
pub fn assemble_pipeline(extra: Option<ExtraPasses>) -> Pipeline {
    let pipeline = match extra {
        None => default_pipeline(),
        Some(ExtraPasses::Flat(mut units)) => {
            units.extend(default_pipeline());
            units
        }
        Some(ExtraPasses::Slotted { before, after }) => {
            let mut units = before;
            units.extend(default_pipeline());
            units.extend(after);
            units
        }
    };

    let mut seen: Vec<&'static str> = Vec::new();
    for unit in &pipeline {
        let name = unit.name();
        if seen.contains(&name) {
            warn!(unit = name, "duplicate transform unit name in pipeline");
        } else {
            seen.push(name);
        }
    }

    pipeline
}

fn run_pipeline(doc: &mut Document, pipeline: &mut Pipeline) {
    for unit in pipeline.iter_mut() {
        pass::run_unit(doc, unit.as_mut());
    }
}

/// Run the pipeline over the tree until its serialized size stops
/// changing, with a soft iteration budget.
///
/// Exit policy, checked after every pass:
/// - size equal to the previous pass: converged, stop immediately,
///   whatever the iteration count;
/// - size changed and the budget ([`MAX_PASS_ITERATIONS`]) is spent: run
///   exactly one more pass, then stop without looking again.
///
/// For ordinary inputs the loop ends on the first pass that changes
/// nothing; the budget only matters for slow or oscillating pipelines,
/// which are bounded at budget + 1 passes rather than converged. The tree
/// is mutated in place — extraction reads the same object.
pub fn simplify(doc: &mut Document, pipeline: &mut Pipeline) {
    let mut previous_size = NO_PREVIOUS_SIZE;
    let mut iterations = 1usize;

    loop {
        run_pipeline(doc, pipeline);
        let size = doc.metric();
        debug!(iterations, size, "simplification pass complete");

        if size == previous_size {
            debug!(iterations, "tree size stable, converged");
            break;
        }
        if iterations >= MAX_PASS_ITERATIONS {
            debug!(iterations, "iteration budget spent, one final pass");
            run_pipeline(doc, pipeline);
            break;
        }
        previous_size = size;
        iterations += 1;
    }
}
