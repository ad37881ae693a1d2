//! Assembly of emitted types into generated source units.

use std::fmt::Write as _;

use itertools::Itertools;
use syn::{parse_quote, Item};

use crate::{
    catalog::{MatrixCatalog, VectorCatalog},
    emit::{emit_matrix, emit_vector},
    rules::{resolve_matrix, resolve_vector, MatrixPlan},
    Error, Options,
};

const GENERATOR: &str = env!("CARGO_PKG_NAME");

fn banner(subcommand: &str) -> String {
    format!(
        "// @generated by {GENERATOR} {}. DO NOT EDIT.\n\
         // Regenerate with `{GENERATOR} {subcommand}` instead.\n\n",
        env!("CARGO_PKG_VERSION"),
    )
}

fn trailer(unit: &str) -> String {
    format!("\n// end of generated {unit}\n")
}

fn assemble(subcommand: &str, unit: &str, items: Vec<Item>) -> String {
    let file = syn::File {
        shebang: None,
        attrs: Vec::new(),
        items,
    };
    let mut out = banner(subcommand);
    out.push_str(&prettyplease::unparse(&file));
    out.push_str(&trailer(unit));
    out
}

/// Renders the unit defining every vector type of `vectors`, in catalog order.
pub fn render_vectors(vectors: &VectorCatalog, options: &Options) -> Result<String, Error> {
    let mut items: Vec<Item> = vec![parse_quote!(
        use ::core::{fmt, ops};
    )];
    for spec in vectors.iter() {
        let plan = resolve_vector(spec);
        log::trace!("{}: {:?}", plan.name, plan.capabilities);
        let emitted = emit_vector(&plan, options)?;
        log::debug!("emitted {} ({} items)", plan.name, emitted.len());
        items.extend(emitted);
    }

    let out = assemble("vectors", "vector types", items);
    log::info!("rendered {} vector types ({} bytes)", vectors.len(), out.len());
    Ok(out)
}

/// Renders the unit defining every matrix type of `matrices`, in catalog order.
///
/// Every matrix is resolved against `vectors` before anything is emitted, so a missing paired
/// vector fails the whole unit.
pub fn render_matrices(
    vectors: &VectorCatalog,
    matrices: &MatrixCatalog,
    options: &Options,
) -> Result<String, Error> {
    let plans = matrices
        .iter()
        .map(|spec| resolve_matrix(spec, vectors))
        .collect::<Result<Vec<MatrixPlan>, _>>()?;

    let vector_module = &options.vectors;
    let mut items: Vec<Item> = vec![
        parse_quote!(
            use ::core::{fmt, ops};
        ),
        parse_quote!(
            use #vector_module::*;
        ),
    ];
    for plan in &plans {
        log::trace!("{}: {:?}", plan.name, plan.capabilities);
        let emitted = emit_matrix(plan, options)?;
        log::debug!("emitted {} ({} items)", plan.name, emitted.len());
        items.extend(emitted);
    }

    let out = assemble("matrices", "matrix types", items);
    log::info!("rendered {} matrix types ({} bytes)", plans.len(), out.len());
    Ok(out)
}

/// Renders a human-readable listing of every type and the capabilities it is generated with.
pub fn render_capabilities(
    vectors: &VectorCatalog,
    matrices: &MatrixCatalog,
) -> Result<String, Error> {
    let mut out = String::new();
    for spec in vectors.iter() {
        let plan = resolve_vector(spec);
        writeln!(
            out,
            "{:<8} {}",
            plan.name,
            plan.capabilities.iter().join(" ")
        )
        .ok();
    }
    for spec in matrices.iter() {
        let plan = resolve_matrix(spec, vectors)?;
        writeln!(
            out,
            "{:<8} {}",
            plan.name,
            plan.capabilities.iter().join(" ")
        )
        .ok();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Dimension, MatrixSpec, ScalarKind};

    use super::*;

    #[test]
    fn banner_and_trailer() {
        let out = render_vectors(&VectorCatalog::standard(), &Options::default()).unwrap();
        assert!(out.starts_with("// @generated by game-linalg-gen"), "{out}");
        assert!(out.contains("`game-linalg-gen vectors`"));
        assert!(out.ends_with("// end of generated vector types\n"));
    }

    #[test]
    fn matrix_unit_imports_vectors() {
        let matrices = MatrixCatalog::new(vec![MatrixSpec::new(
            ScalarKind::Integer,
            Dimension::TWO,
        )])
        .unwrap();
        let out =
            render_matrices(&VectorCatalog::standard(), &matrices, &Options::default()).unwrap();
        assert!(out.contains("use super::vec::*;"), "{out}");
        assert!(out.contains("pub struct IMat2x2"), "{out}");
        assert!(!out.contains("pub struct FMat2x2"), "{out}");
    }

    #[test]
    fn capability_listing() {
        let out =
            render_capabilities(&VectorCatalog::standard(), &MatrixCatalog::standard()).unwrap();
        assert_eq!(out.lines().count(), 18);

        let ivec3 = out.lines().find(|l| l.starts_with("IVec3 ")).unwrap();
        assert!(ivec3.contains(" cross"), "{ivec3}");
        assert!(!ivec3.contains(" length"), "{ivec3}");

        let fvec2 = out.lines().find(|l| l.starts_with("FVec2 ")).unwrap();
        assert!(fvec2.contains(" normalize"), "{fvec2}");
        assert!(!fvec2.contains(" cross"), "{fvec2}");
    }
}
