use game_linalg_gen::{
    render_matrices, render_vectors, Dimension, Error, MatrixCatalog, MatrixSpec, Options,
    ScalarKind, VectorCatalog, VectorSpec,
};

fn struct_names(code: &str) -> Vec<String> {
    let file = syn::parse_file(code).unwrap();
    file.items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Struct(s) => Some(s.ident.to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn vectors_in_catalog_order() {
    let code = render_vectors(&VectorCatalog::standard(), &Options::default()).unwrap();
    assert_eq!(
        struct_names(&code),
        [
            "FVec2", "FVec3", "FVec4", "DVec2", "DVec3", "DVec4", "IVec2", "IVec3", "IVec4",
        ]
    );
}

#[test]
fn matrices_in_catalog_order() {
    let code = render_matrices(
        &VectorCatalog::standard(),
        &MatrixCatalog::standard(),
        &Options::default(),
    )
    .unwrap();
    assert_eq!(
        struct_names(&code),
        [
            "FMat2x2", "FMat3x3", "FMat4x4", "DMat2x2", "DMat3x3", "DMat4x4", "IMat2x2",
            "IMat3x3", "IMat4x4",
        ]
    );
}

#[test]
fn deterministic() {
    let options = Options::default();
    let vectors = VectorCatalog::standard();
    let matrices = MatrixCatalog::standard();

    assert_eq!(
        render_vectors(&vectors, &options).unwrap(),
        render_vectors(&vectors, &options).unwrap(),
    );
    assert_eq!(
        render_matrices(&vectors, &matrices, &options).unwrap(),
        render_matrices(&vectors, &matrices, &options).unwrap(),
    );
}

#[test]
fn gated_members() {
    let code = render_vectors(&VectorCatalog::standard(), &Options::default()).unwrap();
    let file = syn::parse_file(&code).unwrap();

    let methods_of = |ty: &str| -> Vec<String> {
        file.items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Impl(imp) if imp.trait_.is_none() => Some(imp),
                _ => None,
            })
            .filter(|imp| match &*imp.self_ty {
                syn::Type::Path(p) => p.path.is_ident(ty),
                _ => false,
            })
            .flat_map(|imp| imp.items.iter())
            .filter_map(|item| match item {
                syn::ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
                _ => None,
            })
            .collect()
    };

    for (ty, has_cross, has_length) in [
        ("FVec2", false, true),
        ("FVec3", true, true),
        ("DVec4", false, true),
        ("IVec3", true, false),
        ("IVec4", false, false),
    ] {
        let methods = methods_of(ty);
        assert!(methods.iter().any(|m| m == "dot"), "{ty}: {methods:?}");
        assert_eq!(methods.iter().any(|m| m == "cross"), has_cross, "{ty}");
        assert_eq!(methods.iter().any(|m| m == "length"), has_length, "{ty}");
        assert_eq!(methods.iter().any(|m| m == "normalized"), has_length, "{ty}");
    }
}

#[test]
fn integer_uploads_are_narrowed() {
    let code = render_vectors(&VectorCatalog::standard(), &Options::default()).unwrap();
    assert!(code.contains("gl::Uniform3f("), "{code}");
    assert!(code.contains("self.x as f32"), "{code}");
    assert!(!code.contains("Uniform3i"), "{code}");

    let code = render_matrices(
        &VectorCatalog::standard(),
        &MatrixCatalog::standard(),
        &Options::default(),
    )
    .unwrap();
    assert!(code.contains("gl::UniformMatrix4dv("), "{code}");
    assert!(!code.contains("UniformMatrix2iv"), "{code}");
}

#[test]
fn missing_paired_vector() {
    let vectors = VectorCatalog::new(vec![
        VectorSpec::new(ScalarKind::NarrowFloat, Dimension::TWO),
        VectorSpec::new(ScalarKind::NarrowFloat, Dimension::THREE),
    ])
    .unwrap();
    let matrices = MatrixCatalog::new(vec![
        MatrixSpec::new(ScalarKind::NarrowFloat, Dimension::TWO),
        MatrixSpec::new(ScalarKind::NarrowFloat, Dimension::FOUR),
    ])
    .unwrap();

    let err = render_matrices(&vectors, &matrices, &Options::default()).unwrap_err();
    match err {
        Error::CatalogInconsistency { matrix, vector } => {
            assert_eq!(matrix, "FMat4x4");
            assert_eq!(vector, "FVec4");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_options() {
    let options = Options {
        gl: syn::parse_quote!(crate::gl),
        approx: syn::parse_quote!(::my_approx),
        vectors: syn::parse_quote!(crate::vectors),
    };
    let code = render_matrices(
        &VectorCatalog::standard(),
        &MatrixCatalog::standard(),
        &options,
    )
    .unwrap();
    assert!(code.contains("use crate::vectors::*;"), "{code}");
    assert!(code.contains("impl ::my_approx::ApproxEq for DMat3x3"), "{code}");
    assert!(code.contains("crate::gl::UniformMatrix3fv("), "{code}");
}
