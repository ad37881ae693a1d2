use std::{env, fs, path::PathBuf};

use game_linalg_gen::{render_matrices, render_vectors, MatrixCatalog, Options, VectorCatalog};

fn main() {
    for var in ["GAME_LINALG_GL", "GAME_LINALG_APPROX", "GAME_LINALG_VECTORS"] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let options = Options::from_env().unwrap_or_else(|e| panic!("{e}"));
    let vectors = VectorCatalog::standard();
    let matrices = MatrixCatalog::standard();

    // render both units before writing either
    let vec_rs = render_vectors(&vectors, &options).unwrap_or_else(|e| panic!("{e}"));
    let mat_rs =
        render_matrices(&vectors, &matrices, &options).unwrap_or_else(|e| panic!("{e}"));

    fs::write(out_dir.join("vec.rs"), vec_rs).unwrap();
    fs::write(out_dir.join("mat.rs"), mat_rs).unwrap();
}
