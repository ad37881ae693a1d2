use std::{
    env,
    io::{self, Write},
    process,
};

use anyhow::Context;
use game_linalg_gen::{
    render_capabilities, render_matrices, render_vectors, MatrixCatalog, Options, VectorCatalog,
};
use log::LevelFilter;

const USAGE: &str = "usage: game-linalg-gen <vectors|matrices|capabilities>";

fn main() -> anyhow::Result<()> {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let [unit] = args.as_slice() else {
        eprintln!("{USAGE}");
        process::exit(2);
    };

    let options = Options::from_env().context("invalid generator configuration")?;
    let vectors = VectorCatalog::standard();
    let matrices = MatrixCatalog::standard();

    // nothing is written unless the whole unit rendered
    let text = match unit.as_str() {
        "vectors" => render_vectors(&vectors, &options).context("failed to render vectors")?,
        "matrices" => render_matrices(&vectors, &matrices, &options)
            .context("failed to render matrices")?,
        "capabilities" => render_capabilities(&vectors, &matrices)?,
        other => {
            eprintln!("unknown unit '{other}'");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .context("failed to write to stdout")?;
    Ok(())
}
