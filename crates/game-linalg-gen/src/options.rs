use std::env::{self, VarError};

use syn::{parse_quote, Path};

use crate::Error;

/// Module paths the generated code refers to.
///
/// The defaults match the layout of the `game-linalg` crate. They can be overridden through
/// environment variables when the generated units are included elsewhere:
///
/// * `GAME_LINALG_GL`: module providing the GL entry points and `types::GLint` (default `gl`).
/// * `GAME_LINALG_APPROX`: module providing the `ApproxEq` trait (default `crate::approx`).
/// * `GAME_LINALG_VECTORS`: module the matrix unit imports the vector types from (default
///   `super::vec`).
#[derive(Debug, Clone)]
pub struct Options {
    pub gl: Path,
    pub approx: Path,
    pub vectors: Path,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gl: parse_quote!(gl),
            approx: parse_quote!(crate::approx),
            vectors: parse_quote!(super::vec),
        }
    }
}

impl Options {
    /// Returns the default options, with any overrides from the environment applied.
    pub fn from_env() -> Result<Self, Error> {
        let mut options = Self::default();
        if let Some(path) = path_var("GAME_LINALG_GL")? {
            options.gl = path;
        }
        if let Some(path) = path_var("GAME_LINALG_APPROX")? {
            options.approx = path;
        }
        if let Some(path) = path_var("GAME_LINALG_VECTORS")? {
            options.vectors = path;
        }
        Ok(options)
    }
}

fn path_var(var: &'static str) -> Result<Option<Path>, Error> {
    match env::var(var) {
        Ok(value) => parse_path(var, &value).map(Some),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(s)) => Err(Error::InvalidOption {
            var,
            value: s.to_string_lossy().into_owned(),
            reason: "not valid unicode".into(),
        }),
    }
}

fn parse_path(var: &'static str, value: &str) -> Result<Path, Error> {
    syn::parse_str::<Path>(value).map_err(|e| Error::InvalidOption {
        var,
        value: value.into(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;

    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.gl.to_token_stream().to_string(), "gl");
        assert_eq!(
            options.approx.to_token_stream().to_string(),
            "crate :: approx"
        );
        assert_eq!(
            options.vectors.to_token_stream().to_string(),
            "super :: vec"
        );
    }

    #[test]
    fn parses_paths() {
        let path = parse_path("GAME_LINALG_GL", "::my_engine::gl").unwrap();
        assert_eq!(path.segments.len(), 2);
        assert!(path.leading_colon.is_some());

        let err = parse_path("GAME_LINALG_GL", "not a path").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOption {
                var: "GAME_LINALG_GL",
                ..
            }
        ));
    }
}
