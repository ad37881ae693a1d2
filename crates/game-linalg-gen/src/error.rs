/// Errors that abort generation.
///
/// Generation never produces partial output: any of these means no unit was rendered.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A matrix spec's paired vector spec is missing from the vector catalog.
    #[error("catalog inconsistency: matrix `{matrix}` multiplies with vector `{vector}`, which is not in the vector catalog")]
    CatalogInconsistency { matrix: String, vector: String },

    #[error("duplicate catalog entry {0}")]
    DuplicateEntry(String),

    #[error("unsupported dimension {0} (expected 2, 3 or 4)")]
    InvalidDimension(usize),

    /// The emitter was handed a plan it cannot render.
    #[error("failed to emit `{type_name}`: {reason}")]
    Emission { type_name: String, reason: String },

    #[error("invalid value '{value}' set for `{var}`: {reason}")]
    InvalidOption {
        var: &'static str,
        value: String,
        reason: String,
    },
}
