use thiserror::Error;

/// Top-level error type for the tama crate.
#[derive(Debug, Error)]
pub enum TamaError {
    #[error(transparent)]
    Filtration(#[from] FiltrationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Diagram(#[from] DiagramError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Why an input sequence is not a valid filtration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// A facet of the simplex does not occur anywhere in the sequence.
    MissingFace,
    /// A facet of the simplex occurs at or after the simplex itself.
    FaceAfterCoface,
    /// The simplex occurs more than once.
    DuplicateSimplex,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingFace => "a face is missing",
            Self::FaceAfterCoface => "a face appears after its coface",
            Self::DuplicateSimplex => "simplex appears twice",
        };
        f.write_str(text)
    }
}

/// Errors related to simplices and filtrations.
#[derive(Debug, Error, PartialEq)]
pub enum FiltrationError {
    #[error("{simplices} simplices but {weights} weights")]
    LengthMismatch { simplices: usize, weights: usize },

    #[error("simplex at position {position} references unknown vertex {vertex}")]
    InvalidVertex { vertex: usize, position: usize },

    #[error("malformed filtration at position {position}: {reason}")]
    MalformedFiltration {
        position: usize,
        reason: MalformedReason,
    },

    #[error("entry at position {position} carries id {id}")]
    IdMismatch { position: usize, id: usize },

    #[error("simplex must have at least one vertex")]
    EmptySimplex,
}

/// Errors related to point clouds and complex construction.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("invalid parameter {parameter}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },

    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

/// Errors related to persistence diagrams.
#[derive(Debug, Error, PartialEq)]
pub enum DiagramError {
    #[error("pair {index} is born at {birth} after it dies at {death}")]
    InvertedPair { index: usize, birth: f64, death: f64 },

    #[error("pair {index} has a NaN coordinate")]
    NotANumber { index: usize },

    #[error("{labels} labels given for {diagrams} diagrams")]
    LabelCount { diagrams: usize, labels: usize },
}

/// Errors while writing or reading exported filtrations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`TamaError`].
pub type Result<T> = std::result::Result<T, TamaError>;
