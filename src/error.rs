//! Error types for terrain generation and triangulation

use thiserror::Error;

/// Errors that can occur while configuring, sampling or meshing a terrain tile
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A point or triangle count does not fit the index width
    #[error("index overflow: {count} exceeds the limit of {limit}")]
    IndexOverflow { count: usize, limit: usize },

    /// The triangulation bound does not enclose an input point
    #[error("point {index} lies outside the super-triangle; increase the size bound")]
    PointOutsideSuperTriangle { index: usize },

    /// A raw blend-mode discriminant has no matching mode
    #[error("unknown blend mode: {0}")]
    UnknownBlendMode(u8),

    /// A stamp references a heightmap that is not in the atlas
    #[error("unknown heightmap id: {0}")]
    UnknownHeightmap(u16),

    /// A pipeline stage could not produce its output
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type alias for terrain operations
pub type Result<T> = std::result::Result<T, TerrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TerrainError::IndexOverflow { count: 70_000, limit: 65_535 };
        assert_eq!(err.to_string(), "index overflow: 70000 exceeds the limit of 65535");

        let err = TerrainError::UnknownBlendMode(9);
        assert_eq!(err.to_string(), "unknown blend mode: 9");
    }
}
