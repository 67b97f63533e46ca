use std::fmt;

use crate::types::InvalidPieceType;

/// Configuration and data errors raised when building engine state.
///
/// Rule outcomes (blocked moves, failed rotations) are never errors; they
/// leave state unchanged and report `false`/`None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    InvalidPieceType(u8),
    InvalidBoardSize { width: u8, height: u8 },
    /// Index of a tag row that does not fit the board.
    InvalidTagRow(usize),
    InvalidPreviewDepth(usize),
}

impl EngineError {
    pub fn code(self) -> &'static str {
        match self {
            EngineError::InvalidPieceType(_) => "invalid_piece_type",
            EngineError::InvalidBoardSize { .. } => "invalid_board_size",
            EngineError::InvalidTagRow(_) => "invalid_tag_row",
            EngineError::InvalidPreviewDepth(_) => "invalid_preview_depth",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EngineError::InvalidPieceType(_) => "cell tag does not name a piece type",
            EngineError::InvalidBoardSize { .. } => "board dimensions outside supported range",
            EngineError::InvalidTagRow(_) => "tag row does not fit the board",
            EngineError::InvalidPreviewDepth(_) => "preview depth outside supported range",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EngineError::InvalidPieceType(tag) => write!(f, "{} ({})", self.message(), tag),
            EngineError::InvalidBoardSize { width, height } => {
                write!(f, "{} ({}x{})", self.message(), width, height)
            }
            EngineError::InvalidTagRow(row) => write!(f, "{} (row {})", self.message(), row),
            EngineError::InvalidPreviewDepth(depth) => write!(f, "{} ({})", self.message(), depth),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<InvalidPieceType> for EngineError {
    fn from(value: InvalidPieceType) -> Self {
        EngineError::InvalidPieceType(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_display() {
        let err = EngineError::InvalidBoardSize {
            width: 2,
            height: 90,
        };
        assert_eq!(err.code(), "invalid_board_size");
        assert_eq!(
            err.to_string(),
            "board dimensions outside supported range (2x90)"
        );

        let err: EngineError = InvalidPieceType(12).into();
        assert_eq!(err, EngineError::InvalidPieceType(12));
        assert_eq!(err.code(), "invalid_piece_type");

        let err = EngineError::InvalidTagRow(3);
        assert_eq!(err.code(), "invalid_tag_row");
        assert_eq!(err.to_string(), "tag row does not fit the board (row 3)");
    }
}
