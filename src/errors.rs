use thiserror::Error;

/// Any of these aborts the run; partial tables are never produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid match record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("inequality coefficient requested for an empty group")]
    EmptyGroup,

    #[error("retention rate undefined for league {league}: no top-cohort appearances at or after the season floor")]
    UndefinedRetentionRate { league: String },
}
