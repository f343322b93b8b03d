use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("interval ends before it starts: {start} > {end}")]
    InvertedSpan { start: NaiveDate, end: NaiveDate },
    #[error("date range is empty: start {start} is not before end {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T> = std::result::Result<T, ModelError>;
