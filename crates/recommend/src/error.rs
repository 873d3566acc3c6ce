use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommendError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    #[error("Amount {amount} is out of range (expected 1..={max})")]
    AmountOutOfRange { amount: usize, max: usize },
}
