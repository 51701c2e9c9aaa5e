use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("insufficient payment: required {required}, attached {attached}")]
    InsufficientPayment { required: u128, attached: u128 },

    #[error("payment arithmetic overflow")]
    Overflow,

    #[error("outbound transfer rejected: {0}")]
    TransferFailed(String),

    #[error("operation blocked by reentrancy lock")]
    ReentrancyBlocked,
}
