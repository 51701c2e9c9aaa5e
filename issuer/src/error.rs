use lodge_access::AccessError;
use lodge_ledger::LedgerError;
use lodge_treasury::TreasuryError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IssuerError {
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("treasury error: {0}")]
    Treasury(#[from] TreasuryError),

    #[error("unknown token class id: {id}")]
    UnknownClass { id: u16 },

    #[error("batch length mismatch: {recipients} recipients, {quantities} quantities")]
    LengthMismatch {
        recipients: usize,
        quantities: usize,
    },

    #[error("founding allocations already minted")]
    AlreadyInitialized,

    #[error("batch transfer failed at index {index}: {source}")]
    BatchFailed { index: usize, source: LedgerError },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}
