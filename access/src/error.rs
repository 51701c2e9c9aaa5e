use lodge_types::HolderAddress;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("caller {caller} is not the owner")]
    Unauthorized { caller: HolderAddress },
}
