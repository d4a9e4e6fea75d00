//! Pool error taxonomy

use adapter_core::TransferError;
use amm_model::AmmError;
use thiserror::Error;

/// Every way a pool operation can fail
///
/// All variants are raised before the ledger is committed, except
/// `TransferFailed`, which is raised after the settlement was unwound, and
/// `SettlementIncomplete`, raised when a ledger refused to undo a movement
/// and the pool kept the part that could not be taken back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("both reserves must be nonzero")]
    InsufficientReserves,

    #[error("deposit would mint zero claims")]
    InsufficientLiquidityMinted,

    #[error("claim balance too low")]
    InsufficientBalance,

    #[error("pool has no outstanding claims")]
    EmptyPool,

    #[error("asset transfer failed: {0}")]
    TransferFailed(TransferError),

    #[error("asset transfer failed and could not be fully unwound: {0}")]
    SettlementIncomplete(TransferError),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("swap would decrease the invariant product")]
    InvariantViolation,

    #[error("inconsistent pool state: {0}")]
    InconsistentState(&'static str),
}

impl From<AmmError> for PoolError {
    fn from(err: AmmError) -> Self {
        match err {
            AmmError::InvalidAmount => PoolError::InvalidAmount,
            AmmError::InsufficientReserves => PoolError::InsufficientReserves,
            AmmError::InsufficientLiquidityMinted => PoolError::InsufficientLiquidityMinted,
            AmmError::InsufficientBalance => PoolError::InsufficientBalance,
            AmmError::EmptyPool => PoolError::EmptyPool,
            AmmError::Overflow => PoolError::Overflow,
            AmmError::InvariantViolation => PoolError::InvariantViolation,
        }
    }
}

impl From<TransferError> for PoolError {
    fn from(err: TransferError) -> Self {
        PoolError::TransferFailed(err)
    }
}
