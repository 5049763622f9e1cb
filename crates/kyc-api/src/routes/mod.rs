//! Route modules.
//!
//! - [`records`]: `/init`, `/log`, `/settlements`, `/settlement`
//! - [`contract`]: `/contract/verifyKYC`, `/contract/kycStatus/{address}`

pub mod contract;
pub mod records;
