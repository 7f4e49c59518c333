#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! glam covers 2x2, 3x3 and 4x4 matrices. Rigid-body math additionally needs
//! 6x6 matrices (SE(3) adjoints and pose covariances) and a small SVD to
//! project nearly-orthogonal matrices back onto SO(3). Both live here.

/// 6x6 matrices and 6-vectors.
pub mod mat6;

/// Singular value decomposition and polar projection for 3x3 matrices.
pub mod svd;

pub use mat6::{Mat6F64, Vec6F64};
pub use svd::{orthogonality_error, polar_rotation, svd3, LinalgError, Svd3};
