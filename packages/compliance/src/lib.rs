#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Automated compliance evaluation for new business applications.
//!
//! Given a location and a business category, runs three independent
//! checks against a caller-supplied snapshot:
//!
//! 1. **Zoning**: the point must fall in a zone whose type the category
//!    is allowed in.
//! 2. **Hazards**: the point must not fall in any hazard zone.
//! 3. **Proximity**: no approved business of the same category may be
//!    closer than the category's minimum distance.
//!
//! The outcomes are fused into an initial [`ApplicationStatus`]. The
//! evaluator never approves anything; a passing application lands in
//! `PENDING` for human review.
//!
//! [`ApplicationStatus`]: permit_compliance_models::ApplicationStatus

pub mod evaluator;
pub mod proximity;

pub use evaluator::{ComplianceEvaluator, EvaluatorConfig, fuse_status};
pub use proximity::find_proximity_violations;

use thiserror::Error;

/// Errors from evaluating a raw application request.
#[derive(Debug, Error)]
pub enum ComplianceError {
    /// The request names a category that is not in the snapshot.
    #[error("Unknown business category: {category_id}")]
    UnknownCategory {
        /// The requested category id.
        category_id: String,
    },

    /// The request location is non-finite or out of range.
    #[error("Invalid location: lat={lat}, lon={lon}")]
    InvalidLocation {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
}
