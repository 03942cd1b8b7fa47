//! Entity types - contract records and their annotation-layer dependents

pub mod annotation;
pub mod contract;
pub mod fiscal;
pub mod links;

pub use annotation::{AnnotationRecord, STATUS_PALETTE};
pub use contract::ContractRecord;
pub use fiscal::FiscalAssignment;
pub use links::LinksRecord;
