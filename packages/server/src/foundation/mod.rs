//! Foundation layer: the record contract, the validation engine, fault
//! classification and the generic CRUD service built on them.

pub mod error;
pub mod record;
pub mod service;
pub mod validation;

pub use error::{FaultTier, RecordFault, ServiceError, Severity};
pub use record::{Audit, Field, Record, DEFAULT_TEXT_MAX_LEN};
pub use service::FoundationService;
pub use validation::{ValidationReport, RECENCY_WINDOW_SECONDS};
