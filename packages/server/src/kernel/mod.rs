//! Kernel module - infrastructure adapters and dependency wiring.

pub mod clock;
pub mod deps;
pub mod logging;
pub mod postgres;
pub mod server_kernel;
pub mod store;
pub mod test_dependencies;
pub mod traits;

pub use clock::SystemClock;
pub use deps::ServerDeps;
pub use logging::TracingLogger;
pub use postgres::{PgRecord, PgStore};
pub use server_kernel::ServerKernel;
pub use store::{BaseStore, StoreFault};
pub use test_dependencies::TestDependencies;
pub use traits::*;
