pub mod catalog;
pub mod cycle;
pub mod payload;
pub mod router;
pub mod station;

pub use catalog::MeasurementCatalog;
pub use cycle::{run_cycle, CycleError, CycleSummary};
pub use payload::{HostData, MeasurementMap, PayloadBuilder, ReportPayload};
pub use station::Station;
