// Domain models: samples, session state, footprint report

mod report;
mod sample;
mod session;

pub use report::FootprintReport;
pub use sample::{Sample, SampleLog, Utilization};
pub use session::SessionState;
