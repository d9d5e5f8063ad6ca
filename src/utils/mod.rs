pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use filename::default_export_filename;
pub use logging::init_logging;
pub use progress::ProgressReporter;
