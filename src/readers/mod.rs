pub mod hospital_reader;
pub mod source;
pub mod state_codes;
pub mod state_reader;

pub use hospital_reader::HospitalReader;
pub use source::{decode_text, DataSource};
pub use state_codes::{state_code, STATE_CODES};
pub use state_reader::{StateReader, UnmappedPolicy};
