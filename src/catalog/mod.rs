pub mod import;
pub mod storage;
pub mod types;

pub use import::{import_csv, import_file, ImportSummary};
pub use storage::{get_catalog_path, load_catalog, save_catalog};
pub use types::{Candidate, CandidateInput, CandidatePatch, Catalog, RawValue};
