//! ZIP archive layer
//!
//! The archive is the plaintext intermediate of both pipelines: an ordered
//! list of (name, content) entries where the name is the path string the
//! walk produced.
//!
//! - `archiver`: input selection → ZIP container
//! - `extractor`: ZIP container → files under a destination directory

pub mod archiver;
pub mod extractor;

pub use archiver::{build, build_file, check_inputs, collect_files, ArchiveSummary};
pub use extractor::{extract, extract_file, resolve_entry_path, ExtractSummary};
