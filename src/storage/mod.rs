//! Filesystem helpers shared by the backup and restore pipelines
//!
//! - `file_io`: atomic writes (temp file + rename)
//! - `temp`: the guarded temporary plaintext archive

pub mod file_io;
pub mod temp;

pub use file_io::write_atomic;
pub use temp::TempArchive;
