//! Configuration module for QuickBackup
//!
//! This module provides configuration management including:
//! - config directory resolution
//! - user settings persistence (KDF cost, temp dir, default file name)

pub mod paths;
pub mod settings;

pub use paths::QuickBackupPaths;
pub use settings::Settings;
