//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn source() -> PathBuf {
        "src".into()
    }

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn theme() -> Option<PathBuf> {
        None
    }
}
