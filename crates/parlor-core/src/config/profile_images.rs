//! Profile image pipeline configuration.

use serde::{Deserialize, Serialize};

/// Where profile images live and how uploads are bounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileImagesConfig {
    /// Root of the `original`/`active`/`archive` tree.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Number of uploads processed at the same time.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

impl Default for ProfileImagesConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
        }
    }
}

fn default_root_dir() -> String {
    "./data/images/profile".to_string()
}

fn default_max_upload_bytes() -> usize {
    1_572_864
}

fn default_max_concurrent_jobs() -> usize {
    4
}
