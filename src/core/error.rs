use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowkitError {
    #[error("Walking templates: {0}")]
    BundleEnumeration(String),
    #[error("Reading bundled template {path}: {reason}")]
    ContentRead { path: String, reason: String },
    #[error("Creating directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Creating target directory {}: {source}", path.display())]
    TargetRootCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "Templates {first} and {second} both install to {}",
        destination.display()
    )]
    DestinationCollision {
        destination: PathBuf,
        first: String,
        second: String,
    },
    #[error("directory does not exist: {}", .0.display())]
    TargetMissing(PathBuf),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}
