//! The single persisted artifact: the best trained policy

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use proto::{Artifact, CodecError, ARTIFACT_VERSION};

use crate::PolicyNet;

/// `Artifact::kind` for a postcard-encoded [`PolicyNet`]
pub const POLICY_KIND: &str = "policy-net";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactSaveError {
    #[error("failed to encode policy: {0}")]
    Encode(#[from] postcard::Error),
    #[error("failed to encode artifact: {0}")]
    Codec(#[from] CodecError),
    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("no trained model at {0}")]
    Missing(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("trained model at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("artifact holds a {found:?}, expected {:?}", POLICY_KIND)]
    WrongKind { found: String },
    #[error("artifact version {found} is not supported (expected {})", ARTIFACT_VERSION)]
    UnsupportedVersion { found: u16 },
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `net` to `path`, replacing any previous artifact wholesale
pub fn save_best(path: &Path, net: &PolicyNet) -> Result<(), ArtifactSaveError> {
    let payload = postcard::to_allocvec(net)?;
    let bytes = Artifact::new(POLICY_KIND, payload).to_bytes()?;

    let io_err = |source| ArtifactSaveError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let temp = temp_path(path);
    fs::write(&temp, &bytes).map_err(io_err)?;
    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(io_err(err));
    }
    info!("Saved trained model to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Read the policy saved by [`save_best`]
pub fn load_best(path: &Path) -> Result<PolicyNet, ArtifactLoadError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ArtifactLoadError::Missing(path.to_path_buf()),
        _ => ArtifactLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let corrupt = |reason: String| ArtifactLoadError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let artifact = Artifact::from_bytes(&bytes).map_err(|e| corrupt(e.to_string()))?;
    if artifact.version != ARTIFACT_VERSION {
        return Err(ArtifactLoadError::UnsupportedVersion {
            found: artifact.version,
        });
    }
    if artifact.kind != POLICY_KIND {
        return Err(ArtifactLoadError::WrongKind {
            found: artifact.kind,
        });
    }
    let net: PolicyNet =
        postcard::from_bytes(&artifact.payload).map_err(|e| corrupt(e.to_string()))?;
    if !net.is_well_formed() {
        return Err(corrupt("layer shapes do not map 3 inputs to 3 actions".into()));
    }
    Ok(net)
}
