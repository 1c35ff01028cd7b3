use std::io;
use std::path::{Path, PathBuf};

pub const UPLOAD_SUBDIR: &str = "uploads/paiement";

/// Root the upload directory hangs off: this crate's own directory.
pub fn default_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

pub fn upload_dir(root: &Path) -> PathBuf {
    root.join(UPLOAD_SUBDIR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyPresent,
}

/// Makes sure `<root>/uploads/paiement` exists, creating missing parents.
/// I/O failures are returned untouched; startup treats them as fatal.
pub fn ensure_upload_dir(root: &Path) -> io::Result<BootstrapOutcome> {
    let dir = upload_dir(root);

    if dir.exists() {
        tracing::info!("Upload directory already present: {}", dir.display());
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    std::fs::create_dir_all(&dir)?;
    tracing::info!("Created upload directory: {}", dir.display());
    Ok(BootstrapOutcome::Created)
}
