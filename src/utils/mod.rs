//! Small filesystem helpers.

use anyhow::{Context, Result};
use std::path::Path;

/// Create a directory (and parents) if it does not exist yet.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_nested_path() {
        let base = std::env::temp_dir().join("renovar-test-ensure-dir");
        let nested = base.join("a/b");
        let _ = std::fs::remove_dir_all(&base);

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Idempotent on an existing directory
        ensure_dir(&nested).unwrap();

        let _ = std::fs::remove_dir_all(&base);
    }
}
