use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix appended to a caption file when its original is preserved
pub const BACKUP_SUFFIX: &str = ".bak";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory, sorted by path.
    /// When `prefix` is given, only file names starting with it are kept.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str, prefix: Option<&str>) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext_matches = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext));
            let prefix_matches = match prefix {
                Some(prefix) => path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(prefix)),
                None => true,
            };

            if ext_matches && prefix_matches {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to)
            .with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;

        Ok(())
    }

    // @returns: `<file>.bak` next to the original
    pub fn backup_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut name = path.as_ref().as_os_str().to_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Copy a file to its backup path, overwriting any previous backup
    pub fn create_backup<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let backup = Self::backup_path(&path);
        Self::copy_file(&path, &backup)?;
        Ok(backup)
    }
}
