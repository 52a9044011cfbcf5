use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::export::ExportUnit;

/// File name of the optional manifest written next to the exported files
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub created_at: String,
    pub generator: String,
    pub source: Option<String>,
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub filename: String,
    pub size_bytes: u64,
    pub first_chapter: usize,
    pub last_chapter: usize,
    pub sha256: String,
}

impl ManifestEntry {
    fn from_unit(unit: &ExportUnit) -> Self {
        Self {
            filename: unit.filename.clone(),
            size_bytes: unit.content.len() as u64,
            first_chapter: unit.first_chapter,
            last_chapter: unit.last_chapter,
            sha256: hex::encode(Sha256::digest(unit.content.as_bytes())),
        }
    }
}

/// What a write pass produced
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
}

/// Writes export units into an output directory
pub struct UnitWriter {
    dir: PathBuf,
    overwrite: bool,
    manifest: bool,
    source: Option<String>,
}

impl UnitWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: true,
            manifest: false,
            source: None,
        }
    }

    /// Replace files that already exist (default: true)
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Also write a `manifest.json` describing the files (default: false)
    pub fn manifest(mut self, manifest: bool) -> Self {
        self.manifest = manifest;
        self
    }

    /// Source document name recorded in the manifest
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every unit, stopping at the first failure
    ///
    /// Units written before a failure stay on disk; nothing is recomputed.
    pub fn write(&self, units: &[ExportUnit]) -> Result<WriteReport> {
        fs::create_dir_all(&self.dir).context(format!(
            "Failed to create output directory: {}",
            self.dir.display()
        ))?;

        let mut report = WriteReport::default();
        for (i, unit) in units.iter().enumerate() {
            let path = self.dir.join(&unit.filename);
            let written = if self.overwrite {
                fs::write(&path, unit.content.as_bytes())
            } else {
                // create_new fails atomically if the file appeared meanwhile
                match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                    Ok(mut file) => file.write_all(unit.content.as_bytes()),
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => bail!(
                        "Refusing to overwrite existing file {} (unit {} of {})",
                        path.display(),
                        i + 1,
                        units.len()
                    ),
                    Err(e) => Err(e),
                }
            };
            written.context(format!(
                "Failed to write unit {} of {}: {}",
                i + 1,
                units.len(),
                path.display()
            ))?;
            debug!(path = %path.display(), bytes = unit.content.len(), "unit written");
            report.written.push(path);
        }

        if self.manifest {
            report.manifest = Some(self.write_manifest(units)?);
        }

        info!(
            files = report.written.len(),
            dir = %self.dir.display(),
            "export written"
        );
        Ok(report)
    }

    fn write_manifest(&self, units: &[ExportUnit]) -> Result<PathBuf> {
        let manifest = Manifest {
            version: "1.0.0".to_string(),
            created_at: Utc::now().to_rfc3339(),
            generator: format!("chaptersplit v{}", env!("CARGO_PKG_VERSION")),
            source: self.source.clone(),
            files: units.iter().map(ManifestEntry::from_unit).collect(),
        };

        let path = self.dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&path, json).context(format!("Failed to write manifest: {}", path.display()))?;
        Ok(path)
    }
}
