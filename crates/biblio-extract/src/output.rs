//! Writing rendered tables to the output directory
//!
//! All tables are staged as `<name>.csv.tmp` and verified first. Previous
//! outputs are then moved aside to `<name>.csv.bak` while the staged files
//! are renamed into place; if any step fails the backups are restored, so
//! the directory holds either every new table or the old set.

use crate::error::Result;
use crate::normalize::RenderedTable;
use biblio_common::checksum::{compute_file_checksum, sha256_hex};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A table on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub name: &'static str,
    pub path: PathBuf,
    pub rows: usize,
    pub sha256: String,
}

pub fn table_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.csv", name))
}

fn staging_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.csv.tmp", name))
}

fn backup_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.csv.bak", name))
}

/// A table moved into place, with the previous file if there was one
struct Replaced {
    target: PathBuf,
    backup: Option<PathBuf>,
}

/// Write every table, replacing previous outputs only if all writes succeed
pub fn write_tables(output_dir: &Path, tables: &[RenderedTable]) -> Result<Vec<WrittenTable>> {
    fs::create_dir_all(output_dir)?;
    info!("Output directory: {}", output_dir.display());

    check_targets(output_dir, tables)?;

    let mut staged = Vec::with_capacity(tables.len());
    let mut digests = Vec::with_capacity(tables.len());
    for table in tables {
        let tmp = staging_path(output_dir, table.name);
        staged.push(tmp.clone());

        match stage(&tmp, table) {
            Ok(sha256) => digests.push(sha256),
            Err(err) => {
                discard(&staged);
                return Err(err);
            },
        }
    }

    let mut replaced: Vec<Replaced> = Vec::with_capacity(tables.len());
    for (table, tmp) in tables.iter().zip(&staged) {
        let target = table_path(output_dir, table.name);
        let backup = backup_path(output_dir, table.name);

        match swap_in(tmp, &target, &backup) {
            Ok(backup) => replaced.push(Replaced { target, backup }),
            Err(err) => {
                warn!(
                    table = table.name,
                    error = %err,
                    "Replacing table failed, restoring previous outputs"
                );
                roll_back(&replaced);
                discard(&staged);
                return Err(err.into());
            },
        }
    }

    for backup in replaced.iter().filter_map(|r| r.backup.as_ref()) {
        let _ = fs::remove_file(backup);
    }

    let written = tables
        .iter()
        .zip(replaced)
        .zip(digests)
        .map(|((table, replaced), sha256)| {
            debug!(
                table = table.name,
                rows = table.rows,
                path = %replaced.target.display(),
                "Wrote table"
            );
            WrittenTable {
                name: table.name,
                path: replaced.target,
                rows: table.rows,
                sha256,
            }
        })
        .collect();

    Ok(written)
}

/// Every target must be a regular file or absent
fn check_targets(output_dir: &Path, tables: &[RenderedTable]) -> Result<()> {
    for table in tables {
        let path = table_path(output_dir, table.name);
        match fs::symlink_metadata(&path) {
            Ok(meta) if !meta.is_file() => {
                return Err(io::Error::other(format!(
                    "{} exists and is not a regular file",
                    path.display()
                ))
                .into());
            },
            Ok(_) => {},
            Err(err) if err.kind() == io::ErrorKind::NotFound => {},
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Write a staging file and read it back; returns its SHA-256
fn stage(tmp: &Path, table: &RenderedTable) -> Result<String> {
    fs::write(tmp, &table.bytes)?;

    let expected = sha256_hex(&table.bytes);
    let on_disk = compute_file_checksum(tmp)?;
    if on_disk != expected {
        return Err(io::Error::other(format!(
            "staged {} does not match rendered table (sha256 {} != {})",
            tmp.display(),
            on_disk,
            expected
        ))
        .into());
    }

    Ok(expected)
}

/// Move `target` aside to `backup` (if present) and `tmp` into its place
fn swap_in(tmp: &Path, target: &Path, backup: &Path) -> io::Result<Option<PathBuf>> {
    let backup = if target.exists() {
        fs::rename(target, backup)?;
        Some(backup.to_path_buf())
    } else {
        None
    };

    if let Err(err) = fs::rename(tmp, target) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, target);
        }
        return Err(err);
    }

    Ok(backup)
}

fn roll_back(replaced: &[Replaced]) {
    for entry in replaced.iter().rev() {
        let restored = match &entry.backup {
            Some(backup) => fs::rename(backup, &entry.target),
            None => fs::remove_file(&entry.target),
        };
        if let Err(err) = restored {
            warn!(
                path = %entry.target.display(),
                error = %err,
                "Could not restore previous output"
            );
        }
    }
}

fn discard(staged: &[PathBuf]) {
    for path in staged {
        let _ = fs::remove_file(path);
    }
}
