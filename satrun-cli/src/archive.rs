//! Run Directory Archiving
//!
//! Moves every configuration directory under `<runs_dir>/archive`. The archive
//! directory must not exist beforehand; nothing is merged or overwritten.

use anyhow::{Context, bail};
use satrun_stats::Study;
use std::path::PathBuf;

/// Name of the archive directory inside the runs directory
pub const ARCHIVE_DIR: &str = "archive";

/// One completed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMove {
    /// Configuration directory before the move
    pub from: PathBuf,
    /// Location inside the archive
    pub to: PathBuf,
}

impl std::fmt::Display for ArchiveMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "moved {} to {}", self.from.display(), self.to.display())
    }
}

/// Archive every configuration directory of the study.
///
/// `on_move` is called after each rename, in configuration order. The first
/// missing source stops the pass; earlier moves are not undone.
pub fn archive_study(
    study: &Study,
    mut on_move: impl FnMut(&ArchiveMove),
) -> anyhow::Result<Vec<ArchiveMove>> {
    let archive = study.runs_dir().join(ARCHIVE_DIR);
    if archive.exists() {
        bail!("archive directory {} already exists", archive.display());
    }
    std::fs::create_dir(&archive)
        .with_context(|| format!("cannot create {}", archive.display()))?;

    let mut moves = Vec::with_capacity(study.configurations().len());
    for configuration in study.configurations() {
        let from = study.configuration_dir(configuration);
        let to = archive.join(configuration.label());
        if !from.is_dir() {
            bail!("configuration directory {} does not exist", from.display());
        }
        std::fs::rename(&from, &to)
            .with_context(|| format!("cannot move {} to {}", from.display(), to.display()))?;

        let moved = ArchiveMove { from, to };
        tracing::info!(configuration = configuration.label(), "{}", moved);
        on_move(&moved);
        moves.push(moved);
    }
    Ok(moves)
}
