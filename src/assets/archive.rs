//! Per-entity zip bundles.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::AssetError;

fn archive_error(archive: &Path, message: impl ToString) -> AssetError {
    AssetError::Archive {
        path: archive.to_path_buf(),
        message: message.to_string(),
    }
}

fn entry_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Zips every file under `folder` (except `archive` itself) into
/// `archive`, then re-opens it and checks the entry count.
///
/// The zip is written next to its final name and renamed into place, so
/// an interrupted run never leaves a truncated archive behind.
///
/// # Errors
///
/// Returns [`AssetError::Archive`] if any file cannot be read, the archive
/// cannot be written, or the re-opened archive does not hold every file.
pub fn bundle(folder: &Path, archive: &Path) -> Result<usize, AssetError> {
    let partial = archive.with_extension("zip.partial");
    let file = File::create(&partial).map_err(|e| archive_error(archive, e))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0usize;
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = entry.map_err(|e| archive_error(archive, e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path == archive || path == partial {
            continue;
        }
        let rel = path
            .strip_prefix(folder)
            .map_err(|e| archive_error(archive, e))?;
        writer
            .start_file(entry_name(rel), options)
            .map_err(|e| archive_error(archive, e))?;
        let mut source = File::open(path).map_err(|e| archive_error(archive, e))?;
        io::copy(&mut source, &mut writer).map_err(|e| archive_error(archive, e))?;
        count += 1;
    }

    let file = writer.finish().map_err(|e| archive_error(archive, e))?;
    file.sync_all().map_err(|e| archive_error(archive, e))?;
    drop(file);
    fs::rename(&partial, archive).map_err(|e| archive_error(archive, e))?;

    let reopened = File::open(archive).map_err(|e| archive_error(archive, e))?;
    let entries = ZipArchive::new(reopened)
        .map_err(|e| archive_error(archive, e))?
        .len();
    if entries != count {
        return Err(archive_error(
            archive,
            format!("expected {count} entries, found {entries}"),
        ));
    }
    Ok(count)
}

/// Deletes everything in `folder` except `keep`.
///
/// # Errors
///
/// Returns the first I/O error hit while deleting.
pub fn remove_loose(folder: &Path, keep: &Path) -> io::Result<()> {
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if path == keep {
            continue;
        }
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
