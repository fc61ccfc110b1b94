use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info, success, warning};
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally zipped.
    /// Returns the written path, or `None` when the user declined to overwrite.
    pub fn backup(db_path: &str, dest_file: &Path, compress: bool) -> AppResult<Option<PathBuf>> {
        let src = Path::new(db_path);

        if !src.exists() {
            return Err(AppError::not_found("Database", src.display()));
        }

        if let Some(parent) = dest_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let question = format!("The file '{}' already exists.", dest_file.display());
        if dest_file.exists() && !confirm(question)? {
            warning("Backup cancelled by user.");
            return Ok(None);
        }

        // Flush the WAL into the main file so the copy is self-contained
        {
            let pool = DbPool::new(db_path)?;
            pool.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        }

        fs::copy(src, dest_file)?;
        success(format!("Backup created: {}", dest_file.display()));

        let final_path = if compress {
            let compressed = compress_backup(dest_file)?;
            if let Err(e) = fs::remove_file(dest_file) {
                warning(format!("Failed to remove uncompressed backup: {}", e));
            }
            compressed
        } else {
            dest_file.to_path_buf()
        };

        let pool = DbPool::new(db_path)?;
        ttlog(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        Ok(Some(final_path))
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "attendlog.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    info(format!("Compressed: {}", zip_path.display()));

    Ok(zip_path)
}
