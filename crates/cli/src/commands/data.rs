//! Seeding, backup export and restore of the data file.

use std::path::{Path, PathBuf};

use chef_em_casa_core::Document;
use chef_em_casa_server::db::FileStore;
use chrono::NaiveDate;
use tracing::info;

/// `chefemcasa-backup-YYYY-MM-DD.json`
fn backup_file_name(date: NaiveDate) -> String {
    format!("chefemcasa-backup-{}.json", date.format("%Y-%m-%d"))
}

async fn write_document(path: &Path, document: &Document) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, document.to_json()?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Create the data file with the starter catalog.
///
/// An existing file is left alone unless `force` is set. A corrupt one is
/// moved aside and reseeded, as the server would.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub async fn seed(data_file: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if force {
        write_document(data_file, &Document::seeded()).await?;
        info!(path = %data_file.display(), "Data file replaced with the starter catalog");
        return Ok(());
    }

    let store = FileStore::open(data_file).await?;
    let (users, recipes) = store
        .read(|doc| (doc.users().len(), doc.recipes().len()))
        .await?;
    info!(path = %data_file.display(), users, recipes, "Data file ready");
    Ok(())
}

/// Write a dated copy of the data file into `out_dir`.
///
/// # Errors
///
/// Returns an error if the data file is missing or not a valid document.
pub async fn export(data_file: &Path, out_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(data_file)
        .await
        .map_err(|e| format!("cannot read {}: {e}", data_file.display()))?;
    let document =
        Document::parse(&raw).map_err(|e| format!("{} is not a valid data file: {e}", data_file.display()))?;

    let target = out_dir.join(backup_file_name(chrono::Local::now().date_naive()));
    write_document(&target, &document).await?;

    info!(
        path = %target.display(),
        users = document.users().len(),
        recipes = document.recipes().len(),
        "Backup written"
    );
    Ok(target)
}

/// Replace the data file with the contents of `backup`.
///
/// # Errors
///
/// Returns an error, leaving the data file untouched, if `backup` does not
/// parse as a document.
pub async fn import(data_file: &Path, backup: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(backup)
        .await
        .map_err(|e| format!("cannot read {}: {e}", backup.display()))?;
    let document = Document::parse(&raw)
        .map_err(|e| format!("{} is not a ChefEmCasa backup: {e}", backup.display()))?;

    write_document(data_file, &document).await?;
    info!(
        from = %backup.display(),
        path = %data_file.display(),
        users = document.users().len(),
        recipes = document.recipes().len(),
        "Backup restored"
    );
    Ok(())
}
