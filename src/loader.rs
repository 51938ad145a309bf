use std::path::Path;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::DatasetConfig;
use crate::dataset::MemoryDataset;
use crate::entry::WordEntry;
use crate::error::DatasetError;
use crate::normalize::Normalizer;

/// Read the whole word list once and index it for searching.
pub async fn load_dataset(
    config: &DatasetConfig,
    normalizer: Arc<dyn Normalizer>,
) -> Result<MemoryDataset, DatasetError> {
    let rows = load_rows(config).await?;
    tracing::info!(path = %config.path.display(), rows = rows.len(), "dictionary loaded");
    Ok(MemoryDataset::new(rows, normalizer))
}

pub async fn load_rows(config: &DatasetConfig) -> Result<Vec<WordEntry>, DatasetError> {
    if is_json(&config.path) {
        load_json(&config.path).await
    } else {
        load_sqlite(config).await
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

async fn load_json(path: &Path) -> Result<Vec<WordEntry>, DatasetError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DatasetError::unavailable(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| DatasetError::unavailable(path, e))
}

async fn load_sqlite(config: &DatasetConfig) -> Result<Vec<WordEntry>, DatasetError> {
    let path = config.path.as_path();
    for ident in [&config.table, &config.term_column, &config.translation_column] {
        if !is_identifier(ident) {
            return Err(DatasetError::InvalidIdentifier(ident.clone()));
        }
    }
    if !path.is_file() {
        return Err(DatasetError::unavailable(path, "file not found"));
    }

    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| DatasetError::unavailable(path, e))?;

    // CAST keeps numeric cells decodable as text; NULL stays NULL.
    let sql = format!(
        r#"SELECT CAST("{}" AS TEXT), CAST("{}" AS TEXT) FROM "{}""#,
        config.term_column, config.translation_column, config.table
    );
    tracing::debug!(%sql, "reading dictionary table");
    let result = sqlx::query_as::<_, (Option<String>, Option<String>)>(&sql)
        .fetch_all(&pool)
        .await;
    pool.close().await;

    let rows = result.map_err(|e| DatasetError::unavailable(path, e))?;
    Ok(rows
        .into_iter()
        .map(|(term, translation)| {
            WordEntry::new(term.unwrap_or_default(), translation.unwrap_or_default())
        })
        .collect())
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
