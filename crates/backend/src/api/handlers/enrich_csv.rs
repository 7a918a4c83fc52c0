use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use contracts::usecases::enrich_csv::{FileListResponse, ProcessingStatus};
use std::path::{Path, PathBuf};

use crate::shared::config;
use crate::usecases::u101_enrich_csv::EnrichExecutor;

type ApiError = (StatusCode, Json<ProcessingStatus>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ProcessingStatus::error(message)))
}

/// POST /api/enrich-csv
///
/// Accepts one CSV file as multipart form data, runs the enrichment batch and
/// returns the enriched table as a CSV attachment. Rejects non-CSV filenames
/// before any processing starts.
pub async fn process_csv(mut multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let config = config::global()
        .ok_or_else(|| error(StatusCode::INTERNAL_SERVER_ERROR, "Configuration not loaded"))?;

    let (filename, data) = read_upload(&mut multipart).await?;

    if !filename.to_lowercase().ends_with(".csv") {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Only CSV files are allowed",
        ));
    }

    let storage = Path::new(&config.storage.path);
    let input_path = save_upload(storage, &filename, &data)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to save upload: {}", e)))?;

    tracing::info!("Processing CSV file: {}", filename);

    let executor = EnrichExecutor::from_config(&config.openai);
    let output_path = executor.process_file(&input_path).await.map_err(|e| {
        tracing::error!("Error processing CSV: {}", e);
        error(StatusCode::INTERNAL_SERVER_ERROR, format!("Processing error: {}", e))
    })?;

    let body = tokio::fs::read(&output_path).await.map_err(|e| {
        error(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to read output: {}", e))
    })?;

    let download_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "enriched.csv".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download_name),
            ),
        ],
        body,
    ))
}

/// GET /api/files — CSV files currently in storage.
pub async fn list_files() -> Result<Json<FileListResponse>, ApiError> {
    let config = config::global()
        .ok_or_else(|| error(StatusCode::INTERNAL_SERVER_ERROR, "Configuration not loaded"))?;

    let entries = std::fs::read_dir(&config.storage.path).map_err(|e| {
        tracing::error!("Error listing files: {}", e);
        error(StatusCode::INTERNAL_SERVER_ERROR, "Error listing files")
    })?;

    let mut files: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.to_lowercase().ends_with(".csv"))
        .collect();
    files.sort();

    Ok(Json(FileListResponse { files }))
}

/// Pull the first file field out of the multipart body.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Invalid multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Failed to read upload: {}", e)))?;

        return Ok((filename, data.to_vec()));
    }

    Err(error(StatusCode::BAD_REQUEST, "No file field in request"))
}

fn save_upload(storage: &Path, filename: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(storage)?;

    // Keep only the final path component of the client-supplied name
    let safe_name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.csv".to_string());

    let input_path = storage.join(format!("input_{}", safe_name));
    std::fs::write(&input_path, data)?;
    Ok(input_path)
}
