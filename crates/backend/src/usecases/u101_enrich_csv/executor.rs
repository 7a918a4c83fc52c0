use super::{assembler, interpreter, prompt};
use crate::shared::config::OpenAiConfig;
use crate::shared::llm::{LlmProvider, OpenAiProvider};
use anyhow::Result;
use contracts::domain::output_record::OutputRecord;
use contracts::domain::product_row::InputRow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Executor for the CSV enrichment usecase: per-row orchestration plus the
/// whole-file driver.
pub struct EnrichExecutor {
    provider: Arc<dyn LlmProvider>,
    request_timeout: Duration,
    request_delay: Duration,
}

impl EnrichExecutor {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        request_timeout: Duration,
        request_delay: Duration,
    ) -> Self {
        Self {
            provider,
            request_timeout,
            request_delay,
        }
    }

    pub fn from_config(config: &OpenAiConfig) -> Self {
        let provider = OpenAiProvider::new(
            config.api_key.clone(),
            config.model.clone(),
            config.temperature,
            config.max_tokens,
        );
        Self::new(
            Arc::new(provider),
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_millis(config.request_delay_ms),
        )
    }

    /// Enrich one row. Infallible at this boundary: any failure along the
    /// model -> interpreter -> assembler path (including a timeout) produces
    /// the deterministic fallback record for this row only.
    pub async fn enrich_row(&self, row: &InputRow, today: &str) -> OutputRecord {
        let row = assembler::clean_row(row);

        match self.try_enrich(&row, today).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    "{} enrichment failed for SKU {}, using fallback: {}",
                    self.provider.provider_name(),
                    row.sku,
                    e
                );
                assembler::fallback_record(&row, today)
            }
        }
    }

    async fn try_enrich(&self, row: &InputRow, today: &str) -> Result<OutputRecord> {
        let messages = prompt::build_messages(row, today);

        let response = tokio::time::timeout(
            self.request_timeout,
            self.provider.chat_completion(messages),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "model call timed out after {}s",
                self.request_timeout.as_secs()
            )
        })??;

        let enrichment = interpreter::interpret(&response.content);
        Ok(assembler::assemble(row, &enrichment, today))
    }

    /// Process a whole input table: read all rows, enrich each independently
    /// in input order, write `enriched_<name>` next to the input file.
    ///
    /// Propagates (does not fallback) when the table cannot be read, has no
    /// data rows, or the output cannot be written. The output is written to a
    /// temporary file and renamed, so an aborted batch leaves nothing behind.
    pub async fn process_file(&self, input_path: &Path) -> Result<PathBuf> {
        tracing::info!("Starting processing of {}", input_path.display());

        let csv_text = std::fs::read_to_string(input_path)?;
        let rows = read_input_rows(&csv_text)?;
        let total = rows.len();
        tracing::info!("Loaded CSV with {} data rows", total);

        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let mut records = Vec::with_capacity(total);

        for (index, row) in rows.iter().enumerate() {
            records.push(self.enrich_row(row, &today).await);
            tracing::debug!("Enriched row {}/{}", index + 1, total);

            // Fixed pause between model calls to respect backend rate limits
            if index + 1 < total && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let output_path = output_path_for(input_path);
        write_output(&output_path, &records)?;
        tracing::info!("Saved enriched CSV to {}", output_path.display());

        Ok(output_path)
    }
}

/// Parse the semicolon-delimited input table into rows.
///
/// Headers are matched case-insensitively; missing fields normalize to empty
/// strings (quantity to 0). Malformed records are skipped with a warning.
/// Zero data rows is an error, not an empty success.
fn read_input_rows(csv_text: &str) -> Result<Vec<InputRow>> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| anyhow::anyhow!("Failed to read CSV headers: {}", e))?
        .clone();

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV record: {}", e);
                continue;
            }
        };

        // Get field by header name (case-insensitive); absent => empty
        let get_field = |name: &str| -> String {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        rows.push(InputRow {
            referencia: get_field("referencia"),
            descricao: get_field("descricao"),
            quantidade_estoque: get_field("quantidade_estoque").parse().unwrap_or(0),
            preco_venda: get_field("preco_venda"),
            preco_custo: get_field("preco_custo"),
            sku: get_field("sku"),
            ean: get_field("ean"),
        });
    }

    if rows.is_empty() {
        anyhow::bail!("Input CSV contains no data rows");
    }

    Ok(rows)
}

fn output_path_for(input_path: &Path) -> PathBuf {
    let name = input_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output.csv".to_string());
    let dir = input_path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("enriched_{}", name))
}

/// Write all records with the fixed column order, via temp file + rename so
/// no partial output file is ever observable.
fn write_output(output_path: &Path, records: &[OutputRecord]) -> Result<()> {
    let dir = output_path.parent().unwrap_or_else(|| Path::new("."));
    let tmp_path = dir.join(format!(".enrich_{}.tmp", uuid::Uuid::new_v4()));

    let result = (|| -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_path(&tmp_path)?;

        writer.write_record(OutputRecord::COLUMNS)?;
        for record in records {
            writer.write_record(record.to_field_vec())?;
        }
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    std::fs::rename(&tmp_path, output_path)?;
    Ok(())
}
