use crate::shared::text::{
    normalize_price, strip_leading_reference, to_single_line, truncate_chars,
};
use contracts::domain::output_record::OutputRecord;
use contracts::domain::product_row::{EnrichmentResult, InputRow};

/// Defaults used whenever the AI field is absent or empty.
pub const DEFAULT_CATEGORY: &str = "Peças Automotivas";
pub const DEFAULT_WEIGHT: &str = "0.10";
pub const DEFAULT_HEIGHT: &str = "5.0";
pub const DEFAULT_LENGTH: &str = "10.0";
pub const DEFAULT_WIDTH: &str = "5.0";
pub const DEFAULT_NCM: &str = "8714.19.00";
const DEFAULT_NCM_DESCRIPTION: &str = "Partes e acessórios de motocicletas";

/// Fixed metadata identical on every record.
const MANUFACTURER: &str = "Honda";
const AUTHENTICITY_SUFFIX: &str = " Honda Genuíno";
const UNIT_TYPE: &str = "un";
const ORIGIN_CODE: &str = "0 - Nacional, exceto as indicadas nos códigos 3, 4, 5 e 8";
const ORIGIN_TYPE: &str = "0";
const ORIGIN_DETAIL: &str = "Reseller";
const ADDITIONAL_DESCRIPTION_1: &str = "incluir texto";

const MAX_PRODUCT_NAME_CHARS: usize = 60;

/// Trims every field and normalizes both prices. Run once before the row
/// enters the pipeline so the prompt, the assembler and the fallback all see
/// the same canonical values.
pub fn clean_row(row: &InputRow) -> InputRow {
    InputRow {
        referencia: row.referencia.trim().to_string(),
        descricao: row.descricao.trim().to_string(),
        quantidade_estoque: row.quantidade_estoque,
        preco_venda: normalize_price(&row.preco_venda),
        preco_custo: normalize_price(&row.preco_custo),
        sku: row.sku.trim().to_string(),
        ean: row.ean.trim().to_string(),
    }
}

/// Merges the original row with the AI fields into the fixed output schema.
///
/// Pure: given the same row, enrichment and date this always produces the
/// same record, and every field of the result is populated. AI values win
/// when present and non-empty; otherwise the documented default fills in.
pub fn assemble(row: &InputRow, enrichment: &EnrichmentResult, today: &str) -> OutputRecord {
    let ncm = pick(enrichment.ncm.as_deref(), DEFAULT_NCM);
    let preco_custo = normalize_price(&row.preco_custo);

    let descricao_adicional_2 = match non_empty(enrichment.descricao_adicional_2.as_deref()) {
        Some(ai_text) => to_single_line(ai_text),
        None => to_single_line(&default_description_2(row, today)),
    };

    OutputRecord {
        id_produto: row.sku.clone(),
        id_oem: row.referencia.clone(),
        nome_produto_br: product_name(&row.descricao),
        id_fabricante: row.referencia.clone(),
        quantidade_padrao: row.quantidade_estoque.to_string(),
        ean: row.ean.clone(),
        sku: row.sku.clone(),
        nome_categoria: pick(enrichment.nome_categoria.as_deref(), DEFAULT_CATEGORY),
        preco_padrao_brl: normalize_price(&row.preco_venda),
        preco_compra: preco_custo.clone(),
        custo_medio: preco_custo,
        peso: pick(enrichment.peso.as_deref(), DEFAULT_WEIGHT),
        descricao_br: format!("{} SKU: LK {}", row.descricao, row.sku),
        descricao_adicional_1: ADDITIONAL_DESCRIPTION_1.to_string(),
        descricao_adicional_2,
        nome_fabricante: MANUFACTURER.to_string(),
        altura: pick(enrichment.altura.as_deref(), DEFAULT_HEIGHT),
        comprimento: pick(enrichment.comprimento.as_deref(), DEFAULT_LENGTH),
        largura: pick(enrichment.largura.as_deref(), DEFAULT_WIDTH),
        campo_adicional_tipo_unidade: UNIT_TYPE.to_string(),
        tipo_unidade: UNIT_TYPE.to_string(),
        campo_adicional_codigo_origem: ORIGIN_CODE.to_string(),
        codigo_origem: ORIGIN_CODE.to_string(),
        campo_adicional_codigo_fabricante: row.referencia.clone(),
        codigo_fabricante: row.referencia.clone(),
        parametro_ncm_br: ncm.clone(),
        ncm: ncm.clone(),
        parametro_origin_type_br: ORIGIN_TYPE.to_string(),
        parametro_origin_detail_br: ORIGIN_DETAIL.to_string(),
        campo_adicional_ncm: ncm,
    }
}

/// The deterministic, network-free path: the record the assembler would
/// produce with an empty enrichment. Cannot fail for any input row.
pub fn fallback_record(row: &InputRow, today: &str) -> OutputRecord {
    assemble(row, &EnrichmentResult::default(), today)
}

/// AI value if present and non-empty, else the default.
fn pick(value: Option<&str>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Cleaned description plus the authenticity suffix, capped at 60 chars.
/// Truncation is silent; for very long descriptions the suffix may be cut.
fn product_name(descricao: &str) -> String {
    let cleaned = strip_leading_reference(descricao);
    let name = format!("{}{}", cleaned, AUTHENTICITY_SUFFIX);
    truncate_chars(&name, MAX_PRODUCT_NAME_CHARS).to_string()
}

/// Single-line "descrição adicional 2" template used when the AI gave none.
fn default_description_2(row: &InputRow, today: &str) -> String {
    let desc_clean = strip_leading_reference(&row.descricao);

    format!(
        "Descrição do Produto: {desc} \
         Aplicação (Compatibilidade de Modelos e Ano): Modelos Honda compatíveis \
         Descrição Técnica: Peça original Honda de alta qualidade \
         Marca: Honda \
         Garantia: 3 meses \
         Data: {today} \
         Conteúdo da Embalagem: 1 UND de {desc} \
         Dimensões em cm (Altura x Comprimento x Largura): {h}x{l}x{w} \
         Peso (kg): {weight} \
         Código SKU: {sku} \
         Código do Fabricante/Referência: {reference} \
         NCM: {ncm} \
         Descrição NCM: {ncm_description} \
         Op: LK",
        desc = desc_clean,
        today = today,
        h = DEFAULT_HEIGHT,
        l = DEFAULT_LENGTH,
        w = DEFAULT_WIDTH,
        weight = DEFAULT_WEIGHT,
        sku = row.sku,
        reference = row.referencia,
        ncm = DEFAULT_NCM,
        ncm_description = DEFAULT_NCM_DESCRIPTION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: &str = "2026-08-30";

    fn sample_row() -> InputRow {
        InputRow {
            referencia: "12345".to_string(),
            descricao: "12345 Parafuso M8 Sextavado".to_string(),
            quantidade_estoque: 100,
            preco_venda: "R$ 9,50".to_string(),
            preco_custo: "R$5,00".to_string(),
            sku: "SKU001".to_string(),
            ean: "7891234567890".to_string(),
        }
    }

    fn full_enrichment() -> EnrichmentResult {
        EnrichmentResult {
            nome_categoria: Some("Parafusos Moto".to_string()),
            peso: Some("0.02".to_string()),
            altura: Some("1.0".to_string()),
            comprimento: Some("2.0".to_string()),
            largura: Some("1.0".to_string()),
            ncm: Some("7318.15.00".to_string()),
            descricao_adicional_2: Some("Linha única do modelo".to_string()),
        }
    }

    #[test]
    fn test_clean_row_trims_and_normalizes() {
        let raw = InputRow {
            referencia: " 12345 ".to_string(),
            descricao: " Parafuso \n".to_string(),
            quantidade_estoque: 7,
            preco_venda: "R$ 9,50".to_string(),
            preco_custo: "abc".to_string(),
            sku: " SKU001 ".to_string(),
            ean: " 789 ".to_string(),
        };
        let cleaned = clean_row(&raw);
        assert_eq!(cleaned.referencia, "12345");
        assert_eq!(cleaned.descricao, "Parafuso");
        assert_eq!(cleaned.preco_venda, "9.50");
        assert_eq!(cleaned.preco_custo, "0.00");
        assert_eq!(cleaned.sku, "SKU001");
        assert_eq!(cleaned.ean, "789");
    }

    #[test]
    fn test_assemble_prefers_ai_values() {
        let record = assemble(&sample_row(), &full_enrichment(), TODAY);
        assert_eq!(record.nome_categoria, "Parafusos Moto");
        assert_eq!(record.peso, "0.02");
        assert_eq!(record.altura, "1.0");
        assert_eq!(record.comprimento, "2.0");
        assert_eq!(record.largura, "1.0");
        assert_eq!(record.ncm, "7318.15.00");
        assert_eq!(record.parametro_ncm_br, "7318.15.00");
        assert_eq!(record.campo_adicional_ncm, "7318.15.00");
        assert_eq!(record.descricao_adicional_2, "Linha única do modelo");
    }

    #[test]
    fn test_assemble_empty_enrichment_uses_defaults() {
        let record = assemble(&sample_row(), &EnrichmentResult::default(), TODAY);
        assert_eq!(record.nome_categoria, DEFAULT_CATEGORY);
        assert_eq!(record.peso, DEFAULT_WEIGHT);
        assert_eq!(record.altura, DEFAULT_HEIGHT);
        assert_eq!(record.comprimento, DEFAULT_LENGTH);
        assert_eq!(record.largura, DEFAULT_WIDTH);
        assert_eq!(record.ncm, DEFAULT_NCM);
        assert!(record.descricao_adicional_2.contains("Data: 2026-08-30"));
        assert!(record.descricao_adicional_2.contains("Parafuso M8 Sextavado"));
    }

    #[test]
    fn test_assemble_blank_ai_value_falls_back() {
        let enrichment = EnrichmentResult {
            nome_categoria: Some("   ".to_string()),
            peso: Some(String::new()),
            ..Default::default()
        };
        let record = assemble(&sample_row(), &enrichment, TODAY);
        assert_eq!(record.nome_categoria, DEFAULT_CATEGORY);
        assert_eq!(record.peso, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_assemble_passthrough_fields() {
        let record = assemble(&sample_row(), &EnrichmentResult::default(), TODAY);
        assert_eq!(record.id_produto, "SKU001");
        assert_eq!(record.id_oem, "12345");
        assert_eq!(record.id_fabricante, "12345");
        assert_eq!(record.codigo_fabricante, "12345");
        assert_eq!(record.quantidade_padrao, "100");
        assert_eq!(record.preco_padrao_brl, "9.50");
        assert_eq!(record.preco_compra, "5.00");
        assert_eq!(record.custo_medio, "5.00");
        assert_eq!(record.descricao_br, "12345 Parafuso M8 Sextavado SKU: LK SKU001");
        assert_eq!(record.descricao_adicional_1, "incluir texto");
        assert_eq!(record.nome_fabricante, "Honda");
        assert_eq!(record.tipo_unidade, "un");
        assert_eq!(record.parametro_origin_type_br, "0");
        assert_eq!(record.parametro_origin_detail_br, "Reseller");
    }

    #[test]
    fn test_product_name_suffix_and_reference_strip() {
        let record = assemble(&sample_row(), &EnrichmentResult::default(), TODAY);
        assert_eq!(record.nome_produto_br, "Parafuso M8 Sextavado Honda Genuíno");
        assert!(record.nome_produto_br.chars().count() <= 60);
    }

    #[test]
    fn test_product_name_capped_for_huge_descriptions() {
        let mut row = sample_row();
        row.descricao = format!("12345 {}", "Peça ".repeat(2000));
        let record = assemble(&row, &EnrichmentResult::default(), TODAY);
        assert_eq!(record.nome_produto_br.chars().count(), 60);
    }

    #[test]
    fn test_ai_multiline_description_flattened() {
        let enrichment = EnrichmentResult {
            descricao_adicional_2: Some("linha um\nlinha dois\r\nlinha três".to_string()),
            ..Default::default()
        };
        let record = assemble(&sample_row(), &enrichment, TODAY);
        assert_eq!(record.descricao_adicional_2, "linha um linha dois linha três");
    }

    #[test]
    fn test_fallback_matches_assemble_with_empty_enrichment() {
        let row = sample_row();
        assert_eq!(
            fallback_record(&row, TODAY),
            assemble(&row, &EnrichmentResult::default(), TODAY)
        );
    }

    #[test]
    fn test_fallback_on_empty_row_populates_every_column() {
        let record = fallback_record(&InputRow::default(), TODAY);
        // AI-sourced and fixed columns must be populated even for a blank row
        assert_eq!(record.nome_categoria, DEFAULT_CATEGORY);
        assert_eq!(record.peso, DEFAULT_WEIGHT);
        assert_eq!(record.ncm, DEFAULT_NCM);
        assert_eq!(record.preco_padrao_brl, "0.00");
        assert_eq!(record.quantidade_padrao, "0");
        assert!(!record.descricao_adicional_2.is_empty());
        assert_eq!(record.to_field_vec().len(), 30);
    }

    #[test]
    fn test_fallback_description_template() {
        let record = fallback_record(&sample_row(), TODAY);
        let desc = &record.descricao_adicional_2;
        assert!(desc.starts_with("Descrição do Produto: Parafuso M8 Sextavado"));
        assert!(desc.contains("Garantia: 3 meses"));
        assert!(desc.contains("Data: 2026-08-30"));
        assert!(desc.contains("Dimensões em cm (Altura x Comprimento x Largura): 5.0x10.0x5.0"));
        assert!(desc.contains("Peso (kg): 0.10"));
        assert!(desc.contains("Código SKU: SKU001"));
        assert!(desc.contains("NCM: 8714.19.00"));
        assert!(desc.ends_with("Op: LK"));
        assert!(!desc.contains(['\n', '\r']));
    }
}
