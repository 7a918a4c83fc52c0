use serde::{Deserialize, Serialize};

/// One source CSV row describing an automotive part to be enriched.
///
/// Read once from the input table and treated as immutable after that.
/// Absent CSV fields normalize to an empty string (quantity to 0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRow {
    #[serde(rename = "referencia", default)]
    pub referencia: String,

    #[serde(rename = "descricao", default)]
    pub descricao: String,

    #[serde(rename = "quantidadeEstoque", default)]
    pub quantidade_estoque: i64,

    #[serde(rename = "precoVenda", default)]
    pub preco_venda: String,

    #[serde(rename = "precoCusto", default)]
    pub preco_custo: String,

    #[serde(rename = "sku", default)]
    pub sku: String,

    #[serde(rename = "ean", default)]
    pub ean: String,
}

/// AI-derived fields for one row. Any subset may be absent; a fully empty
/// result is a normal outcome (the assembler fills defaults), not an error.
///
/// Parsing is best-effort: the prompt asks for string values, but models
/// routinely return bare JSON numbers for weight and dimensions, so every
/// field accepts either and keeps the number's textual form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    #[serde(rename = "nome_categoria", default, deserialize_with = "string_or_number")]
    pub nome_categoria: Option<String>,

    #[serde(rename = "peso", default, deserialize_with = "string_or_number")]
    pub peso: Option<String>,

    #[serde(rename = "altura", default, deserialize_with = "string_or_number")]
    pub altura: Option<String>,

    #[serde(rename = "comprimento", default, deserialize_with = "string_or_number")]
    pub comprimento: Option<String>,

    #[serde(rename = "largura", default, deserialize_with = "string_or_number")]
    pub largura: Option<String>,

    #[serde(rename = "ncm", default, deserialize_with = "string_or_number")]
    pub ncm: Option<String>,

    #[serde(rename = "descricao_adicional_2", default, deserialize_with = "string_or_number")]
    pub descricao_adicional_2: Option<String>,
}

/// Accepts a JSON string or number; numbers keep their textual form
/// ("0.02" stays "0.02"). Null and any other shape become `None`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl EnrichmentResult {
    pub fn is_empty(&self) -> bool {
        self.nome_categoria.is_none()
            && self.peso.is_none()
            && self.altura.is_none()
            && self.comprimento.is_none()
            && self.largura.is_none()
            && self.ncm.is_none()
            && self.descricao_adicional_2.is_none()
    }
}
