use serde::{Deserialize, Serialize};

/// The enriched record written to the output table.
///
/// Fixed schema: every field is always populated (never missing, never null),
/// even when the AI produced nothing for the row. The serde renames carry the
/// exact column headers of the target import format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "ID_produto")]
    pub id_produto: String,

    #[serde(rename = "ID_OEM")]
    pub id_oem: String,

    /// Localized product name, hard-capped at 60 characters.
    #[serde(rename = "Nome do Produto (BR)")]
    pub nome_produto_br: String,

    #[serde(rename = "ID do Fabricante")]
    pub id_fabricante: String,

    #[serde(rename = "Quantidade (Padrão)")]
    pub quantidade_padrao: String,

    #[serde(rename = "EAN")]
    pub ean: String,

    #[serde(rename = "SKU")]
    pub sku: String,

    #[serde(rename = "Nome da categoria")]
    pub nome_categoria: String,

    #[serde(rename = "Preço (Padrão (BRL))")]
    pub preco_padrao_brl: String,

    #[serde(rename = "Preço de Compra")]
    pub preco_compra: String,

    #[serde(rename = "Custo (médio)")]
    pub custo_medio: String,

    #[serde(rename = "Peso")]
    pub peso: String,

    #[serde(rename = "Descrição (BR)")]
    pub descricao_br: String,

    #[serde(rename = "Descrição adicional 1 (BR)")]
    pub descricao_adicional_1: String,

    /// Always a single line in the final output.
    #[serde(rename = "Descrição adicional 2 (BR)")]
    pub descricao_adicional_2: String,

    #[serde(rename = "Nome do fabricante")]
    pub nome_fabricante: String,

    #[serde(rename = "Altura")]
    pub altura: String,

    #[serde(rename = "Comprimento")]
    pub comprimento: String,

    #[serde(rename = "Largura")]
    pub largura: String,

    #[serde(rename = "Campo adicional - Tipo de unidade")]
    pub campo_adicional_tipo_unidade: String,

    #[serde(rename = "Tipo de unidade")]
    pub tipo_unidade: String,

    #[serde(rename = "Campo adicional - Código da origem")]
    pub campo_adicional_codigo_origem: String,

    #[serde(rename = "Código da origem")]
    pub codigo_origem: String,

    #[serde(rename = "Campo adicional - Código do fabricante")]
    pub campo_adicional_codigo_fabricante: String,

    #[serde(rename = "Código do fabricante")]
    pub codigo_fabricante: String,

    #[serde(rename = "Parâmetro - NCM (BR)")]
    pub parametro_ncm_br: String,

    #[serde(rename = "NCM")]
    pub ncm: String,

    #[serde(rename = "Parâmetro - Origin Type (BR)")]
    pub parametro_origin_type_br: String,

    #[serde(rename = "Parâmetro - Origin Detail (BR)")]
    pub parametro_origin_detail_br: String,

    #[serde(rename = "Campo adicional - NCM")]
    pub campo_adicional_ncm: String,
}

impl OutputRecord {
    /// Output column headers in the exact order the import format expects.
    /// `to_field_vec` must stay in lockstep with this list.
    pub const COLUMNS: [&'static str; 30] = [
        "ID_produto",
        "ID_OEM",
        "Nome do Produto (BR)",
        "ID do Fabricante",
        "Quantidade (Padrão)",
        "EAN",
        "SKU",
        "Nome da categoria",
        "Preço (Padrão (BRL))",
        "Preço de Compra",
        "Custo (médio)",
        "Peso",
        "Descrição (BR)",
        "Descrição adicional 1 (BR)",
        "Descrição adicional 2 (BR)",
        "Nome do fabricante",
        "Altura",
        "Comprimento",
        "Largura",
        "Campo adicional - Tipo de unidade",
        "Tipo de unidade",
        "Campo adicional - Código da origem",
        "Código da origem",
        "Campo adicional - Código do fabricante",
        "Código do fabricante",
        "Parâmetro - NCM (BR)",
        "NCM",
        "Parâmetro - Origin Type (BR)",
        "Parâmetro - Origin Detail (BR)",
        "Campo adicional - NCM",
    ];

    /// Field values in `COLUMNS` order, for delimited-table writers.
    pub fn to_field_vec(&self) -> Vec<&str> {
        vec![
            &self.id_produto,
            &self.id_oem,
            &self.nome_produto_br,
            &self.id_fabricante,
            &self.quantidade_padrao,
            &self.ean,
            &self.sku,
            &self.nome_categoria,
            &self.preco_padrao_brl,
            &self.preco_compra,
            &self.custo_medio,
            &self.peso,
            &self.descricao_br,
            &self.descricao_adicional_1,
            &self.descricao_adicional_2,
            &self.nome_fabricante,
            &self.altura,
            &self.comprimento,
            &self.largura,
            &self.campo_adicional_tipo_unidade,
            &self.tipo_unidade,
            &self.campo_adicional_codigo_origem,
            &self.codigo_origem,
            &self.campo_adicional_codigo_fabricante,
            &self.codigo_fabricante,
            &self.parametro_ncm_br,
            &self.ncm,
            &self.parametro_origin_type_br,
            &self.parametro_origin_detail_br,
            &self.campo_adicional_ncm,
        ]
    }
}
