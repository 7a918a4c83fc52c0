use crate::shared::llm::ChatMessage;
use contracts::domain::product_row::InputRow;

/// Builds the two-message prompt for one row: the fixed business rules as the
/// system message, the row's seven fields plus the requested JSON shape as the
/// user message. Exactly one model call per row; batching is a driver concern.
pub fn build_messages(row: &InputRow, today: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_message(today)),
        ChatMessage::user(user_message(row)),
    ]
}

fn system_message(today: &str) -> String {
    format!(
        "Você é um especialista em peças automotivas Honda. Siga EXATAMENTE as regras de negócio abaixo:\n\
         \n\
         REGRAS DE ENRIQUECIMENTO:\n\
         1. Nome da categoria: Categorize corretamente (ex: Parafusos Moto, Kit Revisão Moto, Carroceria Moto)\n\
         2. Peso: Estime peso realista em kg baseado no tipo de peça\n\
         3. Dimensões: Altura, Comprimento, Largura em cm - valores realistas\n\
         4. NCM: Use código fiscal correto:\n\
            - Parafusos: 7318.15.00\n\
            - Porcas: 7318.16.00\n\
            - Arruelas: 7318.22.00\n\
            - Válvulas motor: 8409.91.90\n\
            - Peças moto gerais: 8714.19.00\n\
            - Espelhos: 7009.10.00\n\
            - Engrenagens: 8483.40.10\n\
            - Peças plásticas: 3926.90.90\n\
         \n\
         TEMPLATE DESCRIÇÃO ADICIONAL 2 (uma linha única):\n\
         \"Descrição do Produto: [descrição limpa] Aplicação (Compatibilidade de Modelos e Ano): [modelos Honda] \
         Descrição Técnica: [especificações] Marca: Honda Garantia: 3 meses Data: {today} \
         Conteúdo da Embalagem: 1 UND de [produto] Dimensões em cm (Altura x Comprimento x Largura): [A]x[C]x[L] \
         Peso (kg): [peso] Código SKU: [sku] Código do Fabricante/Referência: [ref] NCM: [ncm] \
         Descrição NCM: [desc_ncm] Op: LK\"\n\
         \n\
         IMPORTANTE:\n\
         - Retorne APENAS JSON válido\n\
         - Descrição adicional 2 deve ser UMA LINHA única\n\
         - Use categorias específicas, não genéricas\n\
         - Dimensões e peso devem ser realistas para o tipo de peça"
    )
}

fn user_message(row: &InputRow) -> String {
    format!(
        "Enriqueça os seguintes dados de peça automotiva Honda:\n\
         \n\
         Referência: {referencia}\n\
         Descrição: {descricao}\n\
         Quantidade Estoque: {quantidade}\n\
         Preço de Venda: {preco_venda}\n\
         Preço de Custo: {preco_custo}\n\
         SKU: {sku}\n\
         EAN: {ean}\n\
         \n\
         Retorne um JSON válido com esta estrutura exata:\n\
         {{\n\
             \"nome_categoria\": \"categoria específica (ex: Peças de Freio Moto, Fixação Moto, Parafusos Moto)\",\n\
             \"peso\": \"peso estimado em kg\",\n\
             \"altura\": \"altura em cm\",\n\
             \"comprimento\": \"comprimento em cm\",\n\
             \"largura\": \"largura em cm\",\n\
             \"ncm\": \"código NCM apropriado\",\n\
             \"descricao_adicional_2\": \"template completo em UMA LINHA SEM quebras\"\n\
         }}\n\
         \n\
         IMPORTANTE:\n\
         - A descricao_adicional_2 deve estar em UMA LINHA ÚNICA\n\
         - Substitua todas as quebras de linha por espaços\n\
         - Use categorias específicas baseadas no tipo de peça",
        referencia = row.referencia,
        descricao = row.descricao,
        quantidade = row.quantidade_estoque,
        preco_venda = row.preco_venda,
        preco_custo = row.preco_custo,
        sku = row.sku,
        ean = row.ean,
    )
}
