use contracts::domain::product_row::EnrichmentResult;

/// Turns a raw model response into an `EnrichmentResult`.
///
/// Strips markdown code fences the model likes to wrap JSON in, then parses.
/// Never fails past this boundary: a response that is not usable JSON is
/// logged and becomes the empty result, which downstream fills with defaults.
pub fn interpret(raw: &str) -> EnrichmentResult {
    let cleaned = strip_code_fences(raw.trim());

    let value = match serde_json::from_str::<serde_json::Value>(cleaned) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse AI response as JSON: {}", e);
            tracing::debug!("Raw response: {}", raw);
            return EnrichmentResult::default();
        }
    };

    if !value.is_object() {
        tracing::warn!("AI response is valid JSON but not an object");
        tracing::debug!("Raw response: {}", raw);
        return EnrichmentResult::default();
    }

    match serde_json::from_value::<EnrichmentResult>(value) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Failed to read enrichment fields from AI response: {}", e);
            tracing::debug!("Raw response: {}", raw);
            EnrichmentResult::default()
        }
    }
}

/// Removes a leading ```json / ``` marker and a trailing ``` marker, if
/// present. Anything else is returned as-is.
fn strip_code_fences(text: &str) -> &str {
    let mut inner = text;

    if let Some(rest) = inner.strip_prefix("```json") {
        inner = rest;
    } else if let Some(rest) = inner.strip_prefix("```") {
        inner = rest;
    }

    if let Some(rest) = inner.strip_suffix("```") {
        inner = rest;
    }

    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"nome_categoria": "Parafusos Moto", "peso": "0.02", "ncm": "7318.15.00"}"#;

    #[test]
    fn test_interpret_bare_json() {
        let result = interpret(PAYLOAD);
        assert_eq!(result.nome_categoria.as_deref(), Some("Parafusos Moto"));
        assert_eq!(result.peso.as_deref(), Some("0.02"));
        assert_eq!(result.ncm.as_deref(), Some("7318.15.00"));
        assert!(result.altura.is_none());
    }

    #[test]
    fn test_interpret_fenced_json_matches_bare() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        assert_eq!(interpret(&fenced), interpret(PAYLOAD));

        let fenced_untagged = format!("```\n{}\n```", PAYLOAD);
        assert_eq!(interpret(&fenced_untagged), interpret(PAYLOAD));
    }

    #[test]
    fn test_interpret_numeric_fields_kept() {
        // Numbers instead of strings must not sink the whole response
        let result = interpret(
            r#"{"nome_categoria": "Parafusos Moto", "peso": 0.02, "altura": 1.0}"#,
        );
        assert_eq!(result.nome_categoria.as_deref(), Some("Parafusos Moto"));
        assert_eq!(result.peso.as_deref(), Some("0.02"));
        assert_eq!(result.altura.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_interpret_garbage_yields_empty() {
        assert!(interpret("not json at all").is_empty());
        assert!(interpret("").is_empty());
        assert!(interpret("```json\n{broken\n```").is_empty());
        // JSON arrays are not the expected shape either
        assert!(interpret("[1, 2, 3]").is_empty());
    }

    #[test]
    fn test_interpret_surrounding_whitespace() {
        let padded = format!("\n\n  {}  \n", PAYLOAD);
        assert_eq!(interpret(&padded), interpret(PAYLOAD));
    }
}
