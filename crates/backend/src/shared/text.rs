/// Normalizes a locale-formatted price string ("R$ 9,50") to a canonical
/// two-decimal form ("9.50").
///
/// Total and idempotent: anything that does not parse as a number comes back
/// as "0.00", and a value that is already normalized normalizes to itself.
pub fn normalize_price(raw: &str) -> String {
    let cleaned = raw.replace("R$", "").replace(' ', "").replace(',', ".");

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => format!("{:.2}", value),
        _ => "0.00".to_string(),
    }
}

/// Collapses a text block into a single line: line breaks become spaces,
/// whitespace runs shrink to one space, leading/trailing whitespace is
/// trimmed. Empty input yields empty output.
pub fn to_single_line(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.chars() {
        if ch.is_whitespace() {
            pending_space = !result.is_empty();
        } else {
            if pending_space {
                result.push(' ');
                pending_space = false;
            }
            result.push(ch);
        }
    }

    result
}

/// Strips a leading reference/part code ("12345 Parafuso M8" -> "Parafuso M8").
///
/// Best-effort heuristic: only fires when the description starts with a
/// word token (letters, digits, underscore — accented letters included)
/// followed by whitespace. Single-token or pure-number descriptions come
/// back unchanged.
pub fn strip_leading_reference(description: &str) -> &str {
    let mut token_end = 0;
    for (idx, ch) in description.char_indices() {
        if ch.is_alphanumeric() || ch == '_' {
            token_end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    if token_end == 0 {
        return description;
    }

    let rest = &description[token_end..];
    if rest.starts_with(|c: char| c.is_whitespace()) {
        rest.trim_start()
    } else {
        description
    }
}

/// Truncates to at most `max_chars` characters without splitting a
/// multi-byte character. Silent: no error, no ellipsis.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price("R$ 9,50"), "9.50");
        assert_eq!(normalize_price("R$5,00"), "5.00");
        assert_eq!(normalize_price("199"), "199.00");
        assert_eq!(normalize_price("93.66"), "93.66");
        assert_eq!(normalize_price(""), "0.00");
        assert_eq!(normalize_price("abc"), "0.00");
        assert_eq!(normalize_price("NaN"), "0.00");
        assert_eq!(normalize_price("inf"), "0.00");
    }

    #[test]
    fn test_normalize_price_idempotent() {
        for raw in ["R$ 12,34", "0", "not a price", "  7 ", "1.005"] {
            let once = normalize_price(raw);
            assert_eq!(normalize_price(&once), once, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_to_single_line() {
        assert_eq!(to_single_line("a\nb\r\nc"), "a b c");
        assert_eq!(to_single_line("  leading   and \t trailing  "), "leading and trailing");
        assert_eq!(to_single_line(""), "");
        assert_eq!(to_single_line("\n\r\n"), "");
        assert!(!to_single_line("x\ny\rz").contains(['\n', '\r']));
    }

    #[test]
    fn test_strip_leading_reference() {
        assert_eq!(strip_leading_reference("12345 Parafuso M8"), "Parafuso M8");
        assert_eq!(strip_leading_reference("90102KRM860 Porca Flange"), "Porca Flange");
        assert_eq!(strip_leading_reference("Parafuso"), "Parafuso");
        assert_eq!(strip_leading_reference("12345"), "12345");
        assert_eq!(strip_leading_reference(""), "");
        assert_eq!(strip_leading_reference(" espaço antes"), " espaço antes");
    }

    #[test]
    fn test_strip_leading_reference_wide_tokens() {
        // Reference codes can carry accented letters and underscores.
        assert_eq!(strip_leading_reference("CÓD123 Junta"), "Junta");
        assert_eq!(strip_leading_reference("REF_01 Vela"), "Vela");
        assert_eq!(strip_leading_reference("ÁGUA"), "ÁGUA");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("Genuíno", 6), "Genuín");
    }
}
