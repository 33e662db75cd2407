use std::collections::HashSet;

/// Incorporation markers that carry punctuation, replaced before
/// punctuation is stripped.
const BRACKETED_MARKERS: &[&str] = &["㈜", "(주)", "[주]", "주)", "주(", "주."];

/// Incorporation words removed wherever they appear
const EMBEDDED_MARKERS: &[&str] = &["주식회사", "주식"];

/// Stand-alone tokens dropped after punctuation is gone ("Inc." -> "inc")
const MARKER_TOKENS: &[&str] = &[
    "inc", "co", "corp", "corporation", "company", "ltd", "limited", "llc",
];

/// Canonicalize a free-text employer for equality checks
///
/// Lower-cases, strips incorporation markers, removes everything that is not
/// alphanumeric or whitespace and collapses whitespace. `None` and blank
/// input give an empty string.
pub fn normalize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let mut value = text.to_lowercase();
    for marker in BRACKETED_MARKERS {
        value = value.replace(marker, " ");
    }

    let value: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut value = value;
    for marker in EMBEDDED_MARKERS {
        value = value.replace(marker, " ");
    }

    value
        .split_whitespace()
        .filter(|token| !MARKER_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two employer strings name the same company
///
/// Equal, contained in one another, or sharing any token once normalized.
/// The token check catches reordered or partial names.
pub fn same_workplace(a: &str, b: &str) -> bool {
    let na = normalize(Some(a));
    let nb = normalize(Some(b));
    if na.is_empty() || nb.is_empty() {
        return false;
    }

    if na == nb || na.contains(&nb) || nb.contains(&na) {
        return true;
    }

    let tokens: HashSet<&str> = na.split_whitespace().collect();
    nb.split_whitespace().any(|token| tokens.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_markers() {
        assert_eq!(normalize(Some("Acme Corp Inc.")), "acme");
        assert_eq!(normalize(Some("(Acme) Corp")), "acme");
        assert_eq!(normalize(Some("Zenith Company Limited")), "zenith");
        assert_eq!(normalize(Some("ABC Technologies Co.")), "abc technologies");
        assert_eq!(normalize(Some("주식회사 ABC 주식회사")), "abc");
        assert_eq!(normalize(Some("(주) ABC")), "abc");
        assert_eq!(normalize(Some("㈜한빛")), "한빛");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("   ")), "");
        assert_eq!(normalize(Some("Inc.")), "");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize(Some("  Blue   \t Harbor\nLabs ")), "blue harbor labs");
    }

    #[test]
    fn test_normalize_is_idempotent_on_samples() {
        for raw in ["Acme Corp Inc.", "주-식회사 Foo", "(주)바-다", "Co. Co. Co", "ÀBÇ  Ltd"] {
            let once = normalize(Some(raw));
            assert_eq!(normalize(Some(&once)), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_same_workplace_variants() {
        assert!(same_workplace("Acme Corp Inc.", "(Acme) Corp"));
        assert!(same_workplace("Acme Corp Inc.", "Corp Acme Inc"));
        assert!(!same_workplace("Acme Corp Inc.", "Zenith Partners"));
        assert!(!same_workplace("Samsung Corp", "Hyundai Corp"));
        assert!(!same_workplace("Blue Corporation", "Red Corporation Ltd."));
        assert!(same_workplace("Hanbit", "Hanbitsoft"));
        assert!(!same_workplace("Inc.", "Inc."));
    }
}
