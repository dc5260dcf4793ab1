use regex::Regex;
use std::sync::LazyLock;

// Patterns that fail to compile produce no matches rather than panicking.
macro_rules! registry_pattern {
    ($name:ident, $regex_str:expr) => {
        pub(crate) static $name: LazyLock<Option<Regex>> =
            LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Address: title header ("[집합건물] ...") or a labelled location field ──
registry_pattern!(
    RE_ADDRESS,
    r"(?m)(?:\[(?:집합건물|건물|토지)\]|소재지번(?:\s*,?\s*건물명칭\s*및\s*번호)?|건물의\s*표시)\s*[:：]?[ \t]*([^\n]*\S)"
);

// ── Owners: 소유자 / 공유자 followed by a Hangul name ──────────────────────
registry_pattern!(RE_OWNER, r"(?:소유자|공유자)\s*[:：]?\s*([가-힣]{2,5})\b");

// ── Secured-claim amounts: 채권최고액 금500,000,000원 ───────────────────────
registry_pattern!(
    RE_SECURED_CLAIM,
    r"채권최고액\s*[:：]?\s*금?\s*([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)\s*원"
);

pub(crate) fn first_capture(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    let regex = pattern.as_ref()?;
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub(crate) fn all_captures(pattern: &LazyLock<Option<Regex>>, text: &str) -> Vec<String> {
    let Some(regex) = pattern.as_ref() else {
        return Vec::new();
    };
    regex
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Parses a thousands-separated numeral ("500,000,000") into whole won.
/// Numerals too long for `u128` saturate instead of being dropped.
pub(crate) fn parse_amount(raw: &str) -> Option<u128> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u128::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert!(RE_ADDRESS.is_some());
        assert!(RE_OWNER.is_some());
        assert!(RE_SECURED_CLAIM.is_some());
    }

    #[test]
    fn amount_parsing_strips_separators() {
        assert_eq!(parse_amount("500,000,000"), Some(500_000_000));
        assert_eq!(parse_amount("12000"), Some(12_000));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(","), None);
    }

    #[test]
    fn amounts_beyond_u64_are_kept() {
        assert_eq!(
            parse_amount("99,999,999,999,999,999,999"),
            Some(99_999_999_999_999_999_999)
        );
        assert_eq!(parse_amount(&"9".repeat(40)), Some(u128::MAX));
    }

    #[test]
    fn address_pattern_reads_header_line() {
        let text = "등기사항전부증명서(말소사항 포함) - 집합건물\n[집합건물] 경기도 성남시 분당구 정자동 1 제101동 제12층 제1203호\n";
        assert_eq!(
            first_capture(&RE_ADDRESS, text).as_deref(),
            Some("경기도 성남시 분당구 정자동 1 제101동 제12층 제1203호")
        );
    }
}
