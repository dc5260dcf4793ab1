/// Strips invisible marks and collapses horizontal whitespace, keeping line breaks
/// so line-anchored patterns still see the document's row structure.
pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\r'], "");
    cleaned
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_spacing_but_keeps_lines() {
        let source = "\u{feff}채권최고액   금500,000,000원\r\n\t소유자  김민수 ";
        assert_eq!(
            normalize_text(source),
            "채권최고액 금500,000,000원\n소유자 김민수"
        );
    }
}
