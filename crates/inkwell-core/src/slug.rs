//! URL slug generation.

/// Turn a title or tag name into a URL-safe slug.
///
/// The input is lowercased, ASCII spaces become `-`, and anything outside
/// `[a-z0-9-]` is dropped. Repeated or edge hyphens are kept as-is.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn is_slug(s: &str) -> bool {
        s.chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-'))
    }

    #[rstest]
    #[case("Hello World!", "hello-world")]
    #[case("Rust 2024 Edition", "rust-2024-edition")]
    #[case("  padded  ", "--padded--")]
    #[case("a - b", "a---b")]
    #[case("Crème Brûlée", "crme-brle")]
    #[case("tabs\tand\nnewlines", "tabsandnewlines")]
    #[case("日本語", "")]
    #[case("", "")]
    fn test_slugify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn test_slugify_output_alphabet_and_determinism() {
        // Sweep printable ASCII plus a spread of multi-byte code points.
        let mut inputs: Vec<String> = (0x20u8..0x7f)
            .map(|b| format!("Title {} End", b as char))
            .collect();
        let wide = ['É', 'ß', 'İ', 'Ω', 'Ж', 'ﬁ', '٣', '😀', '\u{200b}', 'Ａ'];
        for (i, c) in wide.iter().enumerate() {
            inputs.push(format!("{c}{i} mixed {c}Case"));
        }
        for start in (0x00u32..0x3000).step_by(97) {
            let s: String = (start..start + 16).filter_map(char::from_u32).collect();
            inputs.push(s);
        }

        for input in &inputs {
            let slug = slugify(input);
            assert!(is_slug(&slug), "{input:?} produced {slug:?}");
            assert_eq!(slug, slugify(input));
        }
    }
}
