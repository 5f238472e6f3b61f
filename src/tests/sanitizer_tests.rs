#[cfg(test)]
mod tests {
    use crate::implementations::sanitizer::{ sanitize, title_case, EMPTY_LABEL, MAX_LABEL_CHARS };

    fn samples() -> Vec<String> {
        let mut samples: Vec<String> = [
            "",
            "   ",
            "valid input",
            "user \"admin\" is authenticated",
            "line one\nline two\r\nline three",
            "authenticated redirect to dashboard",
            "a very long decision clause that keeps going well past the label limit",
            "abcdefghijklmnopqrstuvwxyz a bcdefgh",
            "price > $100 & stock < 5?",
            "[brackets] {braces} (parens) |pipes|",
            "tabs\tand    spaces",
            "!!!???",
            "déjà vu über naïve",
            "dots... and - dashes",
        ]
            .iter()
            .map(|s| s.to_string())
            .collect();
        samples.push("x".repeat(29));
        samples.push("y".repeat(31));
        samples
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for sample in samples() {
            let once = sanitize(&sample);
            assert_eq!(sanitize(&once), once, "input {:?}", sample);
        }
    }

    #[test]
    fn test_sanitize_output_bounds() {
        for sample in samples() {
            let label = sanitize(&sample);
            assert!(!label.is_empty(), "input {:?}", sample);
            assert!(label.chars().count() <= MAX_LABEL_CHARS, "input {:?} gave {:?}", sample, label);
            assert!(!label.contains('"'));
            assert!(!label.contains('\n'));
            assert!(!label.contains('\r'));
            assert!(
                label.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ' ' || c == '-' || c == '.'),
                "input {:?} gave {:?}",
                sample,
                label
            );
        }
    }

    #[test]
    fn test_sanitize_strips_quotes_and_breaks() {
        assert_eq!(sanitize("Is \"valid\"\ninput?"), "Is valid input");
        assert_eq!(sanitize("tabs\tand    spaces"), "tabs and spaces");
    }

    #[test]
    fn test_sanitize_empty_becomes_placeholder() {
        assert_eq!(sanitize(""), EMPTY_LABEL);
        assert_eq!(sanitize("  \n "), EMPTY_LABEL);
        assert_eq!(sanitize("?!{}"), EMPTY_LABEL);
    }

    #[test]
    fn test_sanitize_truncates_with_ellipsis() {
        let label = sanitize("authenticated redirect to dashboard");
        assert_eq!(label, "authenticated redirect to d...");
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);

        // no space left before the ellipsis
        assert_eq!(sanitize("abcdefghijklmnopqrstuvwxyz a bcdefgh"), "abcdefghijklmnopqrstuvwxyz...");
        assert_eq!(sanitize("abcdefghijklmnopqrstuvwxy a bcdefgh"), "abcdefghijklmnopqrstuvwxy a...");

        let exact = "z".repeat(MAX_LABEL_CHARS);
        assert_eq!(sanitize(&exact), exact);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("login"), "Login");
        assert_eq!(title_case("submit REQUESTS now"), "Submit Requests Now");
        assert_eq!(title_case("e-mail check.v2"), "E-Mail Check.V2");
    }
}
