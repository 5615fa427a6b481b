//! Workspace slug normalization.

/// Derives a URL-safe slug from a free-text display name.
///
/// Lowercases and trims the input, drops anything that is not an ASCII
/// letter, digit, underscore, whitespace or hyphen, then collapses runs of
/// whitespace, underscores and hyphens into a single hyphen and strips
/// hyphens from both ends. Idempotent.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c == '-' || c == '_' || c.is_whitespace() {
            pending_separator = true;
        }
        // anything else is stripped without acting as a separator
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Acme Inc"), "acme-inc");
        assert_eq!(slugify("My Cool Site"), "my-cool-site");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Acme, Inc."), "acme-inc");
        assert_eq!(slugify("hello!@#world"), "helloworld");
    }

    #[test]
    fn test_slugify_collapses_separator_runs() {
        assert_eq!(slugify("  My__Cool -- Site  "), "my-cool-site");
        assert_eq!(slugify("a _- b"), "a-b");
    }

    #[test]
    fn test_slugify_trims_hyphens() {
        assert_eq!(slugify("--acme--"), "acme");
        assert_eq!(slugify(" -acme- "), "acme");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        // Mirrors the \w character class: accented letters are stripped, not
        // transliterated.
        assert_eq!(slugify("héllo"), "hllo");
        assert_eq!(slugify("Ünicode"), "nicode");
    }

    #[test]
    fn test_slugify_can_be_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for name in [
            "Acme Inc",
            "  My__Cool -- Site  ",
            "--acme--",
            "héllo wörld",
            "already-a-slug",
            "",
        ] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", name);
        }
    }
}
