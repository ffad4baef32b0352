use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slugs supplied by editors
    /// Must be lowercase alphanumeric with single hyphens between segments
    /// - Valid: "company-profile", "app2024", "my-web-app"
    /// - Invalid: "-app", "app-", "app--name", "App", "app_name"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Generate a URL-safe slug from a title.
///
/// Lowercases, maps every non-alphanumeric run to one hyphen and trims hyphens
/// from both ends. Common Latin accents are folded to ASCII first so
/// "Café Ñandú" becomes "cafe-nandu".
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = true;

    for c in title.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Width of the `slug` columns
pub const MAX_SLUG_LEN: usize = 255;

/// Room for the longest `-N` suffix `unique_slug` can append
const MAX_SUFFIX_LEN: usize = 21;

/// First `max` characters of `slug`, without a trailing hyphen
fn truncate_slug(slug: &str, max: usize) -> &str {
    let cut = slug
        .char_indices()
        .nth(max)
        .map_or(slug, |(idx, _)| &slug[..idx]);
    cut.trim_end_matches('-')
}

/// Slug generated from `text`, or `item` when nothing slug-worthy remains.
///
/// The result fits in `MAX_SLUG_LEN` characters.
pub fn slug_base(text: &str) -> String {
    let slug = generate_slug(text);
    if slug.is_empty() {
        "item".to_string()
    } else {
        truncate_slug(&slug, MAX_SLUG_LEN).to_string()
    }
}

/// Prefix shared by `base` and every candidate `unique_slug` may produce for it
pub fn slug_lookup_prefix(base: &str) -> &str {
    let max = MAX_SLUG_LEN - MAX_SUFFIX_LEN - 1;
    base.char_indices()
        .nth(max)
        .map_or(base, |(idx, _)| &base[..idx])
}

/// Pick the first candidate (`base`, `base-2`, `base-3`, ...) not in `taken`.
///
/// `base` is shortened before a suffix is appended so every candidate fits
/// in `MAX_SLUG_LEN` characters.
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    let base = truncate_slug(base, MAX_SLUG_LEN);
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2u64..)
        .map(|n| {
            let suffix = format!("-{}", n);
            format!(
                "{}{}",
                truncate_slug(base, MAX_SLUG_LEN - suffix.len()),
                suffix
            )
        })
        .find(|candidate| !taken.iter().any(|s| s == candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("company-profile"));
        assert!(SLUG_REGEX.is_match("app2024"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-app"));
        assert!(!SLUG_REGEX.is_match("app-"));
        assert!(!SLUG_REGEX.is_match("app--name"));
        assert!(!SLUG_REGEX.is_match("App"));
        assert!(!SLUG_REGEX.is_match("app_name"));
        assert!(!SLUG_REGEX.is_match(""));
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Company Profile Website"), "company-profile-website");
        assert_eq!(generate_slug("  Sistem  Informasi -- Desa!  "), "sistem-informasi-desa");
        assert_eq!(generate_slug("Café Ñandú"), "cafe-nandu");
        assert_eq!(generate_slug("C++ / Rust"), "c-rust");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_generated_slugs_match_regex() {
        for title in ["Hello World", "2024: A Review", "über-cool app"] {
            let slug = generate_slug(title);
            assert!(SLUG_REGEX.is_match(&slug), "{slug} should be valid");
        }
    }

    #[test]
    fn test_unique_slug() {
        let taken = vec!["web".to_string(), "web-2".to_string()];
        assert_eq!(unique_slug("web", &taken), "web-3");
        assert_eq!(unique_slug("mobile", &taken), "mobile");
        assert_eq!(unique_slug("mobile", &["mobile-2".to_string()]), "mobile");
    }

    #[test]
    fn test_long_titles_yield_slugs_that_fit() {
        let title = "a".repeat(MAX_SLUG_LEN);
        let base = slug_base(&title);
        assert_eq!(base.len(), MAX_SLUG_LEN);

        let second = unique_slug(&base, &[base.clone()]);
        assert_eq!(second.len(), MAX_SLUG_LEN);
        assert!(second.ends_with("-2"));
        assert!(second.starts_with(slug_lookup_prefix(&base)));

        let mut taken = vec![base.clone()];
        for _ in 0..9 {
            let next = unique_slug(&base, &taken);
            assert!(next.len() <= MAX_SLUG_LEN, "{} chars", next.len());
            assert!(SLUG_REGEX.is_match(&next));
            taken.push(next);
        }
        assert!(taken[9].ends_with("-10"));
        assert_eq!(taken[9].len(), MAX_SLUG_LEN);
    }

    #[test]
    fn test_truncation_drops_dangling_hyphen() {
        // the 255th character of this slug is a hyphen
        let title = "ab-".repeat(100);
        let base = slug_base(&title);
        assert!(base.len() <= MAX_SLUG_LEN);
        let second = unique_slug(&base, &[base.clone()]);
        assert!(second.len() <= MAX_SLUG_LEN);
        assert!(SLUG_REGEX.is_match(&second), "{second} should be valid");
    }

    #[test]
    fn test_slug_base_falls_back() {
        assert_eq!(slug_base("Landing Page"), "landing-page");
        assert_eq!(slug_base("???"), "item");
    }
}
