//! Count-aware noun formatting for log lines.

/// `""` for exactly one, `"s"` otherwise.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `count` followed by `noun`, with a regular `s` plural.
///
/// - `plural_count(1, "image")` -> `"1 image"`
/// - `plural_count(3, "image")` -> `"3 images"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

/// `count` followed by an irregular noun form.
///
/// - `plural_count_with(2, "directory", "directories")` -> `"2 directories"`
pub fn plural_count_with(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{count} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "image"), "0 images");
        assert_eq!(plural_count(1, "image"), "1 image");
        assert_eq!(plural_count(12, "key"), "12 keys");
    }

    #[test]
    fn test_plural_count_with() {
        assert_eq!(plural_count_with(1, "directory", "directories"), "1 directory");
        assert_eq!(plural_count_with(0, "directory", "directories"), "0 directories");
    }
}
