//! Tweet composition for the social-posting trigger.

/// Maximum characters in a composed post (premium account limit we target).
pub const POST_MAX_CHARS: usize = 300;

/// Compose the post text for a news article.
///
/// `article_url` should be the public permalink for the news row. The result
/// is truncated to [`POST_MAX_CHARS`] characters with a trailing ellipsis if
/// the title and summary overflow the budget.
pub fn build_post_text(title: &str, summary: &str, article_url: &str) -> String {
    let post = format!(
        "\u{1F5F3}\u{FE0F} {title}\n\n{summary}\n\nParticipe da discussão e vote!\n\n\u{1F449} {article_url}\n\n#Plenario #Política"
    );

    if post.chars().count() <= POST_MAX_CHARS {
        return post;
    }

    let truncated: String = post.chars().take(POST_MAX_CHARS - 3).collect();
    format!("{truncated}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_post_is_untouched() {
        let post = build_post_text("Título", "Resumo curto.", "https://example.org/n/1");
        assert!(post.contains("Título"));
        assert!(post.contains("https://example.org/n/1"));
        assert!(post.ends_with("#Plenario #Política"));
        assert!(post.chars().count() <= POST_MAX_CHARS);
    }

    #[test]
    fn long_post_is_truncated_with_ellipsis() {
        let summary = "palavra ".repeat(80);
        let post = build_post_text("Título", &summary, "https://example.org/n/1");
        assert_eq!(post.chars().count(), POST_MAX_CHARS);
        assert!(post.ends_with("..."));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // Multi-byte accented text must not panic or split a codepoint.
        let summary = "ação pública João ".repeat(40);
        let post = build_post_text("Votação", &summary, "https://example.org/n/1");
        assert_eq!(post.chars().count(), POST_MAX_CHARS);
    }
}
