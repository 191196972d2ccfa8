//! Languages and the pipeline's own localized labels.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Ja,
    En,
}

impl Lang {
    /// Resolves a locale such as `en-US`; anything that is not English falls
    /// back to Japanese, the site's fallback language.
    pub fn from_code(code: &str) -> Self {
        match normalize_language_code(code).as_str() {
            "en" => Lang::En,
            _ => Lang::Ja,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Lang::Ja => &JA,
            Lang::En => &EN,
        }
    }
}

/// First two characters of a locale code, lowercased.
pub fn normalize_language_code(code: &str) -> String {
    code.trim().chars().take(2).collect::<String>().to_lowercase()
}

pub struct Strings {
    pub loading: &'static str,
    pub not_found: &'static str,
    pub load_error: &'static str,
    pub read_more: &'static str,
    pub no_posts: &'static str,
    pub all_tags: &'static str,
    pub toc_title: &'static str,
    reading_time_prefix: &'static str,
    reading_time_suffix: &'static str,
    pub nav_label: &'static str,
    pub prev_label: &'static str,
    pub next_label: &'static str,
    pub related_heading: &'static str,
    pub share_heading: &'static str,
    pub copy_link: &'static str,
    pub copied: &'static str,
    pub share_on_x: &'static str,
    pub native_share: &'static str,
}

impl Strings {
    pub fn reading_time(&self, minutes: u32) -> String {
        format!(
            "{}{minutes}{}",
            self.reading_time_prefix, self.reading_time_suffix
        )
    }
}

static JA: Strings = Strings {
    loading: "読み込み中...",
    not_found: "記事が見つかりませんでした。",
    load_error: "読み込みエラーが発生しました。",
    read_more: "続きを読む →",
    no_posts: "No posts found.",
    all_tags: "All",
    toc_title: "目次",
    reading_time_prefix: "約",
    reading_time_suffix: "分で読めます",
    nav_label: "記事ナビゲーション",
    prev_label: "← 前の記事",
    next_label: "次の記事 →",
    related_heading: "関連記事",
    share_heading: "この記事をシェア",
    copy_link: "リンクをコピー",
    copied: "コピーしました",
    share_on_x: "X でシェア",
    native_share: "共有",
};

static EN: Strings = Strings {
    loading: "Loading...",
    not_found: "Post not found.",
    load_error: "An error occurred while loading the article.",
    read_more: "Read more →",
    no_posts: "No posts found.",
    all_tags: "All",
    toc_title: "Table of Contents",
    reading_time_prefix: "",
    reading_time_suffix: " min read",
    nav_label: "Article navigation",
    prev_label: "← Previous",
    next_label: "Next →",
    related_heading: "Related posts",
    share_heading: "Share this post",
    copy_link: "Copy link",
    copied: "Copied!",
    share_on_x: "Share on X",
    native_share: "Share",
};

#[cfg(test)]
mod tests {
    use super::{Lang, normalize_language_code};

    #[test]
    fn normalizes_region_suffix() {
        assert_eq!(normalize_language_code("en-US"), "en");
        assert_eq!(normalize_language_code("ja"), "ja");
        assert_eq!(normalize_language_code("EN"), "en");
    }

    #[test]
    fn unknown_languages_fall_back_to_japanese() {
        assert_eq!(Lang::from_code("en-GB"), Lang::En);
        assert_eq!(Lang::from_code("fr"), Lang::Ja);
        assert_eq!(Lang::from_code(""), Lang::Ja);
    }

    #[test]
    fn reading_time_labels() {
        assert_eq!(Lang::En.strings().reading_time(3), "3 min read");
        assert_eq!(Lang::Ja.strings().reading_time(3), "約3分で読めます");
    }
}
