use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::model::{
    BlogConfig, ReadingConfig, RenderConfig, ShareConfig, SiteConfig, SiteMeta, SyntaxConfig,
};

#[derive(Debug, Deserialize)]
struct SiteConfigRaw {
    site: SiteMetaRaw,
    blog: Option<BlogConfigRaw>,
    reading: Option<ReadingConfigRaw>,
    share: Option<ShareConfigRaw>,
    render: Option<RenderConfigRaw>,
    syntax: Option<SyntaxConfigRaw>,
}

#[derive(Debug, Deserialize)]
struct SiteMetaRaw {
    title: Option<String>,
    base_url: Option<String>,
    blog_page: Option<String>,
    default_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlogConfigRaw {
    posts_dir: Option<String>,
    index: Option<String>,
    excerpt_max_chars: Option<usize>,
    related_max: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ReadingConfigRaw {
    cjk_chars_per_minute: Option<u32>,
    words_per_minute: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ShareConfigRaw {
    intent_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RenderConfigRaw {
    heading_ids: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SyntaxConfigRaw {
    highlight: Option<bool>,
    theme: Option<String>,
}

pub fn load_site_config(path: &Path) -> Result<SiteConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_site_config(&raw)
        .with_context(|| format!("failed to load YAML config {}", path.display()))
}

pub fn parse_site_config(raw: &str) -> Result<SiteConfig> {
    let parsed: SiteConfigRaw = serde_yaml::from_str(raw).context("invalid YAML config")?;

    let site = SiteMeta {
        title: required_string(parsed.site.title, "site.title")?,
        base_url: required_string(parsed.site.base_url, "site.base_url")?,
        blog_page: non_empty_or_default(parsed.site.blog_page, "blog.html", "site.blog_page")?,
        default_language: non_empty_or_default(
            parsed.site.default_language,
            "ja",
            "site.default_language",
        )?,
    };

    let blog = match parsed.blog {
        None => BlogConfig {
            posts_dir: "assets/posts".to_string(),
            index_path: "assets/posts/list.json".to_string(),
            excerpt_max_chars: 70,
            related_max: 3,
        },
        Some(blog_raw) => {
            let posts_dir =
                non_empty_or_default(blog_raw.posts_dir, "assets/posts", "blog.posts_dir")?;
            let posts_dir = posts_dir.trim_end_matches('/').to_string();
            let default_index = format!("{posts_dir}/list.json");
            let index_path = non_empty_or_default(blog_raw.index, &default_index, "blog.index")?;
            let excerpt_max_chars = blog_raw.excerpt_max_chars.unwrap_or(70);
            if excerpt_max_chars == 0 {
                bail!("blog.excerpt_max_chars must be > 0");
            }
            let related_max = blog_raw.related_max.unwrap_or(3);
            if related_max == 0 {
                bail!("blog.related_max must be > 0");
            }
            BlogConfig {
                posts_dir,
                index_path,
                excerpt_max_chars,
                related_max,
            }
        }
    };

    let reading = ReadingConfig {
        cjk_chars_per_minute: positive_or_default(
            parsed
                .reading
                .as_ref()
                .and_then(|reading| reading.cjk_chars_per_minute),
            500,
            "reading.cjk_chars_per_minute",
        )?,
        words_per_minute: positive_or_default(
            parsed
                .reading
                .as_ref()
                .and_then(|reading| reading.words_per_minute),
            200,
            "reading.words_per_minute",
        )?,
    };

    let share = ShareConfig {
        intent_url: non_empty_or_default(
            parsed.share.and_then(|share| share.intent_url),
            "https://twitter.com/intent/tweet",
            "share.intent_url",
        )?,
    };

    let syntax = SyntaxConfig {
        highlight: parsed
            .syntax
            .as_ref()
            .and_then(|syntax| syntax.highlight)
            .unwrap_or(true),
        theme: non_empty_or_default(
            parsed.syntax.and_then(|syntax| syntax.theme),
            "GitHub",
            "syntax.theme",
        )?,
    };

    Ok(SiteConfig {
        site,
        blog,
        reading,
        share,
        render: RenderConfig {
            heading_ids: parsed
                .render
                .and_then(|render| render.heading_ids)
                .unwrap_or(false),
        },
        syntax,
    })
}

fn required_string(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => bail!("missing required field: {}", field),
    }
}

fn non_empty_or_default(value: Option<String>, default: &str, field: &str) -> Result<String> {
    match value {
        Some(text) => {
            if text.trim().is_empty() {
                bail!("{field} must not be empty");
            }
            Ok(text)
        }
        None => Ok(default.to_string()),
    }
}

fn positive_or_default(value: Option<u32>, default: u32, field: &str) -> Result<u32> {
    match value {
        Some(0) => bail!("{field} must be > 0"),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_site_config, parse_site_config};
    use std::fs;

    const MINIMAL: &str = "site:\n  title: \"Studio344\"\n  base_url: \"https://example.com/\"\n";

    #[test]
    fn valid_minimal_config_parses() {
        let config = parse_site_config(MINIMAL).expect("config should load");
        assert_eq!(config.site.title, "Studio344");
        assert_eq!(config.site.blog_page, "blog.html");
        assert_eq!(config.site.default_language, "ja");
    }

    #[test]
    fn blog_defaults_apply_when_missing() {
        let config = parse_site_config(MINIMAL).expect("config should load");
        assert_eq!(config.blog.posts_dir, "assets/posts");
        assert_eq!(config.blog.index_path, "assets/posts/list.json");
        assert_eq!(config.blog.excerpt_max_chars, 70);
        assert_eq!(config.blog.related_max, 3);
        assert_eq!(config.reading.cjk_chars_per_minute, 500);
        assert_eq!(config.reading.words_per_minute, 200);
        assert!(config.syntax.highlight);
        assert!(!config.render.heading_ids);
    }

    #[test]
    fn index_path_follows_posts_dir() {
        let config = parse_site_config(&format!("{MINIMAL}blog:\n  posts_dir: \"content/\"\n"))
            .expect("config should load");
        assert_eq!(config.blog.posts_dir, "content");
        assert_eq!(config.blog.index_path, "content/list.json");
    }

    #[test]
    fn missing_required_field_fails() {
        let err = parse_site_config("site:\n  base_url: \"https://example.com/\"\n")
            .expect_err("expected error");
        assert!(err.to_string().contains("site.title"));
    }

    #[test]
    fn zero_excerpt_length_fails() {
        let err = parse_site_config(&format!("{MINIMAL}blog:\n  excerpt_max_chars: 0\n"))
            .expect_err("expected error");
        assert!(err.to_string().contains("blog.excerpt_max_chars must be > 0"));
    }

    #[test]
    fn zero_reading_speed_fails() {
        let err = parse_site_config(&format!("{MINIMAL}reading:\n  words_per_minute: 0\n"))
            .expect_err("expected error");
        assert!(err.to_string().contains("reading.words_per_minute"));
    }

    #[test]
    fn empty_theme_fails() {
        let err = parse_site_config(&format!("{MINIMAL}syntax:\n  theme: \"  \"\n"))
            .expect_err("expected error");
        assert!(err.to_string().contains("syntax.theme must not be empty"));
    }

    #[test]
    fn loads_from_file() {
        let temp = tempfile::TempDir::new().expect("tempdir");
        let path = temp.path().join("folio.yaml");
        fs::write(&path, MINIMAL).expect("write config");
        let config = load_site_config(&path).expect("config should load");
        assert_eq!(
            config.post_url("p1"),
            "https://example.com/blog.html#post/p1"
        );
    }
}
