//! WeChat official-account articles.
//!
//! Article pages on `mp.weixin.qq.com` render the headline into
//! `#activity-name` and keep the share card data in inline script
//! variables (`msg_title`, `msg_desc`, `msg_cdn_url`). Those are read
//! first; the standard tags follow as fallbacks.

use crate::Document;
use crate::metadata::FieldSource::{self, ElementText, Meta, ScriptVar, Title};
use crate::strategy::standard::image_or_favicon;
use crate::strategy::{PreviewFields, Strategy, StrategyKind};

pub const TITLE_SOURCES: &[FieldSource] = &[
    ElementText("#activity-name"),
    ScriptVar("msg_title"),
    Meta("og:title"),
    Meta("twitter:title"),
    Title,
];

pub const DESCRIPTION_SOURCES: &[FieldSource] = &[
    ScriptVar("msg_desc"),
    Meta("og:description"),
    Meta("twitter:description"),
    Meta("description"),
];

pub const IMAGE_SOURCES: &[FieldSource] = &[ScriptVar("msg_cdn_url"), Meta("og:image"), Meta("twitter:image")];

#[derive(Debug, Clone, Copy, Default)]
pub struct WechatArticle;

impl Strategy for WechatArticle {
    fn kind(&self) -> StrategyKind {
        StrategyKind::WechatArticle
    }

    fn extract(&self, document: &Document, page_url: &str) -> PreviewFields {
        PreviewFields {
            title: document.first_of(TITLE_SOURCES),
            description: document.first_of(DESCRIPTION_SOURCES),
            image: image_or_favicon(document, IMAGE_SOURCES, page_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://mp.weixin.qq.com/s/AbCdEf";

    const ARTICLE: &str = r#"
        <html>
        <head>
            <title></title>
            <meta property="og:title" content="OG fallback title">
            <meta property="og:image" content="https://mmbiz.qpic.cn/og.jpeg">
        </head>
        <body>
            <h1 class="rich_media_title" id="activity-name">
                Rust 异步编程实践
            </h1>
            <script type="text/javascript">
                var msg_title = 'Rust async in practice'.html(false);
                var msg_desc = htmlDecode("从 Future 到 tokio 的一次梳理");
                var msg_cdn_url = "http://mmbiz.qpic.cn/mmbiz_jpg/cover/0?wx_fmt=jpeg";
            </script>
        </body>
        </html>
    "#;

    #[test]
    fn test_article_header_and_script_vars() {
        let doc = Document::parse(ARTICLE).unwrap();
        let fields = WechatArticle.extract(&doc, PAGE);

        assert_eq!(fields.title.as_deref(), Some("Rust 异步编程实践"));
        assert_eq!(fields.description.as_deref(), Some("从 Future 到 tokio 的一次梳理"));
        assert_eq!(
            fields.image.as_deref(),
            Some("http://mmbiz.qpic.cn/mmbiz_jpg/cover/0?wx_fmt=jpeg")
        );
    }

    #[test]
    fn test_falls_back_to_standard_tags() {
        let html = r#"
            <html><head>
                <title>Plain</title>
                <meta name="description" content="Plain description">
                <link rel="icon" href="/favicon.ico">
            </head><body></body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        let fields = WechatArticle.extract(&doc, PAGE);

        assert_eq!(fields.title.as_deref(), Some("Plain"));
        assert_eq!(fields.description.as_deref(), Some("Plain description"));
        assert_eq!(fields.image.as_deref(), Some("https://mp.weixin.qq.com/favicon.ico"));
    }

    #[test]
    fn test_script_title_when_header_missing() {
        let html = r#"<html><body><script>var msg_title = "Scripted";</script></body></html>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(WechatArticle.extract(&doc, PAGE).title.as_deref(), Some("Scripted"));
    }
}
