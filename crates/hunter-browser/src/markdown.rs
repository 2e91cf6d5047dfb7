use htmd::options::{HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use scraper::Html;

/// Convert rendered HTML to markdown, falling back to plain text
///
/// Headings are emitted in `#` style, which the profile extractor keys on.
pub fn html_to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .skip_tags(vec!["script", "style", "noscript"])
        .build();

    converter.convert(html).unwrap_or_else(|e| {
        tracing::debug!("Markdown conversion failed, using plain text: {}", e);
        let document = Html::parse_document(html);
        document.root_element().text().collect::<String>()
    })
}
