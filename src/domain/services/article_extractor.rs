use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("a valid selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("a valid selector"));

/// Derives the plain-text body of an article from raw HTML (or plain text)
///
/// Extraction never fails: inputs without any recognizable article markup
/// degrade to their whitespace-collapsed text content, which may be empty.
pub struct ArticleExtractor;

impl ArticleExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, input: &str) -> String {
        let document = Html::parse_document(input);

        // An <article> element, when present, bounds the body and keeps
        // navigation/sidebar paragraphs out
        if let Some(article) = document.select(&ARTICLE).next() {
            let paragraphs = paragraph_texts(article);
            if !paragraphs.is_empty() {
                return paragraphs.join("\n\n");
            }
            return collapsed_text(article);
        }

        let paragraphs: Vec<String> = document
            .root_element()
            .select(&PARAGRAPH)
            .map(collapsed_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join("\n\n");
        }

        collapsed_text(document.root_element())
    }
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn paragraph_texts(scope: ElementRef) -> Vec<String> {
    scope
        .select(&PARAGRAPH)
        .map(collapsed_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn collapsed_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
