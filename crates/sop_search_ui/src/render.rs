//! Turning answers, sources and errors into page markup or terminal text.
//!
//! Every backend-supplied string is escaped before it is embedded. Answer
//! markdown is rendered with raw HTML disabled and unsafe link schemes removed.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use sop_search_client::{Domain, Source};

use crate::page::{PageState, SearchPage};

const ANSWER_LABEL: &str = "answer:";
const NOT_AVAILABLE: &str = "N/A";
const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Progress text shown while a query for `domain` is in flight.
pub fn loading_message(domain: &Domain) -> &'static str {
    match domain {
        Domain::Support => "Searching through support articles...",
        _ => "Searching through SOPs...",
    }
}

/// Drop a leading case-insensitive `answer:` label. Text without the label is
/// returned untouched.
pub fn strip_answer_label(text: &str) -> &str {
    let body = text.trim_start();
    match body.get(..ANSWER_LABEL.len()) {
        Some(head) if head.eq_ignore_ascii_case(ANSWER_LABEL) => &body[ANSWER_LABEL.len()..],
        _ => text,
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Relative URLs and http(s)/mailto are allowed; `javascript:` and friends are not.
fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let scheme_end = cleaned.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(i) if cleaned[i..].starts_with(':') => {
            let scheme = cleaned[..i].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    }
}

/// Markdown answer body → HTML.
pub fn format_answer(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_GFM);
    let parser = Parser::new_ext(markdown.trim(), options).map(sanitize_event);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

pub fn format_relevance(relevance: f64) -> String {
    format!("{relevance}% relevant")
}

fn or_not_available(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// One `source-item` card per source, in order.
pub fn format_sources(sources: &[Source]) -> String {
    sources
        .iter()
        .map(|source| {
            format!(
                concat!(
                    "<div class=\"source-item\">",
                    "<div class=\"source-header\"><div>",
                    "<div class=\"source-title\">{title}</div>",
                    "<div class=\"source-meta\">SOP ID: {id} | Department: {department}</div>",
                    "</div>",
                    "<div class=\"relevance-badge\">{relevance}</div>",
                    "</div>",
                    "<div class=\"source-preview\">{preview}</div>",
                    "</div>\n"
                ),
                title = escape_html(&source.title),
                id = escape_html(or_not_available(source.id.as_deref())),
                department = escape_html(or_not_available(source.department.as_deref())),
                relevance = escape_html(&format_relevance(source.relevance)),
                preview = escape_html(&source.preview),
            )
        })
        .collect()
}

/// Red-toned inline message box shown in place of the answer.
pub fn format_error(message: &str) -> String {
    format!(
        "<div class=\"search-error\" style=\"color:#dc2626; padding:20px; text-align:center; \
         background:#fef2f2; border-radius:8px; border:1px solid #fecaca;\">\
         <i class=\"fas fa-exclamation-triangle\" style=\"margin-right:8px;\"></i>{}</div>",
        escape_html(message)
    )
}

/// Plain-text rendering of the visible results, for terminals.
pub fn render_terminal(page: &SearchPage) -> String {
    let mut out = String::new();
    match page.state() {
        PageState::Idle => {}
        PageState::Loading => {
            out.push_str(&page.loading.text);
            out.push('\n');
        }
        PageState::Error => {
            out.push_str("Error: ");
            out.push_str(&page.answer.text);
            out.push('\n');
        }
        PageState::Answer => {
            out.push_str(&page.answer.text);
            out.push('\n');
            if page.sources.visible {
                out.push_str("\nSources:\n");
                for (n, source) in page.sources.sources.iter().enumerate() {
                    out.push_str(&format!(
                        "  {}. {}\n     SOP ID: {} | Department: {}\n     {}\n     {}\n",
                        n + 1,
                        source.title,
                        or_not_available(source.id.as_deref()),
                        or_not_available(source.department.as_deref()),
                        format_relevance(source.relevance),
                        source.preview,
                    ));
                }
            }
        }
    }
    out
}
