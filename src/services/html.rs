//! HTML helpers for the terminal
//!
//! Server-rendered maps and pages can't be drawn in a terminal, so they are
//! summarized as readable text and written to a temp file for the browser.

use crate::model::HtmlDocument;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SCRIPT_STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|template)\b[^>]*>.*?</(script|style|noscript|template)\s*>")
        .unwrap()
});

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Tags that end a line of text
static BLOCK_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/div|/h[1-6]|/li|/tr|/table|/label|/option|/form|hr)\b[^>]*>")
        .unwrap()
});

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

static SPACES_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\f]+").unwrap());

/// Content of the `<title>` element, if any
pub fn title(doc: &HtmlDocument) -> Option<String> {
    let raw = TITLE_REGEX.captures(&doc.body)?.get(1)?.as_str();
    let text = decode_entities(raw.trim());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Readable text lines: scripts, styles and comments dropped, tags stripped,
/// entities decoded, blank runs collapsed
pub fn text_lines(doc: &HtmlDocument) -> Vec<String> {
    let without_scripts = SCRIPT_STYLE_REGEX.replace_all(&doc.body, " ");
    let without_comments = COMMENT_REGEX.replace_all(&without_scripts, " ");
    let with_breaks = BLOCK_TAG_REGEX.replace_all(&without_comments, "\n");
    let text = TAG_REGEX.replace_all(&with_breaks, " ");

    text.lines()
        .map(|line| decode_entities(SPACES_REGEX.replace_all(line, " ").trim()))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Count of embedded `<script>` blocks; maps are almost entirely script
pub fn script_count(doc: &HtmlDocument) -> usize {
    SCRIPT_STYLE_REGEX
        .captures_iter(&doc.body)
        .filter(|c| c.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case("script")))
        .count()
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Human readable size
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Standalone page that draws a Plotly figure JSON with plotly.js
pub fn figure_page(title: &str, figure_json: &str) -> HtmlDocument {
    // `</` inside the inline JSON would end the script element early
    let json = figure_json.replace("</", "<\\/");
    let title = title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    HtmlDocument::new(format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>{title}</title>
<script src="{PLOTLY_CDN}"></script></head>
<body><div id="figure" style="width:100%;height:95vh"></div>
<script>var fig = {json}; Plotly.newPlot("figure", fig.data, fig.layout, {{responsive: true}});</script>
</body></html>"#
    ))
}

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Write `doc` to a fresh, uniquely named file in `dir` and return its path.
/// The file is kept on disk so the browser can read it after we return.
pub fn write_temp_in(dir: &Path, doc: &HtmlDocument, stem: &str) -> anyhow::Result<PathBuf> {
    let prefix: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .chain(std::iter::once('-'))
        .collect();
    let mut file = tempfile::Builder::new()
        .prefix(&format!("gw-dash-{}", prefix))
        .suffix(".html")
        .tempfile_in(dir)?;
    file.write_all(doc.body.as_bytes())?;
    let (_, path) = file.keep()?;
    Ok(path)
}
