//! Rewrites the `<head>` of an HTML shell with page metadata.
//!
//! The head is split into nodes. Nodes that carry SEO identity (the title,
//! `<meta>` keyed by `name`/`property`, the canonical link) are upserted in
//! place; everything else passes through byte for byte. Tags the shell lacks
//! are appended just before `</head>`, so re-running the injector on its own
//! output yields the same bytes.

use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use super::metadata::{PageMetadata, SiteProfile};

/// Finds the head boundaries. Comments, scripts and styles are matched
/// whole so a `<head>` or `</head>` inside them is never taken for the real one.
static HEAD_SCAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)<!--.*?-->",
        r"|<script\b[^>]*>.*?</script\s*>",
        r"|<style\b[^>]*>.*?</style\s*>",
        r"|(?P<open><head(?:\s[^>]*)?>)",
        r"|(?P<close></head\s*>)",
    ))
    .expect("valid head scan regex")
});

/// One alternative per head node kind. Comments, scripts and styles are
/// matched whole so tags inside them are never mistaken for real ones.
static NODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)(?P<comment><!--.*?-->)",
        // an unclosed title runs to the end of the head
        r"|(?P<title><title\b[^>]*>.*?(?:</title\s*>|\z))",
        r"|(?P<script><script\b[^>]*>.*?</script\s*>)",
        r"|(?P<style><style\b[^>]*>.*?</style\s*>)",
        r#"|(?P<meta><meta\b(?:[^>"']|"[^"]*"|'[^']*')*>)"#,
        r#"|(?P<link><link\b(?:[^>"']|"[^"]*"|'[^']*')*>)"#,
    ))
    .expect("valid head node regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid attribute regex")
});

/// Identity of a head tag for upsert purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TagKey {
    Title,
    /// Lowercased `name` or `property` value.
    Meta(String),
    Canonical,
}

struct HeadNode {
    range: Range<usize>,
    key: TagKey,
}

/// Injects [`PageMetadata`] into HTML documents for one site.
pub struct HeadInjector<'a> {
    site: &'a SiteProfile,
}

impl<'a> HeadInjector<'a> {
    pub fn new(site: &'a SiteProfile) -> Self {
        Self { site }
    }

    /// Return `html` with its head tags set from `meta`.
    ///
    /// A document without a complete `<head>...</head>` is returned unchanged.
    pub fn inject(&self, html: &str, meta: &PageMetadata) -> String {
        let Some(inner) = head_inner(html) else {
            return html.to_string();
        };

        let rewritten = rewrite_head(&html[inner.clone()], &self.desired_tags(meta));

        let mut out = String::with_capacity(html.len() + rewritten.len());
        out.push_str(&html[..inner.start]);
        out.push_str(&rewritten);
        out.push_str(&html[inner.end..]);
        out
    }

    /// Every tag the head should end up with, in insertion order.
    fn desired_tags(&self, meta: &PageMetadata) -> Vec<(TagKey, String)> {
        let site = self.site;
        let title = meta.og_title.as_deref().unwrap_or(&meta.title);
        let description = meta.og_description.as_deref().unwrap_or(&meta.description);
        let url = meta.og_url.as_deref().unwrap_or(&site.base_url);
        let image = meta.og_image.as_deref().unwrap_or(&site.default_image);
        let card = meta.twitter_card.as_deref().unwrap_or("summary_large_image");

        let mut tags = vec![
            (
                TagKey::Title,
                format!("<title>{}</title>", escape_html(&meta.title)),
            ),
            named("description", &meta.description),
        ];
        if let Some(keywords) = &meta.keywords {
            tags.push(named("keywords", keywords));
        }
        tags.extend([
            property("og:type", "website"),
            property("og:url", url),
            property("og:title", title),
            property("og:description", description),
            property("og:image", image),
            property("og:site_name", &site.name),
            named("twitter:card", card),
            named("twitter:url", url),
            named("twitter:title", title),
            named("twitter:description", description),
            named("twitter:image", image),
            named("robots", "index, follow"),
            named("author", &site.author),
            (
                TagKey::Canonical,
                format!(r#"<link rel="canonical" href="{}">"#, escape_html(url)),
            ),
        ]);
        tags
    }
}

fn named(name: &str, content: &str) -> (TagKey, String) {
    (
        TagKey::Meta(name.to_string()),
        format!(
            r#"<meta name="{}" content="{}">"#,
            name,
            escape_html(content)
        ),
    )
}

fn property(property: &str, content: &str) -> (TagKey, String) {
    (
        TagKey::Meta(property.to_string()),
        format!(
            r#"<meta property="{}" content="{}">"#,
            property,
            escape_html(content)
        ),
    )
}

/// Escape text for use in element content or a quoted attribute value.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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

fn rewrite_head(head: &str, desired: &[(TagKey, String)]) -> String {
    let nodes = keyed_nodes(head);
    let mut placed: HashSet<&TagKey> = HashSet::new();
    let mut out = String::with_capacity(head.len() + 1024);
    let mut cursor = 0;

    for node in &nodes {
        let gap = &head[cursor..node.range.start];
        cursor = node.range.end;

        let Some((key, tag)) = desired.iter().find(|(key, _)| *key == node.key) else {
            out.push_str(gap);
            out.push_str(&head[node.range.clone()]);
            continue;
        };
        if placed.insert(key) {
            out.push_str(gap);
            out.push_str(tag);
        } else {
            // duplicate: drop it with the whitespace that introduced it
            out.push_str(gap.trim_end());
        }
    }
    out.push_str(&head[cursor..]);

    let missing: Vec<&str> = desired
        .iter()
        .filter(|(key, _)| !placed.contains(key))
        .map(|(_, tag)| tag.as_str())
        .collect();
    if missing.is_empty() {
        return out;
    }

    let separator = line_separator(head, nodes.first().map(|n| n.range.start));
    let body_end = out.trim_end().len();
    let mut appended = String::new();
    for tag in missing {
        appended.push_str(&separator);
        appended.push_str(tag);
    }
    out.insert_str(body_end, &appended);
    out
}

/// Newline plus indentation used for appended tags, copied from the first
/// keyed node when it sits on its own line.
fn line_separator(head: &str, first_node: Option<usize>) -> String {
    let before = &head[..first_node.unwrap_or(head.len())];
    match before.rfind('\n') {
        Some(i) if before[i + 1..].trim().is_empty() => before[i..].to_string(),
        _ if head.contains('\n') => "\n    ".to_string(),
        _ => String::new(),
    }
}

/// Byte range between the first real `<head>` and its matching `</head>`.
fn head_inner(html: &str) -> Option<Range<usize>> {
    let mut start: Option<usize> = None;
    for caps in HEAD_SCAN_RE.captures_iter(html) {
        if let Some(start) = start {
            if let Some(close) = caps.name("close") {
                return Some(start..close.start());
            }
        } else if let Some(open) = caps.name("open") {
            start = Some(open.end());
        }
    }
    None
}

fn keyed_nodes(head: &str) -> Vec<HeadNode> {
    NODE_RE
        .captures_iter(head)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let mut range = whole.range();
            let key = if caps.name("title").is_some() {
                // keep the whitespace after an unclosed title outside the node
                range.end = range.start + whole.as_str().trim_end().len();
                TagKey::Title
            } else if let Some(meta) = caps.name("meta") {
                meta_key(meta.as_str())?
            } else if let Some(link) = caps.name("link") {
                link_key(link.as_str())?
            } else {
                return None;
            };
            Some(HeadNode { range, key })
        })
        .collect()
}

fn meta_key(tag: &str) -> Option<TagKey> {
    attribute(tag, "name")
        .or_else(|| attribute(tag, "property"))
        .map(|value| TagKey::Meta(value.trim().to_lowercase()))
}

fn link_key(tag: &str) -> Option<TagKey> {
    let rel = attribute(tag, "rel")?;
    rel.split_whitespace()
        .any(|token| token.eq_ignore_ascii_case("canonical"))
        .then_some(TagKey::Canonical)
}

fn attribute<'t>(tag: &'t str, name: &str) -> Option<&'t str> {
    ATTR_RE.captures_iter(tag).find_map(|caps| {
        let attr = caps.get(1)?;
        if !attr.as_str().eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|value| value.as_str())
    })
}
