//! Markdown response segmentation.
//!
//! Splits a model's markdown answer into [`ChatMessage`] fragments at fenced
//! code block boundaries. Text between blocks keeps its original markdown so
//! the presentation layer can still render emphasis, lists and inline code.

use super::entities::ChatMessage;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// Split `markdown` into plain-text and code fragments, preserving order.
///
/// A response with N fenced code blocks produces exactly N code fragments and
/// at most N + 1 text fragments. Whitespace-only text between blocks is
/// dropped; the newline that ends a block's last line is not part of the
/// fragment.
pub fn segment_markdown(markdown: &str) -> Vec<ChatMessage> {
    let mut fragments = Vec::new();
    let mut text_start = 0;
    let mut code: Option<String> = None;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                push_text(&mut fragments, &markdown[text_start..range.start]);
                code = Some(String::new());
            }
            Event::Text(text) => {
                if let Some(buf) = code.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                // Indented blocks also end here; they never opened a buffer.
                if let Some(mut body) = code.take() {
                    strip_trailing_newline(&mut body);
                    fragments.push(ChatMessage::code(body));
                    text_start = range.end;
                }
            }
            _ => {}
        }
    }

    if let Some(mut body) = code.take() {
        strip_trailing_newline(&mut body);
        fragments.push(ChatMessage::code(body));
    } else if text_start < markdown.len() {
        push_text(&mut fragments, &markdown[text_start..]);
    }

    fragments
}

fn push_text(fragments: &mut Vec<ChatMessage>, text: &str) {
    let text = trim_quote_markers(text.trim());
    if !text.is_empty() {
        fragments.push(ChatMessage::text(text));
    }
}

/// Drop leading and trailing lines that hold nothing but blockquote markers.
///
/// A fence inside a quote starts after the line's `>` prefix, so cutting the
/// text at the fence leaves that prefix dangling.
fn trim_quote_markers(text: &str) -> &str {
    let is_marker_line = |line: &str| line.trim().chars().all(|c| c == '>');

    let (mut start, mut end, mut offset) = (None, 0, 0);
    for line in text.split_inclusive('\n') {
        if !is_marker_line(line) {
            start.get_or_insert(offset);
            end = offset + line.len();
        }
        offset += line.len();
    }

    match start {
        Some(start) => text[start..end].trim(),
        None => "",
    }
}

fn strip_trailing_newline(body: &mut String) {
    if body.ends_with('\n') {
        body.pop();
        if body.ends_with('\r') {
            body.pop();
        }
    }
}
