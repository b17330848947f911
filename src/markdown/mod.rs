//! Markdown subset for assistant replies
//!
//! Replies are parsed with `pulldown-cmark` into a small [`Document`] tree that
//! only knows the constructs the chat renders: bold, italic, inline code,
//! fenced code blocks, headings 1 to 3, bullet and numbered lists, and line
//! breaks. Anything else is reduced to its text. Raw HTML is kept as text and
//! escaped by the renderers.
//!
//! Two renderers consume the tree:
//! - [`html::render`] for transcript export
//! - [`terminal::TerminalRenderer`] for the interactive front-end

/// Escaping HTML renderer.
pub mod html;
/// ANSI renderer for the terminal front-end.
pub mod terminal;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Deepest heading level rendered as a heading; deeper ones become paragraphs.
pub const MAX_HEADING_LEVEL: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Code(String),
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    CodeBlock { lang: Option<String>, code: String },
    /// `start` is `Some` for numbered lists. Nested lists are flattened into their parent.
    List { start: Option<u64>, items: Vec<Vec<Inline>> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        let source = normalize_bullets(source);
        let mut builder = Builder::default();
        for event in Parser::new_ext(&source, Options::empty()) {
            builder.event(event);
        }
        builder.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Rewrite `•` bullets, which CommonMark does not know, as `-` bullets.
fn normalize_bullets(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix("• ") {
                Some(rest) => format!("{}- {}", &line[..line.len() - trimmed.len()], rest),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

enum SpanKind {
    Root,
    Strong,
    Emphasis,
}

struct Span {
    kind: SpanKind,
    children: Vec<Inline>,
}

struct ListState {
    start: Option<u64>,
    items: Vec<Vec<Inline>>,
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    heading: Option<u8>,
    code: Option<(Option<String>, String)>,
    list: Option<ListState>,
    list_depth: usize,
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match &mut self.code {
                Some((_, code)) => code.push_str(&text),
                None => self.push_text(&text),
            },
            Event::Code(code) => self.push(Inline::Code(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_text(html.trim_end_matches('\n'))
            }
            Event::SoftBreak | Event::HardBreak => match &mut self.code {
                Some((_, code)) => code.push('\n'),
                None => self.push(Inline::LineBreak),
            },
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.heading = Some(level as u8);
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(start) => {
                self.list_depth += 1;
                if self.list_depth == 1 {
                    self.list = Some(ListState {
                        start,
                        items: Vec::new(),
                    });
                }
            }
            Tag::Item => self.finish_item(),
            Tag::Strong => self.spans.push(Span {
                kind: SpanKind::Strong,
                children: Vec::new(),
            }),
            Tag::Emphasis => self.spans.push(Span {
                kind: SpanKind::Emphasis,
                children: Vec::new(),
            }),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock => {
                if self.list.is_none() {
                    let content = self.take_inlines();
                    if !content.is_empty() {
                        self.blocks.push(Block::Paragraph(content));
                    }
                }
            }
            TagEnd::Heading(_) => {
                let content = self.take_inlines();
                match self.heading.take() {
                    Some(level) if level <= MAX_HEADING_LEVEL => {
                        self.blocks.push(Block::Heading { level, content })
                    }
                    _ if content.is_empty() => {}
                    _ => self.blocks.push(Block::Paragraph(content)),
                }
            }
            TagEnd::CodeBlock => {
                if let Some((lang, mut code)) = self.code.take() {
                    if code.ends_with('\n') {
                        code.pop();
                    }
                    self.blocks.push(Block::CodeBlock { lang, code });
                }
            }
            TagEnd::Item => self.finish_item(),
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.finish_item();
                    if let Some(list) = self.list.take() {
                        self.blocks.push(Block::List {
                            start: list.start,
                            items: list.items,
                        });
                    }
                }
            }
            TagEnd::Strong | TagEnd::Emphasis => self.close_span(),
            _ => {}
        }
    }

    fn push(&mut self, inline: Inline) {
        if self.spans.is_empty() {
            self.spans.push(Span {
                kind: SpanKind::Root,
                children: Vec::new(),
            });
        }
        if let Some(span) = self.spans.last_mut() {
            span.children.push(inline);
        }
    }

    /// Append text, merging with a preceding text node.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text(existing)) = self
            .spans
            .last_mut()
            .and_then(|span| span.children.last_mut())
        {
            existing.push_str(text);
            return;
        }
        self.push(Inline::Text(text.to_string()));
    }

    fn close_span(&mut self) {
        let Some(span) = self.spans.pop() else {
            return;
        };
        let inline = match span.kind {
            SpanKind::Strong => Inline::Strong(span.children),
            SpanKind::Emphasis => Inline::Emphasis(span.children),
            SpanKind::Root => {
                self.spans.push(span);
                return;
            }
        };
        self.push(inline);
    }

    /// Collapse any unclosed spans and return the buffered inline content.
    fn take_inlines(&mut self) -> Vec<Inline> {
        while self.spans.len() > 1 {
            self.close_span();
        }
        let content = self
            .spans
            .pop()
            .map(|span| span.children)
            .unwrap_or_default();
        trim_line_breaks(content)
    }

    fn finish_item(&mut self) {
        let content = self.take_inlines();
        if content.is_empty() {
            return;
        }
        if let Some(list) = &mut self.list {
            list.items.push(content);
        }
    }

    fn finish(mut self) -> Document {
        let trailing = self.take_inlines();
        if !trailing.is_empty() {
            self.blocks.push(Block::Paragraph(trailing));
        }
        Document {
            blocks: self.blocks,
        }
    }
}

fn trim_line_breaks(mut content: Vec<Inline>) -> Vec<Inline> {
    while matches!(content.last(), Some(Inline::LineBreak)) {
        content.pop();
    }
    while matches!(content.first(), Some(Inline::LineBreak)) {
        content.remove(0);
    }
    content
}
