use super::{Block, Document, Inline};
use owo_colors::OwoColorize;

/// Renders a [`Document`] as indented terminal text.
pub struct TerminalRenderer {
    pub colored: bool,
    pub indent: usize,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TerminalRenderer {
    pub fn new(colored: bool) -> Self {
        Self { colored, indent: 4 }
    }

    pub fn render(&self, doc: &Document) -> String {
        let pad = " ".repeat(self.indent);
        let mut blocks = Vec::with_capacity(doc.blocks.len());

        for block in &doc.blocks {
            let rendered = match block {
                Block::Heading { content, .. } => {
                    let text = self.inlines(content);
                    if self.colored {
                        format!("{}{}", pad, text.bright_white().bold().underline())
                    } else {
                        format!("{}{}", pad, text.to_uppercase())
                    }
                }
                Block::Paragraph(content) => indent_lines(&self.inlines(content), &pad),
                Block::CodeBlock { lang, code } => {
                    let mut lines = Vec::new();
                    if let Some(lang) = lang {
                        lines.push(self.dim(&format!("{}┌ {}", pad, lang)));
                    }
                    for line in code.lines() {
                        let line = format!("{}│ {}", pad, line);
                        lines.push(if self.colored {
                            line.yellow().to_string()
                        } else {
                            line
                        });
                    }
                    lines.join("\n")
                }
                Block::List { start, items } => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let marker = match start {
                            Some(n) => format!("{}.", n + i as u64),
                            None => "•".to_string(),
                        };
                        let marker = if self.colored {
                            marker.blue().to_string()
                        } else {
                            marker
                        };
                        let body = self.inlines(item).replace('\n', &format!("\n{}  ", pad));
                        format!("{}{} {}", pad, marker, body)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            blocks.push(rendered);
        }

        blocks.join("\n\n")
    }

    /// Plain text with the same indentation, for short replies and user messages.
    pub fn render_plain(&self, text: &str) -> String {
        indent_lines(text, &" ".repeat(self.indent))
    }

    fn inlines(&self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) => out.push_str(text),
                Inline::Strong(children) => {
                    let inner = self.inlines(children);
                    if self.colored {
                        out.push_str(&inner.bold().to_string());
                    } else {
                        out.push_str(&format!("**{}**", inner));
                    }
                }
                Inline::Emphasis(children) => {
                    let inner = self.inlines(children);
                    if self.colored {
                        out.push_str(&inner.italic().to_string());
                    } else {
                        out.push_str(&format!("_{}_", inner));
                    }
                }
                Inline::Code(code) => {
                    if self.colored {
                        out.push_str(&code.yellow().to_string());
                    } else {
                        out.push_str(&format!("`{}`", code));
                    }
                }
                Inline::LineBreak => out.push('\n'),
            }
        }
        out
    }

    fn dim(&self, text: &str) -> String {
        if self.colored {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

fn indent_lines(text: &str, pad: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(source: &str) -> String {
        TerminalRenderer::new(false).render(&Document::parse(source))
    }

    #[test]
    fn test_plain_rendering_keeps_markers() {
        assert_eq!(plain("**bold** `code`"), "    **bold** `code`");
        assert_eq!(plain("# Title"), "    TITLE");
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(plain("- a\n- b"), "    • a\n    • b");
        assert_eq!(plain("2. a\n3. b"), "    2. a\n    3. b");
    }

    #[test]
    fn test_code_block_framed() {
        assert_eq!(
            plain("```sh\nls\npwd\n```"),
            "    ┌ sh\n    │ ls\n    │ pwd"
        );
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        assert_eq!(plain("one\n\ntwo"), "    one\n\n    two");
    }

    #[test]
    fn test_colored_output_contains_text() {
        let out = TerminalRenderer::new(true).render(&Document::parse("**hi**"));
        assert!(out.contains("hi"));
        assert!(out.contains('\u{1b}'));
    }
}
