//! Terminal markdown renderer: converts result markdown to ANSI-styled text.
//!
//! Parsing is delegated to pulldown-cmark; this module only maps its event
//! stream onto escape codes for bold, italic, inline code, code blocks,
//! headings, lists, blockquotes, and links.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// ANSI escape codes for terminal formatting.
pub(crate) mod ansi {
    pub const BOLD_ON: &str = "\x1b[1m";
    pub const BOLD_OFF: &str = "\x1b[22m";
    pub const ITALIC_ON: &str = "\x1b[3m";
    pub const ITALIC_OFF: &str = "\x1b[23m";
    pub const DIM_ON: &str = "\x1b[2m";
    pub const DIM_OFF: &str = "\x1b[22m";
    pub const CYAN: &str = "\x1b[36m";
    pub const UNDERLINE_ON: &str = "\x1b[4m";
    pub const UNDERLINE_OFF: &str = "\x1b[24m";
    pub const RED_BOLD: &str = "\x1b[1;31m";
    pub const RESET: &str = "\x1b[0m";
}

/// Renders markdown into a string ready to print to the terminal.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::new();
    // Some(start) for ordered lists, None for bullets.
    let mut list_stack: Vec<Option<u64>> = Vec::new();
    let mut link_stack: Vec<String> = Vec::new();

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => {
                    out.push_str(ansi::BOLD_ON);
                    out.push_str(ansi::UNDERLINE_ON);
                    for _ in 0..heading_depth(level) {
                        out.push('#');
                    }
                    out.push(' ');
                }
                Tag::BlockQuote(_) => out.push_str(ansi::DIM_ON),
                Tag::CodeBlock(kind) => {
                    if let CodeBlockKind::Fenced(language) = &kind {
                        if !language.is_empty() {
                            out.push_str(ansi::DIM_ON);
                            out.push_str(language);
                            out.push_str(ansi::DIM_OFF);
                            out.push('\n');
                        }
                    }
                    out.push_str(ansi::DIM_ON);
                }
                Tag::List(start) => list_stack.push(start),
                Tag::Item => {
                    let depth = list_stack.len().saturating_sub(1);
                    for _ in 0..depth {
                        out.push_str("  ");
                    }
                    match list_stack.last_mut() {
                        Some(Some(number)) => {
                            out.push_str(&format!("{number}. "));
                            *number += 1;
                        }
                        _ => out.push_str("- "),
                    }
                }
                Tag::Emphasis => out.push_str(ansi::ITALIC_ON),
                Tag::Strong => out.push_str(ansi::BOLD_ON),
                Tag::Link { dest_url, .. } => {
                    link_stack.push(dest_url.to_string());
                    out.push_str(ansi::UNDERLINE_ON);
                }
                _ => {}
            },
            Event::End(end) => match end {
                TagEnd::Heading(_) => {
                    out.push_str(ansi::RESET);
                    out.push_str("\n\n");
                }
                TagEnd::Paragraph => out.push_str("\n\n"),
                TagEnd::BlockQuote(_) => out.push_str(ansi::DIM_OFF),
                TagEnd::CodeBlock => {
                    out.push_str(ansi::DIM_OFF);
                    out.push('\n');
                }
                TagEnd::List(_) => {
                    list_stack.pop();
                    if list_stack.is_empty() {
                        out.push('\n');
                    }
                }
                TagEnd::Item => out.push('\n'),
                TagEnd::Emphasis => out.push_str(ansi::ITALIC_OFF),
                TagEnd::Strong => out.push_str(ansi::BOLD_OFF),
                TagEnd::Link => {
                    out.push_str(ansi::UNDERLINE_OFF);
                    if let Some(url) = link_stack.pop() {
                        out.push_str(ansi::DIM_ON);
                        out.push_str(&format!(" ({url})"));
                        out.push_str(ansi::DIM_OFF);
                    }
                }
                _ => {}
            },
            Event::Text(text) => out.push_str(&text),
            Event::Code(code) => {
                out.push_str(ansi::CYAN);
                out.push_str(&code);
                out.push_str(ansi::RESET);
            }
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => {
                out.push_str(ansi::DIM_ON);
                out.push_str("----------------------------------------");
                out.push_str(ansi::DIM_OFF);
                out.push_str("\n\n");
            }
            Event::TaskListMarker(checked) => {
                out.push_str(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    let trimmed = out.trim_end_matches('\n');
    format!("{trimmed}\n")
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
