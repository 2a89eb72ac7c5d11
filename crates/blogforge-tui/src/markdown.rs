//! Markdown-to-ratatui conversion for assistant bubbles.
//!
//! Turns the generated Markdown into styled [`Line`]s: colored headings,
//! bold/italic emphasis, highlighted inline code and code blocks, bullet
//! lists, block quotes, and horizontal rules. Line wrapping is left to
//! the paragraph widget.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Convert a Markdown string into styled [`Line`]s.
pub fn markdown_lines(md: &str) -> Vec<Line<'static>> {
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut styles: Vec<Style> = vec![Style::default()];
    let mut list_depth: usize = 0;

    fn flush(out: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>) {
        out.push(Line::from(std::mem::take(spans)));
    }

    fn top(styles: &[Style]) -> Style {
        styles.last().copied().unwrap_or_default()
    }

    let parser = Parser::new_ext(md, Options::empty());
    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
                if !out.is_empty() {
                    out.push(Line::default());
                }
                styles.push(heading_style(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                styles.pop();
                flush(&mut out, &mut spans);
            }
            Event::Start(Tag::Paragraph) => {
                if !out.is_empty() && list_depth == 0 {
                    out.push(Line::default());
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
            }
            Event::Start(Tag::Strong) => {
                styles.push(top(&styles).add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Strong) => {
                styles.pop();
            }
            Event::Start(Tag::Emphasis) => {
                styles.push(top(&styles).add_modifier(Modifier::ITALIC));
            }
            Event::End(TagEnd::Emphasis) => {
                styles.pop();
            }
            Event::Start(Tag::List(_)) => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                let indent = "  ".repeat(list_depth);
                spans.push(Span::styled(
                    format!("{indent}\u{2022} "),
                    Style::default().fg(Color::Green),
                ));
            }
            Event::End(TagEnd::Item) => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
            }
            Event::Start(Tag::BlockQuote(_)) => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
                styles.push(top(&styles).fg(Color::DarkGray));
                spans.push(Span::styled("\u{258e} ", Style::default().fg(Color::DarkGray)));
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
                styles.pop();
            }
            Event::Start(Tag::CodeBlock(_)) => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
                styles.push(Style::default().fg(Color::Cyan));
            }
            Event::End(TagEnd::CodeBlock) => {
                styles.pop();
            }
            Event::Text(text) => {
                let style = top(&styles);
                // Code blocks deliver multi-line text in one event.
                let mut first = true;
                for part in text.lines() {
                    if !first {
                        flush(&mut out, &mut spans);
                    }
                    spans.push(Span::styled(part.to_string(), style));
                    first = false;
                }
                if text.ends_with('\n') {
                    flush(&mut out, &mut spans);
                }
            }
            Event::Code(code) => {
                spans.push(Span::styled(
                    format!("`{code}`"),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak => {
                spans.push(Span::raw(" "));
            }
            Event::HardBreak => {
                flush(&mut out, &mut spans);
            }
            Event::Rule => {
                if !spans.is_empty() {
                    flush(&mut out, &mut spans);
                }
                out.push(Line::from(Span::styled(
                    "\u{2500}".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }

    if !spans.is_empty() {
        out.push(Line::from(spans));
    }

    out
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
        HeadingLevel::H2 => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        HeadingLevel::H3 => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_text(md: &str) -> Vec<String> {
        markdown_lines(md)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn heading_and_paragraph() {
        let lines = rendered_text("# Title\n\nSome body text.");
        assert!(lines.contains(&"Title".to_string()));
        assert!(lines.contains(&"Some body text.".to_string()));
    }

    #[test]
    fn heading_is_bold() {
        let lines = markdown_lines("# Title");
        let title = lines.iter().find(|l| !l.spans.is_empty()).unwrap();
        assert!(title.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn list_items_get_bullets() {
        let lines = rendered_text("- alpha\n- beta");
        assert!(lines.iter().any(|l| l.contains("\u{2022} alpha")));
        assert!(lines.iter().any(|l| l.contains("\u{2022} beta")));
    }

    #[test]
    fn nested_lists_indent_further() {
        let lines = rendered_text("- outer\n  - inner");
        let outer = lines.iter().find(|l| l.contains("outer")).unwrap();
        let inner = lines.iter().find(|l| l.contains("inner")).unwrap();
        let leading = |s: &str| s.chars().take_while(|c| *c == ' ').count();
        assert!(leading(inner) > leading(outer));
    }

    #[test]
    fn inline_code_kept_with_backticks() {
        let lines = rendered_text("use `cargo` here");
        assert!(lines.iter().any(|l| l.contains("`cargo`")));
    }

    #[test]
    fn code_block_splits_lines() {
        let lines = rendered_text("```\nline one\nline two\n```");
        assert!(lines.contains(&"line one".to_string()));
        assert!(lines.contains(&"line two".to_string()));
    }

    #[test]
    fn soft_break_joins_with_space() {
        let lines = rendered_text("first\nsecond");
        assert!(lines.iter().any(|l| l.contains("first second")));
    }

    #[test]
    fn rule_renders_a_divider() {
        let lines = rendered_text("above\n\n---\n\nbelow");
        assert!(lines.iter().any(|l| l.contains('\u{2500}')));
    }

    #[test]
    fn plain_text_survives_unchanged() {
        let lines = rendered_text("just words");
        assert!(lines.contains(&"just words".to_string()));
    }
}
