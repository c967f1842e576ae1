use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts, Style, StyleType};

use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// One line of rendered template output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading { text: &'a str, level: u8 },
    Bullet(&'a str),
    /// `>> text`: right-aligned, used for the signature block.
    Signature(&'a str),
    Body(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Line::Blank
        } else if let Some(text) = trimmed.strip_prefix("### ") {
            Line::Heading { text, level: 3 }
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            Line::Heading { text, level: 2 }
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            Line::Heading { text, level: 1 }
        } else if let Some(text) = trimmed.strip_prefix("- ") {
            Line::Bullet(text)
        } else if let Some(text) = trimmed.strip_prefix(">> ") {
            Line::Signature(text)
        } else {
            Line::Body(trimmed)
        }
    }
}

/// Generate a DOCX document from rendered template output.
///
/// The `rendered` content uses a small Markdown-like subset: `#`/`##`/`###`
/// headings, `- ` bullets, `>> ` right-aligned signature lines and
/// `**bold**` inline runs. Consecutive blank lines collapse into one empty
/// paragraph.
pub fn generate_docx(rendered: &str, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .add_style(heading_style("Heading1", "heading 1", styles.heading1_size))
        .add_style(heading_style("Heading2", "heading 2", styles.heading2_size))
        .add_style(heading_style("Heading3", "heading 3", styles.heading3_size));

    let mut previous_blank = true;
    for line in rendered.lines().map(Line::classify) {
        let is_blank = line == Line::Blank;
        let paragraph = match line {
            Line::Blank if previous_blank => continue,
            Line::Blank => Paragraph::new(),
            Line::Heading { text, level } => {
                heading_paragraph(text, &format!("Heading{level}"), styles)
            }
            Line::Bullet(text) => bullet_paragraph(text, styles),
            Line::Signature(text) => {
                inline_paragraph(text, styles).align(AlignmentType::Right)
            }
            Line::Body(text) => inline_paragraph(text, styles),
        };
        previous_blank = is_blank;
        docx = docx.add_paragraph(paragraph);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // OOXML uses half-points
}

fn heading_paragraph(text: &str, style_id: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new().style(style_id).add_run(
        Run::new()
            .add_text(text)
            .fonts(RunFonts::new().ascii(&styles.heading_font)),
    )
}

fn body_run(text: &str, styles: &DocumentStyles) -> Run {
    Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.body_font))
}

fn bullet_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let bullet_run = body_run("\u{2022} ", styles);

    let mut para = Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(bullet_run);

    for run in parse_inline(text, styles) {
        para = para.add_run(run);
    }

    para
}

fn inline_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let mut para = Paragraph::new().align(AlignmentType::Left);
    for run in parse_inline(text, styles) {
        para = para.add_run(run);
    }
    para
}

/// Parse simple inline formatting: **bold** segments.
fn parse_inline(text: &str, styles: &DocumentStyles) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("**") {
        let before = &remaining[..start];
        if !before.is_empty() {
            runs.push(body_run(before, styles));
        }

        let after_start = &remaining[start + 2..];
        if let Some(end) = after_start.find("**") {
            let bold_text = &after_start[..end];
            runs.push(body_run(bold_text, styles).bold());
            remaining = &after_start[end + 2..];
        } else {
            // Unclosed marker: the rest is plain text.
            runs.push(body_run(remaining, styles));
            return runs;
        }
    }

    if !remaining.is_empty() {
        runs.push(body_run(remaining, styles));
    }

    runs
}
