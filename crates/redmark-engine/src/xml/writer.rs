//! Serializer for the main document part.
//!
//! Output is compact (no indentation) so text nodes never pick up stray
//! whitespace. Every `w:t`/`w:delText` is tagged `xml:space="preserve"`:
//! revision fragments frequently begin or end with a space next to
//! punctuation, and Word collapses untagged edge whitespace.

use crate::dom::{Block, Cell, Document, HeaderFooter, Node, Paragraph, Revision, Row, Table};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Serialize a document tree back to `document.xml`.
pub fn write_document(document: &Document) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<w:document xmlns:w="{WORD_NS}">"#));
    out.push_str("<w:body>");
    for block in &document.blocks {
        match block {
            Block::Paragraph(paragraph) => write_paragraph(&mut out, paragraph),
            Block::Table(table) => write_table(&mut out, table),
        }
    }
    out.push_str("</w:body>");
    out.push_str("</w:document>");
    out
}

/// Serialize a header or footer part (`header1.xml` / `footer1.xml`).
pub fn write_header_footer(part: &HeaderFooter, root: &str) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<w:{root} xmlns:w="{WORD_NS}">"#));
    for paragraph in &part.paragraphs {
        write_paragraph(&mut out, paragraph);
    }
    out.push_str(&format!("</w:{root}>"));
    out
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph) {
    if paragraph.nodes.is_empty() {
        out.push_str("<w:p/>");
        return;
    }
    out.push_str("<w:p>");
    for node in &paragraph.nodes {
        match node {
            Node::Run(run) => write_run(out, &run.text, "w:t"),
            Node::Insertion(revision) => {
                write_revision(out, "w:ins", revision, "w:t");
            }
            Node::Deletion(revision) => {
                write_revision(out, "w:del", revision, "w:delText");
            }
        }
    }
    out.push_str("</w:p>");
}

fn write_revision(out: &mut String, tag: &str, revision: &Revision, text_tag: &str) {
    out.push_str(&format!(
        r#"<{tag} w:id="{}" w:author="{}" w:date="{}">"#,
        revision.id,
        escape_attr(&revision.author),
        escape_attr(&revision.date),
    ));
    write_run(out, &revision.text, text_tag);
    out.push_str(&format!("</{tag}>"));
}

fn write_run(out: &mut String, text: &str, text_tag: &str) {
    out.push_str("<w:r>");
    if text.is_empty() {
        out.push_str(&format!("<{text_tag}/>"));
    } else {
        out.push_str(&format!(
            r#"<{text_tag} xml:space="preserve">{}</{text_tag}>"#,
            escape_text(text)
        ));
    }
    out.push_str("</w:r>");
}

fn write_table(out: &mut String, table: &Table) {
    out.push_str("<w:tbl>");
    for row in &table.rows {
        write_row(out, row);
    }
    out.push_str("</w:tbl>");
}

fn write_row(out: &mut String, row: &Row) {
    out.push_str("<w:tr>");
    for cell in &row.cells {
        write_cell(out, cell);
    }
    out.push_str("</w:tr>");
}

fn write_cell(out: &mut String, cell: &Cell) {
    out.push_str("<w:tc>");
    for paragraph in &cell.paragraphs {
        write_paragraph(out, paragraph);
    }
    out.push_str("</w:tc>");
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
