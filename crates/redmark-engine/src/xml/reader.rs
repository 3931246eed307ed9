//! Streaming parser for the main document part.
//!
//! Uses quick-xml's pull API and matches on local element names, so any
//! prefix bound to the WordprocessingML namespace is accepted. Elements the
//! model does not represent (`w:pPr`, `w:tblGrid`, bookmarks, ...) are
//! skipped at well-formed boundaries.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

use super::XmlError;
use crate::dom::{Block, Cell, Document, Node, Paragraph, Revision, Row, Table};

type XmlReader<'a> = Reader<&'a [u8]>;

/// Parse a WordprocessingML `document.xml` string into a document tree.
pub fn parse_document(xml: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    // Don't trim text - significant whitespace lives inside w:t elements
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut document = Document::new();
    let mut found_body = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"body" {
                    found_body = true;
                    parse_body(&mut reader, &mut document)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    if !found_body {
        return Err(XmlError::InvalidDocument("no w:body element".to_string()));
    }
    Ok(document)
}

fn parse_body(reader: &mut XmlReader<'_>, document: &mut Document) -> Result<(), XmlError> {
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    let paragraph = parse_paragraph(reader)?;
                    document.blocks.push(Block::Paragraph(paragraph));
                }
                b"tbl" => {
                    let table = parse_table(reader)?;
                    document.blocks.push(Block::Table(table));
                }
                _ => {
                    reader.read_to_end_into(e.name(), &mut skip_buf)?;
                }
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"p" {
                    document.blocks.push(Block::Paragraph(Paragraph::new()));
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"body" => return Ok(()),
            Event::Eof => {
                return Err(XmlError::InvalidDocument(
                    "unexpected end of input inside w:body".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_paragraph(reader: &mut XmlReader<'_>) -> Result<Paragraph, XmlError> {
    let mut paragraph = Paragraph::new();
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => {
                    let text = collect_run_text(reader, b"r")?;
                    paragraph.nodes.push(Node::run(text));
                }
                b"ins" => {
                    let revision = parse_revision(reader, &e, b"ins")?;
                    paragraph.nodes.push(Node::Insertion(revision));
                }
                b"del" => {
                    let revision = parse_revision(reader, &e, b"del")?;
                    paragraph.nodes.push(Node::Deletion(revision));
                }
                _ => {
                    reader.read_to_end_into(e.name(), &mut skip_buf)?;
                }
            },
            Event::Empty(e) if e.local_name().as_ref() == b"r" => {
                paragraph.nodes.push(Node::run(""));
            }
            Event::End(e) if e.local_name().as_ref() == b"p" => return Ok(paragraph),
            Event::Eof => {
                return Err(XmlError::InvalidDocument(
                    "unexpected end of input inside w:p".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Read `w:id`/`w:author`/`w:date` off the markup element, then its wrapped
/// run text up to the matching end tag.
fn parse_revision(
    reader: &mut XmlReader<'_>,
    start: &BytesStart<'_>,
    end_local: &[u8],
) -> Result<Revision, XmlError> {
    let mut id = 0;
    let mut author = String::new();
    let mut date = String::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlError::Parse(err.to_string()))?;
        let value = decode_attr(&attr)?;
        match attr.key.local_name().as_ref() {
            b"id" => id = value.parse().unwrap_or(0),
            b"author" => author = value,
            b"date" => date = value,
            _ => {}
        }
    }
    let text = collect_run_text(reader, end_local)?;
    Ok(Revision {
        id,
        author,
        date,
        text,
    })
}

/// Concatenate the text of every `w:t`/`w:delText` descendant until the end
/// tag named by `end_local`. Text between elements is never significant.
fn collect_run_text(reader: &mut XmlReader<'_>, end_local: &[u8]) -> Result<String, XmlError> {
    let mut text = String::new();
    let mut capturing = false;
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" | b"delText" => capturing = true,
                b"r" if end_local != b"r" => {}
                _ => {
                    reader.read_to_end_into(e.name(), &mut skip_buf)?;
                }
            },
            Event::Text(e) if capturing => {
                let raw = std::str::from_utf8(e.as_ref())
                    .map_err(|err| XmlError::Parse(err.to_string()))?;
                let unescaped = unescape(raw).map_err(|err| XmlError::Parse(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::End(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"t" | b"delText" => capturing = false,
                    local if local == end_local => return Ok(text),
                    _ => {}
                }
            }
            Event::Eof => {
                return Err(XmlError::InvalidDocument(
                    "unexpected end of input inside run".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_table(reader: &mut XmlReader<'_>) -> Result<Table, XmlError> {
    let mut table = Table::default();
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tr" => table.rows.push(parse_row(reader)?),
                _ => {
                    reader.read_to_end_into(e.name(), &mut skip_buf)?;
                }
            },
            Event::End(e) if e.local_name().as_ref() == b"tbl" => return Ok(table),
            Event::Eof => {
                return Err(XmlError::InvalidDocument(
                    "unexpected end of input inside w:tbl".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_row(reader: &mut XmlReader<'_>) -> Result<Row, XmlError> {
    let mut row = Row::default();
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tc" => row.cells.push(parse_cell(reader)?),
                _ => {
                    reader.read_to_end_into(e.name(), &mut skip_buf)?;
                }
            },
            Event::End(e) if e.local_name().as_ref() == b"tr" => return Ok(row),
            Event::Eof => {
                return Err(XmlError::InvalidDocument(
                    "unexpected end of input inside w:tr".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_cell(reader: &mut XmlReader<'_>) -> Result<Cell, XmlError> {
    let mut cell = Cell::default();
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => cell.paragraphs.push(parse_paragraph(reader)?),
                // tcPr and nested tables are skipped whole
                _ => {
                    reader.read_to_end_into(e.name(), &mut skip_buf)?;
                }
            },
            Event::Empty(e) if e.local_name().as_ref() == b"p" => {
                cell.paragraphs.push(Paragraph::new());
            }
            Event::End(e) if e.local_name().as_ref() == b"tc" => return Ok(cell),
            Event::Eof => {
                return Err(XmlError::InvalidDocument(
                    "unexpected end of input inside w:tc".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn decode_attr(attr: &Attribute<'_>) -> Result<String, XmlError> {
    let raw =
        std::str::from_utf8(&attr.value).map_err(|err| XmlError::Parse(err.to_string()))?;
    let unescaped = unescape(raw).map_err(|err| XmlError::Parse(err.to_string()))?;
    Ok(unescaped.into_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn wrap_body(body: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:document {NS}><w:body>{body}</w:body></w:document>"#)
    }

    #[test]
    fn parses_paragraphs_and_runs() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>Payment of </w:t></w:r><w:r><w:t>$500</w:t></w:r></w:p><w:p/>",
        );
        let document = parse_document(&xml).unwrap();

        assert_eq!(document.blocks.len(), 2);
        let Block::Paragraph(paragraph) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.text(), "Payment of $500");
        assert_eq!(paragraph.nodes.len(), 2);
        let Block::Paragraph(empty) = &document.blocks[1] else {
            panic!("expected paragraph");
        };
        assert!(empty.nodes.is_empty());
    }

    #[test]
    fn preserves_significant_whitespace_in_run_text() {
        let xml = wrap_body(r#"<w:p><w:r><w:t xml:space="preserve"> leading and trailing </w:t></w:r></w:p>"#);
        let document = parse_document(&xml).unwrap();
        let Block::Paragraph(paragraph) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.text(), " leading and trailing ");
    }

    #[test]
    fn unescapes_entities_in_text_and_attributes() {
        let xml = wrap_body(concat!(
            r#"<w:p><w:del w:id="7" w:author="Smith &amp; Jones" w:date="2026-01-01T00:00:00Z">"#,
            r#"<w:r><w:delText>fish &amp; chips &lt;daily&gt;</w:delText></w:r></w:del></w:p>"#,
        ));
        let document = parse_document(&xml).unwrap();
        let Block::Paragraph(paragraph) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        let Node::Deletion(revision) = &paragraph.nodes[0] else {
            panic!("expected deletion");
        };
        assert_eq!(revision.id, 7);
        assert_eq!(revision.author, "Smith & Jones");
        assert_eq!(revision.text, "fish & chips <daily>");
    }

    #[test]
    fn parses_existing_insertion_markup() {
        let xml = wrap_body(concat!(
            r#"<w:p><w:ins w:id="3" w:author="Reviewer" w:date="2026-01-01T00:00:00Z">"#,
            r#"<w:r><w:t>added</w:t></w:r></w:ins></w:p>"#,
        ));
        let document = parse_document(&xml).unwrap();
        let Block::Paragraph(paragraph) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            paragraph.nodes[0],
            Node::Insertion(Revision {
                id: 3,
                author: "Reviewer".to_string(),
                date: "2026-01-01T00:00:00Z".to_string(),
                text: "added".to_string(),
            })
        );
    }

    #[test]
    fn parses_tables_row_major() {
        let xml = wrap_body(concat!(
            "<w:tbl><w:tblGrid><w:gridCol/></w:tblGrid>",
            "<w:tr><w:tc><w:p><w:r><w:t>cell one</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:t>cell two</w:t></w:r></w:p></w:tc></w:tr>",
            "</w:tbl>",
        ));
        let document = parse_document(&xml).unwrap();
        let Block::Table(table) = &document.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells.len(), 2);
        assert_eq!(table.rows[0].cells[0].paragraphs[0].text(), "cell one");
        assert_eq!(table.rows[0].cells[1].paragraphs[0].text(), "cell two");
    }

    #[test]
    fn skips_unknown_elements_at_well_formed_boundaries() {
        let xml = wrap_body(concat!(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#,
            "<w:r><w:rPr><w:b/></w:rPr><w:t>bold text</w:t></w:r></w:p>",
            "<w:sectPr><w:pgSz/></w:sectPr>",
        ));
        let document = parse_document(&xml).unwrap();
        assert_eq!(document.blocks.len(), 1);
        let Block::Paragraph(paragraph) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.text(), "bold text");
    }

    #[test]
    fn multiple_text_elements_in_one_run_concatenate() {
        let xml = wrap_body("<w:p><w:r><w:t>first</w:t><w:t> second</w:t></w:r></w:p>");
        let document = parse_document(&xml).unwrap();
        let Block::Paragraph(paragraph) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.text(), "first second");
        assert_eq!(paragraph.nodes.len(), 1);
    }

    #[test]
    fn document_without_body_is_invalid() {
        let result = parse_document(r#"<?xml version="1.0"?><w:document/>"#);
        assert!(matches!(result, Err(XmlError::InvalidDocument(_))));
    }
}
