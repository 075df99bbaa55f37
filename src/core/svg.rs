use roxmltree::{Document, ParsingOptions};

use crate::error::ProtocolViolation;

/// Parses chart markup, allowing the DOCTYPE declarations SVG producers emit.
pub(crate) fn parse_svg_document(markup: &str) -> Result<Document<'_>, ProtocolViolation> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(markup, options)
        .map_err(|err| ProtocolViolation::MalformedSvg(err.to_string()))?;
    let root = document.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ProtocolViolation::MalformedSvg(format!(
            "root element is <{}>",
            root.tag_name().name()
        )));
    }
    Ok(document)
}
