//! fOS HTML Parser
//!
//! HTML5 parser built on html5ever. Produces `fos-dom` documents and can
//! splice parsed fragments into a live tree.

mod parser;

pub use parser::HtmlParser;
pub use fos_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
