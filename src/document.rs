//! Rendering of `<urlset>` and `<sitemapindex>` documents.
//!
//! Both documents share the same layout: an XML declaration, a root element
//! carrying the sitemaps.org namespace, and one child block per entry,
//! indented by four spaces. `<loc>` values are emitted verbatim; callers are
//! expected to hand over URLs that are already XML-safe.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::constants::{SITEMAP_NAMESPACE, XML_INDENT};
use crate::error::Result;
use crate::lastmod::LastmodFormat;
use crate::types::{GeneratedFile, UrlRecord};

struct DocumentWriter {
    writer: Writer<Cursor<Vec<u8>>>,
    root: &'static str,
}

impl DocumentWriter {
    fn open(root: &'static str) -> Result<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', XML_INDENT);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut start = BytesStart::new(root);
        start.push_attribute(("xmlns", SITEMAP_NAMESPACE));
        writer.write_event(Event::Start(start))?;
        Ok(Self { writer, root })
    }

    fn entry(
        &mut self,
        element: &str,
        loc: &str,
        lastmod: Option<i64>,
        format: &LastmodFormat,
    ) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(element)))?;
        self.text_element("loc", BytesText::from_escaped(loc))?;
        // A zero timestamp means "unknown" and is omitted like a missing one.
        if let Some(timestamp) = lastmod.filter(|ts| *ts != 0) {
            let rendered = format.format(timestamp)?;
            self.text_element("lastmod", BytesText::new(&rendered))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(element)))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, text: BytesText<'_>) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(text))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.writer
            .write_event(Event::End(BytesEnd::new(self.root)))?;
        Ok(self.writer.into_inner().into_inner())
    }
}

/// Render one sitemap file. Records are written in the order given.
pub fn render_urlset(records: &[UrlRecord], format: &LastmodFormat) -> Result<Vec<u8>> {
    let mut document = DocumentWriter::open("urlset")?;
    for record in records {
        document.entry("url", &record.url, record.lastmod, format)?;
    }
    document.finish()
}

/// Render the sitemap index. Each `<loc>` is `{loc_prefix}/{location}`.
pub fn render_index(
    entries: &[GeneratedFile],
    loc_prefix: &str,
    format: &LastmodFormat,
) -> Result<Vec<u8>> {
    let mut document = DocumentWriter::open("sitemapindex")?;
    for entry in entries {
        let loc = format!("{loc_prefix}/{}", entry.location);
        document.entry("sitemap", &loc, Some(entry.lastmod), format)?;
    }
    document.finish()
}
