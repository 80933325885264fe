//! [`Element`] tree to XML text.

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::xml::{Element, XmlError};

/// Renders a tree as a complete document, declaration included.
///
/// Output is deterministic: attributes and children come out exactly in
/// stored order, indented two spaces per level, with no trailing newline.
/// Rendering the same tree twice gives identical bytes, which is what lets
/// tests diff documents textually.
pub fn render(root: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::NotUtf8(e.utf8_error()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute((attr.qualified_name().as_str(), attr.value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    let has_children = element.groups.iter().any(|g| !g.elements.is_empty());

    // nothing inside: self-close
    if text.is_none() && !has_children {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for group in &element.groups {
        for child in &group.elements {
            write_element(writer, child)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::{
        util::logger,
        xml::{Element, read::parse},
    };

    #[test]
    fn indents_and_self_closes() {
        logger();

        let mut package = Element::new("package");
        package.set_attr("version", "2.0");
        let mut metadata = Element::new("metadata");
        metadata.push_child(Element::with_text("dc:title", "Roadside Picnic"));
        metadata.push_child(Element::new("dc:language"));
        package.push_child(metadata);

        let xml = render(&package).expect("renders");
        assert_eq!(
            xml,
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<package version=\"2.0\">\n",
                "  <metadata>\n",
                "    <dc:title>Roadside Picnic</dc:title>\n",
                "    <dc:language/>\n",
                "  </metadata>\n",
                "</package>",
            ),
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        logger();

        let mut reference = Element::new("reference");
        reference.set_attr("title", "Tips & \"Tricks\"");
        reference.text = Some("a < b".to_string());

        let xml = render(&reference).expect("renders");
        assert!(xml.contains("Tips &amp; &quot;Tricks&quot;"));
        assert!(xml.contains("a &lt; b"));
    }

    #[test]
    fn parse_then_render_is_stable() {
        logger();

        let source = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<package xmlns=\"http://www.idpf.org/2007/opf\" version=\"2.0\">\n",
            "  <metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n",
            "    <dc:title>Solaris</dc:title>\n",
            "    <dc:creator opf:role=\"aut\">Stanis\u{0142}aw Lem</dc:creator>\n",
            "  </metadata>\n",
            "</package>",
        );

        let first = render(&parse(source).expect("parses")).expect("renders");
        assert_eq!(first, source);

        let second = render(&parse(&first).expect("re-parses")).expect("re-renders");
        assert_eq!(second, first);
    }
}
