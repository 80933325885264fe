//! XML text to [`Element`] tree.

use quick_xml::{Reader, events::BytesStart, events::Event};

use crate::xml::{Attribute, Element, XmlError};

/// Parses a whole document into its root element.
///
/// Comments, processing instructions, and the XML declaration are dropped,
/// as is whitespace that only separates elements. Text content comes back
/// exactly as written, with entity references decoded. Anything structurally
/// wrong (bad nesting, stray top-level content, no root at all) is an error.
pub fn parse(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);

    // open elements, innermost last
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    // the reader hands text over in chunks, split at entity references.
    // a whitespace-only chunk is ambiguous on its own: indentation between
    // tags, or a gap between two entities in real content. hold it until
    // the next event settles which one it was.
    let mut held_whitespace = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                held_whitespace.clear();
                stack.push(element_from_start(&start)?);
            }

            Event::Empty(start) => {
                held_whitespace.clear();
                let element = element_from_start(&start)?;
                place(element, &mut stack, &mut root)?;
            }

            Event::End(_) => {
                held_whitespace.clear();
                // quick-xml checks tag balance for us, so an end event
                // always has an open element to close
                let Some(element) = stack.pop() else {
                    return Err(XmlError::TrailingContent);
                };
                place(element, &mut stack, &mut root)?;
            }

            Event::Text(text) => {
                let chunk = text.decode().map_err(quick_xml::Error::from)?;
                if chunk.trim().is_empty() {
                    if !stack.is_empty() {
                        held_whitespace.push_str(&chunk);
                    }
                    continue;
                }
                let parent = content_parent(&mut stack, &mut held_whitespace)?;
                append_text(parent, &chunk);
            }

            // CDATA is literal text; nothing to decode further
            Event::CData(data) => {
                let chunk = core::str::from_utf8(&data).map_err(XmlError::NotUtf8)?;
                let parent = content_parent(&mut stack, &mut held_whitespace)?;
                append_text(parent, chunk);
            }

            // entity references come through as their own events; fold the
            // resolved character back into the surrounding text
            Event::GeneralRef(data) => {
                let name = core::str::from_utf8(&data).map_err(XmlError::NotUtf8)?;
                let resolved = resolve_entity(name)
                    .ok_or_else(|| XmlError::UnresolvedEntity(name.to_string()))?;
                let parent = content_parent(&mut stack, &mut held_whitespace)?;
                append_char(parent, resolved);
            }

            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}

            Event::Eof => break,
        }
    }

    root.ok_or(XmlError::NoRootElement)
}

/// The element about to receive content, with any held whitespace put back
/// in front of it.
fn content_parent<'a>(
    stack: &'a mut [Element],
    held_whitespace: &mut String,
) -> Result<&'a mut Element, XmlError> {
    let Some(parent) = stack.last_mut() else {
        return Err(XmlError::TrailingContent);
    };
    if !held_whitespace.is_empty() {
        append_text(parent, held_whitespace);
        held_whitespace.clear();
    }
    Ok(parent)
}

/// Attaches a finished element to its parent, or makes it the root.
fn place(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None => {
            if root.is_some() {
                return Err(XmlError::TrailingContent);
            }
            *root = Some(element);
        }
    }
    Ok(())
}

/// Builds an element (name + attributes) from an opening tag.
fn element_from_start(start: &BytesStart) -> Result<Element, XmlError> {
    let qname = start.name();
    let name = core::str::from_utf8(qname.as_ref()).map_err(XmlError::NotUtf8)?;
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr?;
        let key = core::str::from_utf8(attr.key.as_ref()).map_err(XmlError::NotUtf8)?;
        let value = attr.unescape_value()?;
        element
            .attributes
            .push(Attribute::new(key, value.into_owned()));
    }

    Ok(element)
}

fn append_text(element: &mut Element, chunk: &str) {
    match &mut element.text {
        Some(text) => text.push_str(chunk),
        None => element.text = Some(chunk.to_string()),
    }
}

fn append_char(element: &mut Element, c: char) {
    match &mut element.text {
        Some(text) => text.push(c),
        None => element.text = Some(c.to_string()),
    }
}

/// Resolves the predefined XML entities plus numeric character references.
///
/// OPF documents don't declare custom entities, so anything else is
/// unresolvable here.
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let code = if let Some(hex) = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}
