//! Case conversions for attribute names.
//!
//! OPF attribute names are kebab-cased on the wire (`opf:file-as`), while
//! the friendly representation uses camelCase keys (`fileAs`). `meta` tag
//! names use snake_case instead.

/// Camel-cases an attribute name, so `file-as` becomes `fileAs`.
pub(crate) fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | ' ') {
            upper_next = true;
            continue;
        }

        if out.is_empty() {
            out.extend(c.to_lowercase());
        } else if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        upper_next = false;
    }

    out
}

/// Kebab-cases an attribute name, so `fileAs` becomes `file-as`.
pub(crate) fn kebab_case(name: &str) -> String {
    delimited(name, '-')
}

/// Snake-cases an attribute name, so `authorLinkMap` becomes
/// `author_link_map`.
pub(crate) fn snake_case(name: &str) -> String {
    delimited(name, '_')
}

/// Lower-cases `name`, inserting `separator` at each word boundary.
fn delimited(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);

    for c in name.chars() {
        if matches!(c, '-' | '_' | ' ') {
            if !out.is_empty() && !out.ends_with(separator) {
                out.push(separator);
            }
        } else if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with(separator) {
                out.push(separator);
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    while out.ends_with(separator) {
        out.pop();
    }

    out
}
