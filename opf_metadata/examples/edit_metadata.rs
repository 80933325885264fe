//! Reads an OPF file, prints its main fields, and writes an edited copy
//! beside it.
//!
//! Usage: `cargo run --example edit_metadata -- path/to/metadata.opf`

use opf_metadata::{read_opf, write_opf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: edit_metadata <path-to-opf-file>");
        std::process::exit(1);
    };

    let mut opf = read_opf(&path)?;

    println!("title:  {}", opf.title().unwrap_or("(none)"));
    for author in opf.authors()? {
        println!(
            "author: {} ({})",
            author.value,
            author.role.as_deref().unwrap_or("no role"),
        );
    }
    for identifier in opf.identifiers() {
        let marker = if identifier.is_unique() { " [unique]" } else { "" };
        println!("id:     {}: {}{marker}", identifier.scheme, identifier.value);
    }
    if let Some(date) = opf.date() {
        println!("date:   {date}");
    }
    if let Some(cover) = opf.cover() {
        println!("cover:  {cover}");
    }

    // tag the description so the edit is visible in the output file
    let note = match opf.description() {
        Some(description) => format!("{description} (edited)"),
        None => "(edited)".to_string(),
    };
    opf.set_description(note);

    let target = format!("{path}.edited");
    write_opf(&target, &opf)?;
    println!("wrote:  {target}");

    Ok(())
}
