use opf_metadata::{Opf, OpfError, read_opf, write_opf, xml};

const DEFAULT_OPF: &str = include_str!("fixtures/default.opf");
const METADATA_OPF: &str = include_str!("fixtures/metadata.opf");

/// Parses the bundled Calibre-style document.
fn fixture() -> Opf {
    let document = xml::parse(METADATA_OPF).expect("the fixture is well-formed XML");
    Opf::from_document(document).expect("the fixture has a metadata element")
}

#[test]
fn an_empty_document_renders_byte_for_byte() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let rendered = Opf::new().to_xml().expect("renders fine");
    assert_eq!(format!("{rendered}\n"), DEFAULT_OPF);
}

#[test]
fn an_untouched_document_is_a_render_fixed_point() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    // no accessor has run here, so even the `meta` tags pass through
    // in their original order
    let rendered = fixture().to_xml().expect("renders fine");
    assert_eq!(format!("{rendered}\n"), METADATA_OPF);
}

#[test]
fn reparsing_preserves_every_field() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let first = fixture();
    let first_xml = {
        // reading the meta tags first means they re-render in their
        // canonical order
        let _ = first.meta();
        first.to_xml().expect("renders fine")
    };

    let second = Opf::from_document(xml::parse(&first_xml).expect("our own output parses"))
        .expect("our own output keeps its metadata element");

    assert_eq!(first.title(), second.title());
    assert_eq!(first.titles(), second.titles());
    assert_eq!(first.description(), second.description());
    assert_eq!(first.publishers(), second.publishers());
    assert_eq!(first.languages(), second.languages());
    assert_eq!(first.subjects(), second.subjects());
    assert_eq!(
        first.authors().expect("roles are known"),
        second.authors().expect("roles are known"),
    );
    assert_eq!(
        first.contributors().expect("roles are known"),
        second.contributors().expect("roles are known"),
    );
    assert_eq!(first.identifiers(), second.identifiers());
    assert_eq!(first.unique_identifier_key(), second.unique_identifier_key());
    assert_eq!(first.date(), second.date());
    assert_eq!(first.date_events(), second.date_events());
    assert_eq!(first.cover(), second.cover());
    assert_eq!(first.meta(), second.meta());

    let second_xml = second.to_xml().expect("renders fine");
    assert_eq!(first_xml, second_xml);
}

#[test]
fn escaped_ampersands_survive_a_round_trip() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let document = xml::parse(concat!(
        r#"<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="uuid_id">"#,
        "\n",
        r#"  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
        "\n",
        r#"    <dc:title>War &amp; Peace</dc:title>"#,
        "\n",
        r#"    <dc:publisher>Simon &amp; Schuster</dc:publisher>"#,
        "\n",
        r#"  </metadata>"#,
        "\n",
        r#"</package>"#,
    ))
    .expect("well-formed document");
    let opf = Opf::from_document(document).expect("the document has a metadata element");

    assert_eq!(opf.title(), Some("War & Peace"));
    assert_eq!(opf.publishers(), vec!["Simon & Schuster"]);

    let rendered = opf.to_xml().expect("renders fine");
    assert!(rendered.contains("<dc:title>War &amp; Peace</dc:title>"));
    assert!(rendered.contains("<dc:publisher>Simon &amp; Schuster</dc:publisher>"));
}

#[test]
fn documents_round_trip_through_disk() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let dir = tempfile::tempdir().expect("can make a temp dir");
    let source = dir.path().join("metadata.opf");
    let target = dir.path().join("edited.opf");

    std::fs::write(&source, METADATA_OPF).expect("can seed the temp file");

    let mut opf = read_opf(&source).expect("the fixture reads back");
    assert_eq!(opf.title(), Some("The Fifth Season"));

    opf.set_title("The Obelisk Gate");
    write_opf(&target, &opf).expect("the edited document writes out");

    let written = std::fs::read_to_string(&target).expect("the file exists");
    assert!(written.contains("<dc:title>The Obelisk Gate</dc:title>"));
    // the manifest the model never looked at is still there
    assert!(written.contains(r#"<item href="cover.jpeg" id="cover" media-type="image/jpeg"/>"#));

    let reread = read_opf(&target).expect("the edited document reads back");
    assert_eq!(reread.title(), Some("The Obelisk Gate"));
    assert_eq!(reread.titles()[1], "Book One of the Broken Earth");
}

#[test]
fn missing_files_surface_io_errors() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let dir = tempfile::tempdir().expect("can make a temp dir");
    assert!(matches!(
        read_opf(dir.path().join("nowhere.opf")),
        Err(OpfError::Io(_)),
    ));
}
