use chrono::{TimeZone as _, Utc};
use opf_metadata::{DateEvent, Opf, OpfError, xml};
use serde_json::json;

const METADATA_OPF: &str = include_str!("fixtures/metadata.opf");

/// Parses the bundled Calibre-style document.
fn fixture() -> Opf {
    let document = xml::parse(METADATA_OPF).expect("the fixture is well-formed XML");
    Opf::from_document(document).expect("the fixture has a metadata element")
}

#[test]
fn reads_dublin_core_fields() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let opf = fixture();

    assert_eq!(opf.title(), Some("The Fifth Season"));
    assert_eq!(
        opf.titles(),
        vec!["The Fifth Season", "Book One of the Broken Earth"],
    );
    assert_eq!(
        opf.description(),
        Some("Humanity survives an endless Fifth Season."),
    );
    assert_eq!(opf.publishers(), vec!["Orbit"]);
    assert_eq!(opf.languages(), vec!["en"]);
    assert_eq!(opf.subjects(), vec!["Fantasy", "Science Fiction"]);

    // fields the fixture doesn't carry
    assert_eq!(opf.r#type(), None);
    assert_eq!(opf.rights(), None);
}

#[test]
fn reads_contributors_with_roles() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let opf = fixture();

    let authors = opf.authors().expect("every fixture role code is known");
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].value, "N. K. Jemisin");
    assert_eq!(authors[0].role.as_deref(), Some("Author"));
    assert_eq!(authors[0].file_as.as_deref(), Some("Jemisin, N. K."));
    assert_eq!(authors[1].value, "Lauren Panepinto");
    assert_eq!(authors[1].role.as_deref(), Some("Illustrator"));

    let contributors = opf.contributors().expect("every fixture role code is known");
    assert_eq!(contributors.len(), 1);
    assert_eq!(contributors[0].value, "calibre (5.44.0)");
    assert_eq!(contributors[0].role.as_deref(), Some("Book producer"));
}

#[test]
fn unknown_role_codes_fail_the_getter() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let document = xml::parse(
        r#"<package><metadata><dc:creator opf:role="xyz">Who?</dc:creator></metadata></package>"#,
    )
    .expect("well-formed XML");
    let opf = Opf::from_document(document).expect("has a metadata element");

    assert!(matches!(
        opf.authors(),
        Err(OpfError::UnknownRoleCode { code }) if code == "xyz",
    ));
}

#[test]
fn the_first_title_speaks_for_the_field() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let mut opf = fixture();

    opf.set_title("The Obelisk Gate");
    assert_eq!(opf.title(), Some("The Obelisk Gate"));
    assert_eq!(
        opf.titles(),
        vec!["The Obelisk Gate", "Book One of the Broken Earth"],
    );

    opf.set_titles(["The Stone Sky"]);
    assert_eq!(opf.title(), Some("The Stone Sky"));
    assert_eq!(opf.titles(), vec!["The Stone Sky"]);
}

#[test]
fn reads_dates_and_their_events() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let mut opf = fixture();

    assert_eq!(
        opf.date(),
        Some(Utc.with_ymd_and_hms(2015, 8, 4, 0, 0, 0).unwrap()),
    );

    let events = opf.date_events();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[&DateEvent::Publication],
        Utc.with_ymd_and_hms(2015, 8, 4, 0, 0, 0).unwrap(),
    );
    assert_eq!(
        events[&DateEvent::Modification],
        Utc.with_ymd_and_hms(2021, 11, 12, 8, 15, 30).unwrap(),
    );

    // adding an event leaves the others alone
    let created = Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap();
    opf.set_date_event(DateEvent::Creation, created);
    assert_eq!(opf.date_events().len(), 3);
    assert_eq!(opf.date_events()[&DateEvent::Creation], created);

    // replacing the whole field drops them
    let plain = Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap();
    opf.set_date(plain);
    assert_eq!(opf.date(), Some(plain));
    assert!(opf.date_events().is_empty());
}

#[test]
fn the_cover_comes_from_the_guide() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let mut opf = fixture();
    assert_eq!(opf.cover(), Some("cover.jpeg"));

    opf.set_cover("images/front.png");
    assert_eq!(opf.cover(), Some("images/front.png"));

    // a fresh document has no guide until a cover is set
    let mut fresh = Opf::new();
    assert_eq!(fresh.cover(), None);

    fresh.set_cover("cover.jpeg");
    assert_eq!(fresh.cover(), Some("cover.jpeg"));

    let xml = fresh.to_xml().expect("renders fine");
    assert!(xml.contains(r#"<reference type="cover" title="Cover" href="cover.jpeg"/>"#));
}

#[test]
fn meta_tags_decode_their_content() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let opf = fixture();
    let meta = opf.meta();

    assert_eq!(
        meta["calibre"]["timestamp"],
        json!("2021-11-12T08:15:30.412000+00:00"),
    );
    assert_eq!(meta["calibre"]["series"], json!("The Broken Earth"));
    assert_eq!(meta["calibre"]["seriesIndex"], json!(1.0));
    assert_eq!(meta["calibre"]["authorLinkMap"], json!({ "N. K. Jemisin": "" }));
    assert_eq!(meta["defaults"]["cover"], json!("cover"));
}

#[test]
fn merge_patches_fields_and_skips_unknown_keys() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let mut opf = fixture();

    let skipped = opf
        .merge(&json!({
            "title": "The Obelisk Gate",
            "languages": ["en", "fr"],
            "authors": ["N. K. Jemisin", { "value": "Someone Else", "role": "Editor" }],
            "bogusKey": "ignored",
            "rating": 5,
        }))
        .expect("every known key has a valid value");

    assert_eq!(skipped, vec!["bogusKey", "rating"]);
    assert_eq!(opf.title(), Some("The Obelisk Gate"));
    assert_eq!(opf.languages(), vec!["en", "fr"]);

    let authors = opf.authors().expect("roles written from the table");
    assert_eq!(authors[0].role.as_deref(), Some("Author"));
    assert_eq!(authors[1].role.as_deref(), Some("Editor"));

    // untouched fields stay put
    assert_eq!(opf.publishers(), vec!["Orbit"]);
}

#[test]
fn merge_rejects_values_of_the_wrong_shape() {
    _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();

    let mut opf = fixture();

    for wrong in [json!(1), json!([]), json!({}), json!(null), json!(true)] {
        assert!(matches!(
            opf.merge(&json!({ "title": wrong })),
            Err(OpfError::InvalidFieldType { field }) if field == "title",
        ));
    }
    assert!(matches!(
        opf.merge(&json!({ "titles": "not a list" })),
        Err(OpfError::InvalidFieldList { field, .. }) if field == "titles",
    ));
    assert!(matches!(
        opf.merge(&json!({ "titles": [1, 2] })),
        Err(OpfError::InvalidFieldList { field, .. }) if field == "titles",
    ));
    assert!(matches!(
        opf.merge(&json!({ "authors": [{ "role": "Author" }] })),
        Err(OpfError::InvalidFieldList { field, .. }) if field == "authors",
    ));
    assert!(matches!(
        opf.merge(&json!({ "date": "the other day" })),
        Err(OpfError::InvalidFieldType { field }) if field == "date",
    ));
    assert!(matches!(
        opf.merge(&json!({ "meta": { "calibre": "not a map" } })),
        Err(OpfError::InvalidFieldType { field }) if field == "meta",
    ));
    assert!(matches!(
        opf.merge(&json!("not even an object")),
        Err(OpfError::InvalidFieldList { field, .. }) if field == "patch",
    ));

    // nothing above should have landed
    assert_eq!(opf.title(), Some("The Fifth Season"));
}
