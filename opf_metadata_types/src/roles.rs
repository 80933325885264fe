//! The MARC relator table OPF uses for contributor roles.
//!
//! OPF stores a contributor's role as a three-letter code in the `opf:role`
//! attribute, like `aut` for an author. This module maps those codes to
//! human-readable names (and back), so callers never have to deal with the
//! codes themselves.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Creates the entire `Role` enum from all its variants.
///
/// However, this macro also allows moving lots of data into one place, which
/// is nice for maintenance!
macro_rules! create_roles_enum {
    ($( $variant_ident:ident = $code:expr => {
        name: $name:expr,
        description: $description:expr,
    }, )+) => {
        /// A contributor role from the MARC relator list.
        ///
        /// This is a closed table. Codes outside it don't map to a `Role`,
        /// and callers decide how harshly to treat that.
        #[non_exhaustive]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum Role {
            $(
              $variant_ident,
            )+
        }

        impl Role {
            /// Every role in the table, in relator-list order.
            pub const ALL: &'static [Role] = &[
                $( Role::$variant_ident, )+
            ];

            /// Grabs a role's three-letter relator code.
            ///
            /// ```
            /// use opf_metadata_types::roles::Role;
            ///
            /// let author: Role = Role::Author;
            /// assert_eq!(author.code(), "aut");
            /// ```
            pub const fn code(&self) -> &'static str {
                match self {
                    $( Role::$variant_ident => $code, )+
                }
            }

            /// Grabs a role's human-readable name.
            ///
            /// ```
            /// use opf_metadata_types::roles::Role;
            ///
            /// let author: Role = Role::Author;
            /// assert_eq!(author.name(), "Author");
            /// ```
            pub const fn name(&self) -> &'static str {
                match self {
                    $( Role::$variant_ident => $name, )+
                }
            }

            /// Grabs a role's usage notes, as written in the relator list.
            ///
            /// ```
            /// use opf_metadata_types::roles::Role;
            ///
            /// let lyricist: Role = Role::Lyricist;
            /// assert!(lyricist.description().contains("text of a song"));
            /// ```
            pub const fn description(&self) -> &'static str {
                match self {
                    $( Role::$variant_ident => $description, )+
                }
            }

            /// Looks up a role by its three-letter relator code.
            ///
            /// Returns `None` for codes outside the table.
            ///
            /// ```
            /// use opf_metadata_types::roles::Role;
            ///
            /// assert_eq!(Role::from_code("edt"), Some(Role::Editor));
            /// assert_eq!(Role::from_code("xyz"), None);
            /// ```
            pub fn from_code(code: &str) -> Option<Role> {
                match code {
                    $( $code => Some(Role::$variant_ident), )+
                    _ => None,
                }
            }
        }
    }
}

impl Role {
    /// Looks up a role by its human-readable name.
    ///
    /// Returns `None` for names outside the table. Serialization paths that
    /// need a code no matter what should fall back to [`Role::Author`], the
    /// role OPF tooling conventionally assumes.
    ///
    /// ```
    /// use opf_metadata_types::roles::Role;
    ///
    /// assert_eq!(Role::from_name("Translator"), Some(Role::Translator));
    /// assert_eq!(Role::from_name("Benevolent Dictator"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Role> {
        NAME_TO_ROLE.get(name).copied()
    }
}

/// A map, (key, value), where:
///
/// - `key` is a role's human-readable name
/// - `value` is the matching [`Role`]
///
/// Built once from the table, since name lookups happen on every serialized
/// contributor.
static NAME_TO_ROLE: LazyLock<FxHashMap<&'static str, Role>> = LazyLock::new(|| {
    let mut m: FxHashMap<&'static str, Role> = FxHashMap::default();
    for role in Role::ALL {
        m.insert(role.name(), *role);
    }
    m
});

create_roles_enum! {
    Adapter = "adp" => {
        name: "Adapter",
        description: "Use for a person who 1) reworks a musical composition, usually for a different medium, or 2) rewrites novels or stories for motion pictures or other audiovisual medium.",
    },
    Annotator = "ann" => {
        name: "Annotator",
        description: "Use for a person who writes manuscript annotations on a printed item.",
    },
    Arranger = "arr" => {
        name: "Arranger",
        description: "Use for a person who transcribes a musical composition, usually for a different medium from that of the original; in an arrangement the musical substance remains essentially unchanged.",
    },
    Artist = "art" => {
        name: "Artist",
        description: "Use for a person (e.g., a painter) who conceives, and perhaps also implements, an original graphic design or work of art, if specific codes (e.g., [egr], [etr]) are not desired. For book illustrators, prefer Illustrator [ill].",
    },
    AssociatedName = "asn" => {
        name: "Associated name",
        description: "Use as a general relator for a name associated with or found in an item or collection, or which cannot be determined to be that of a Former owner [fmo] or other designated relator indicative of provenance.",
    },
    Author = "aut" => {
        name: "Author",
        description: "Use for a person or corporate body chiefly responsible for the intellectual or artistic content of a work. This term may also be used when more than one person or body bears such responsibility.",
    },
    AuthorInQuotations = "aqt" => {
        name: "Author in quotations or text extracts",
        description: "Use for a person whose work is largely quoted or extracted in a works to which he or she did not contribute directly. Such quotations are found particularly in exhibition catalogs, collections of photographs, etc.",
    },
    AuthorOfAfterword = "aft" => {
        name: "Author of afterword, colophon, etc.",
        description: "Use for a person or corporate body responsible for an afterword, postface, colophon, etc. but who is not the chief author of a work.",
    },
    AuthorOfIntroduction = "aui" => {
        name: "Author of introduction, etc.",
        description: "Use for a person or corporate body responsible for an introduction, preface, foreword, or other critical matter, but who is not the chief author.",
    },
    BibliographicAntecedent = "ant" => {
        name: "Bibliographic antecedent",
        description: "Use for the author responsible for a work upon which the work represented by the catalog record is based. This can be appropriate for adaptations, sequels, continuations, indexes, etc.",
    },
    BookProducer = "bkp" => {
        name: "Book producer",
        description: "Use for the person or firm responsible for the production of books and other print media, if specific codes (e.g., [bkd], [egr], [tyd], [prt]) are not desired.",
    },
    Collaborator = "clb" => {
        name: "Collaborator",
        description: "Use for a person or corporate body that takes a limited part in the elaboration of a work of another author or that brings complements (e.g., appendices, notes) to the work of another author.",
    },
    Commentator = "cmm" => {
        name: "Commentator",
        description: "Use for a person who provides interpretation, analysis, or a discussion of the subject matter on a recording, motion picture, or other audiovisual medium. Compiler [com] Use for a person who produces a work or publication by selecting and putting together material from the works of various persons or bodies.",
    },
    Designer = "dsr" => {
        name: "Designer",
        description: "Use for a person or organization responsible for design if specific codes (e.g., [bkd], [tyd]) are not desired.",
    },
    Editor = "edt" => {
        name: "Editor",
        description: "Use for a person who prepares for publication a work not primarily his/her own, such as by elucidating text, adding introductory or other critical matter, or technically directing an editorial staff.",
    },
    Illustrator = "ill" => {
        name: "Illustrator",
        description: "Use for the person who conceives, and perhaps also implements, a design or illustration, usually to accompany a written text.",
    },
    Lyricist = "lyr" => {
        name: "Lyricist",
        description: "Use for the writer of the text of a song.",
    },
    MetadataContact = "mdc" => {
        name: "Metadata contact",
        description: "Use for the person or organization primarily responsible for compiling and maintaining the original description of a metadata set (e.g., geospatial metadata set).",
    },
    Musician = "mus" => {
        name: "Musician",
        description: "Use for the person who performs music or contributes to the musical content of a work when it is not possible or desirable to identify the function more precisely.",
    },
    Narrator = "nrt" => {
        name: "Narrator",
        description: "Use for the speaker who relates the particulars of an act, occurrence, or course of events.",
    },
    Other = "oth" => {
        name: "Other",
        description: "Use for relator codes from other lists which have no equivalent in the MARC list or for terms which have not been assigned a code.",
    },
    Photographer = "pht" => {
        name: "Photographer",
        description: "Use for the person or organization responsible for taking photographs, whether they are used in their original form or as reproductions.",
    },
    Printer = "prt" => {
        name: "Printer",
        description: "Use for the person or organization who prints texts, whether from type or plates.",
    },
    Redactor = "red" => {
        name: "Redactor",
        description: "Use for a person who writes or develops the framework for an item without being intellectually responsible for its content.",
    },
    Reviewer = "rev" => {
        name: "Reviewer",
        description: "Use for a person or corporate body responsible for the review of book, motion picture, performance, etc.",
    },
    Sponsor = "spn" => {
        name: "Sponsor",
        description: "Use for the person or agency that issued a contract, or under whose auspices a work has been written, printed, published, etc.",
    },
    ThesisAdvisor = "ths" => {
        name: "Thesis advisor",
        description: "Use for the person under whose supervision a degree candidate develops and presents a thesis, memoir, or text of a dissertation.",
    },
    Transcriber = "trc" => {
        name: "Transcriber",
        description: "Use for a person who prepares a handwritten or typewritten copy from original material, including from dictated or orally recorded material.",
    },
    Translator = "trl" => {
        name: "Translator",
        description: "Use for a person who renders a text from one language into another, or from an older form of a language into the modern form.",
    },
}
