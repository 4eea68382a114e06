//! Conformance profiles and the object-graph composer.
//!
//! A [`ConformanceProfile`] decides which optional structural objects a
//! fixture carries and what its embedded metadata claims. The composer
//! builds the object graph in a fixed order (catalog, pages, page, content
//! stream, then metadata and output intent) so offsets are deterministic
//! and regenerated fixtures stay byte-identical.

use crate::document::Document;
use crate::object::{Object, ObjectRef};
use crate::serializer::{FileHeader, ObjectSerializer};

/// Conformance profile a fixture is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConformanceProfile {
    /// Plain PDF 1.7, no conformance claims
    Pdf17,
    /// PDF/A-1b: basic conformance, PDF 1.4 based
    PdfA1b,
    /// PDF/A-2u: PDF 1.7 based, basic conformance plus Unicode mapping
    PdfA2u,
}

impl ConformanceProfile {
    /// PDF version written in the header line.
    pub fn version(&self) -> &'static str {
        match self {
            ConformanceProfile::Pdf17 | ConformanceProfile::PdfA2u => "1.7",
            ConformanceProfile::PdfA1b => "1.4",
        }
    }

    /// Whether the header carries the binary-marker comment line.
    ///
    /// PDF/A recommends it; the baseline fixture goes without.
    pub fn has_binary_marker(&self) -> bool {
        !matches!(self, ConformanceProfile::Pdf17)
    }

    /// The header for this profile's fixtures.
    pub fn header(&self) -> FileHeader {
        FileHeader {
            version: self.version(),
            binary_marker: self.has_binary_marker(),
        }
    }

    /// The XMP `pdfaid:part` value, for PDF/A profiles.
    pub fn xmp_part(&self) -> Option<&'static str> {
        match self {
            ConformanceProfile::Pdf17 => None,
            ConformanceProfile::PdfA1b => Some("1"),
            ConformanceProfile::PdfA2u => Some("2"),
        }
    }

    /// The XMP `pdfaid:conformance` letter, for PDF/A profiles.
    pub fn conformance_letter(&self) -> Option<char> {
        match self {
            ConformanceProfile::Pdf17 => None,
            ConformanceProfile::PdfA1b => Some('B'),
            ConformanceProfile::PdfA2u => Some('U'),
        }
    }

    /// Whether this profile requires an embedded metadata stream.
    pub fn requires_metadata(&self) -> bool {
        !matches!(self, ConformanceProfile::Pdf17)
    }

    /// Whether this profile requires an output intent.
    pub fn requires_output_intent(&self) -> bool {
        !matches!(self, ConformanceProfile::Pdf17)
    }

    /// Whether the catalog asserts tagged/marked content.
    pub fn requires_mark_info(&self) -> bool {
        matches!(self, ConformanceProfile::PdfA2u)
    }

    /// Human-readable profile name, used in fixture banner text.
    pub fn label(&self) -> &'static str {
        match self {
            ConformanceProfile::Pdf17 => "PDF 1.7",
            ConformanceProfile::PdfA1b => "PDF/A-1b",
            ConformanceProfile::PdfA2u => "PDF/A-2u",
        }
    }
}

impl std::fmt::Display for ConformanceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Output condition identifier declared by the output intent.
const OUTPUT_CONDITION: &str = "sRGB IEC61966-2.1";

/// XMP packet id required by the xpacket framing.
const XPACKET_ID: &str = "W5M0MpCehiHzreSzNTczkc9d";

/// Fixed-schema XMP packet declaring a PDF/A part and conformance letter.
#[derive(Debug, Clone, Copy)]
pub struct XmpPacket {
    part: &'static str,
    conformance: char,
}

impl XmpPacket {
    /// Create a packet for the given profile's claims.
    ///
    /// Returns `None` for profiles without conformance claims.
    pub fn for_profile(profile: ConformanceProfile) -> Option<Self> {
        Some(Self {
            part: profile.xmp_part()?,
            conformance: profile.conformance_letter()?,
        })
    }

    /// Render the packet as its XML byte payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut xml = String::new();
        xml.push_str(&format!("<?xpacket begin=\"\" id=\"{}\"?>\n", XPACKET_ID));
        xml.push_str("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\n");
        xml.push_str("  <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\n");
        xml.push_str("    <rdf:Description rdf:about=\"\"\n");
        xml.push_str("        xmlns:pdfaid=\"http://www.aiim.org/pdfa/ns/id/\">\n");
        xml.push_str(&format!("      <pdfaid:part>{}</pdfaid:part>\n", self.part));
        xml.push_str(&format!(
            "      <pdfaid:conformance>{}</pdfaid:conformance>\n",
            self.conformance
        ));
        xml.push_str("    </rdf:Description>\n");
        xml.push_str("  </rdf:RDF>\n");
        xml.push_str("</x:xmpmeta>\n");
        xml.push_str("<?xpacket end=\"w\"?>");
        xml.into_bytes()
    }
}

/// Which structural objects the composer leaves out.
///
/// Only the corruption injector sets anything here; a default build is
/// complete for its profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct Omissions {
    /// Skip the output-intent object and the catalog's reference to it,
    /// while keeping the metadata stream's conformance claim in place.
    pub output_intent: bool,
}

/// Build the object graph for a profile.
///
/// Object order is fixed — catalog, pages, page, content stream, metadata,
/// output intent — so offsets are reproducible across runs. The page carries
/// an inline Type1 Helvetica resource rather than an indirect font object.
/// `banner` is the text the content stream paints.
pub fn compose(profile: ConformanceProfile, banner: &str, omissions: Omissions) -> Document {
    let mut doc = Document::new();

    let catalog_ref = doc.alloc();
    let pages_ref = doc.alloc();
    let page_ref = doc.alloc();
    let content_ref = doc.alloc();
    let metadata_ref = profile.requires_metadata().then(|| doc.alloc());
    let intent_ref = (profile.requires_output_intent() && !omissions.output_intent)
        .then(|| doc.alloc());

    doc.insert(
        catalog_ref,
        catalog(pages_ref, metadata_ref, intent_ref, profile.requires_mark_info()),
    );
    doc.insert(
        pages_ref,
        ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Pages")),
            ("Kids", Object::Array(vec![Object::Reference(page_ref)])),
            ("Count", ObjectSerializer::integer(1)),
        ]),
    );
    doc.insert(page_ref, page(pages_ref, content_ref));
    doc.insert(content_ref, content_stream(banner));

    if let Some(metadata_ref) = metadata_ref {
        let packet = XmpPacket::for_profile(profile)
            .map(|p| p.to_bytes())
            .unwrap_or_default();
        doc.insert(
            metadata_ref,
            Object::Stream {
                dict: [
                    ("Type".to_string(), ObjectSerializer::name("Metadata")),
                    ("Subtype".to_string(), ObjectSerializer::name("XML")),
                ]
                .into_iter()
                .collect(),
                data: bytes::Bytes::from(packet),
            },
        );
    }

    if let Some(intent_ref) = intent_ref {
        doc.insert(intent_ref, output_intent());
    }

    doc.set_root(catalog_ref);
    doc
}

fn catalog(
    pages: ObjectRef,
    metadata: Option<ObjectRef>,
    intent: Option<ObjectRef>,
    mark_info: bool,
) -> Object {
    let mut entries = vec![
        ("Type", ObjectSerializer::name("Catalog")),
        ("Pages", ObjectSerializer::reference(pages)),
    ];
    if let Some(metadata) = metadata {
        entries.push(("Metadata", ObjectSerializer::reference(metadata)));
    }
    if let Some(intent) = intent {
        entries.push((
            "OutputIntents",
            Object::Array(vec![Object::Reference(intent)]),
        ));
    }
    if mark_info {
        entries.push((
            "MarkInfo",
            ObjectSerializer::dict(vec![("Marked", ObjectSerializer::boolean(true))]),
        ));
    }
    ObjectSerializer::dict(entries)
}

fn page(parent: ObjectRef, contents: ObjectRef) -> Object {
    let font = ObjectSerializer::dict(vec![
        ("Type", ObjectSerializer::name("Font")),
        ("Subtype", ObjectSerializer::name("Type1")),
        ("BaseFont", ObjectSerializer::name("Helvetica")),
    ]);
    ObjectSerializer::dict(vec![
        ("Type", ObjectSerializer::name("Page")),
        ("Parent", ObjectSerializer::reference(parent)),
        ("MediaBox", ObjectSerializer::rect(0.0, 0.0, 612.0, 792.0)),
        ("Contents", ObjectSerializer::reference(contents)),
        (
            "Resources",
            ObjectSerializer::dict(vec![(
                "Font",
                ObjectSerializer::dict(vec![("F1", font)]),
            )]),
        ),
    ])
}

fn content_stream(banner: &str) -> Object {
    let program = format!("BT\n/F1 12 Tf\n100 700 Td\n({}) Tj\nET", banner);
    Object::Stream {
        dict: Default::default(),
        data: bytes::Bytes::from(program.into_bytes()),
    }
}

fn output_intent() -> Object {
    ObjectSerializer::dict(vec![
        ("Type", ObjectSerializer::name("OutputIntent")),
        ("S", ObjectSerializer::name("GTS_PDFA1")),
        (
            "OutputConditionIdentifier",
            ObjectSerializer::string(OUTPUT_CONDITION),
        ),
        ("Info", ObjectSerializer::string(OUTPUT_CONDITION)),
    ])
}
