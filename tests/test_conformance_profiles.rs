//! Conformance-profile tests: metadata claims, output intents, and the
//! false-claim negative fixture.

use pdf_fixtures::{ConformanceProfile, Corruption, FixtureBuilder};

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

/// Extract the payload of the metadata stream and its declared /Length.
fn metadata_stream(bytes: &[u8]) -> (usize, Vec<u8>) {
    let obj_start = find(bytes, b"/Type /Metadata").expect("metadata object");
    let scoped = &bytes[obj_start..];

    let length_start = find(scoped, b"/Length ").expect("/Length entry") + b"/Length ".len();
    let length_end = length_start
        + scoped[length_start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .unwrap();
    let declared: usize = std::str::from_utf8(&scoped[length_start..length_end])
        .unwrap()
        .parse()
        .unwrap();

    let data_start = find(scoped, b"stream\n").expect("stream keyword") + b"stream\n".len();
    let data_end = data_start + find(&scoped[data_start..], b"\nendstream").expect("endstream");
    (declared, scoped[data_start..data_end].to_vec())
}

#[test]
fn pdfa_catalog_references_metadata_and_output_intent() {
    for profile in [ConformanceProfile::PdfA1b, ConformanceProfile::PdfA2u] {
        let bytes = FixtureBuilder::new(profile).build().unwrap();
        assert!(contains(&bytes, b"/Metadata 5 0 R"), "profile {}", profile);
        assert!(contains(&bytes, b"/OutputIntents [6 0 R]"), "profile {}", profile);
        assert!(contains(&bytes, b"/Type /OutputIntent"));
        assert!(contains(&bytes, b"/S /GTS_PDFA1"));
        assert!(contains(&bytes, b"/OutputConditionIdentifier (sRGB IEC61966-2.1)"));
    }
}

#[test]
fn metadata_length_matches_payload() {
    for profile in [ConformanceProfile::PdfA1b, ConformanceProfile::PdfA2u] {
        let bytes = FixtureBuilder::new(profile).build().unwrap();
        let (declared, payload) = metadata_stream(&bytes);
        assert_eq!(declared, payload.len(), "profile {}", profile);
    }
}

#[test]
fn pdfa1b_claims_part_one_conformance_b() {
    let bytes = FixtureBuilder::new(ConformanceProfile::PdfA1b).build().unwrap();
    let (_, payload) = metadata_stream(&bytes);
    let xml = String::from_utf8(payload).unwrap();
    assert!(xml.contains("<pdfaid:part>1</pdfaid:part>"));
    assert!(xml.contains("<pdfaid:conformance>B</pdfaid:conformance>"));
}

#[test]
fn pdfa2u_claims_part_two_conformance_u_and_marked_content() {
    let bytes = FixtureBuilder::new(ConformanceProfile::PdfA2u).build().unwrap();
    let (_, payload) = metadata_stream(&bytes);
    let xml = String::from_utf8(payload).unwrap();
    assert!(xml.contains("<pdfaid:part>2</pdfaid:part>"));
    assert!(xml.contains("<pdfaid:conformance>U</pdfaid:conformance>"));
    assert!(contains(&bytes, b"/MarkInfo <<\n  /Marked true\n>>"));
}

#[test]
fn baseline_makes_no_conformance_claims() {
    let bytes = FixtureBuilder::new(ConformanceProfile::Pdf17).build().unwrap();
    assert!(!contains(&bytes, b"/Metadata"));
    assert!(!contains(&bytes, b"/OutputIntent"));
    assert!(!contains(&bytes, b"pdfaid"));
    assert!(!contains(&bytes, b"/MarkInfo"));
}

#[test]
fn false_claim_fixture_asserts_conformance_without_output_intent() {
    let bytes = FixtureBuilder::new(ConformanceProfile::PdfA1b)
        .corruption(Corruption::OmitOutputIntent)
        .build()
        .unwrap();

    // The metadata claim is intact...
    let (declared, payload) = metadata_stream(&bytes);
    assert_eq!(declared, payload.len());
    let xml = String::from_utf8(payload).unwrap();
    assert!(xml.contains("<pdfaid:conformance>B</pdfaid:conformance>"));

    // ...but no output-intent object exists anywhere in the file.
    assert!(!contains(&bytes, b"/Type /OutputIntent"));
    assert!(!contains(&bytes, b"/OutputIntents"));
    assert!(!contains(&bytes, b"GTS_PDFA1"));

    // The file is otherwise structurally sound: the table still resolves.
    assert!(contains(&bytes, b"/Root 1 0 R"));
    assert!(contains(&bytes, b"%%EOF"));
}

#[test]
fn false_claim_fixture_still_has_consistent_xref() {
    let bytes = FixtureBuilder::new(ConformanceProfile::PdfA2u)
        .corruption(Corruption::OmitOutputIntent)
        .build()
        .unwrap();
    let pos = find(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
    let end = pos + find(&bytes[pos..], b"\n").unwrap();
    let start: usize = std::str::from_utf8(&bytes[pos..end]).unwrap().parse().unwrap();
    assert_eq!(&bytes[start..start + 4], b"xref");
}

#[test]
fn content_stream_banner_names_the_fixture() {
    let cases = [
        (ConformanceProfile::Pdf17, Corruption::None, "(Valid PDF 1.7) Tj"),
        (ConformanceProfile::PdfA1b, Corruption::None, "(Valid PDF/A-1b) Tj"),
        (ConformanceProfile::PdfA2u, Corruption::None, "(Valid PDF/A-2u) Tj"),
        (ConformanceProfile::Pdf17, Corruption::PoisonOffsets, "(Invalid Structure) Tj"),
        (ConformanceProfile::PdfA1b, Corruption::OmitOutputIntent, "(Invalid PDF/A) Tj"),
    ];
    for (profile, corruption, banner) in cases {
        let bytes = FixtureBuilder::new(profile).corruption(corruption).build().unwrap();
        assert!(contains(&bytes, banner.as_bytes()), "missing {:?}", banner);
    }
}
