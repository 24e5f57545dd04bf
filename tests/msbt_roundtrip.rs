//! Container codec round-trip and malformed-input tests

use msbtkit::error::Error;
use msbtkit::formats::msbt::{
    ByteOrder, Msbt, Section, TextEncoding, parse_msbt_bytes, serialize_msbt,
};
use pretty_assertions::assert_eq;

// ==================== fixture builders ====================

/// Assemble a section stream entry: tag, size, reserved bytes, body, and
/// 0xAB padding out to the 16-byte boundary.
fn section(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(tag);
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(body);
    while out.len() % 16 != 0 {
        out.push(0xAB);
    }
    out
}

/// Assemble a little-endian UTF-16 container around the given sections.
fn container(sections: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = sections.concat();
    let mut out = Vec::new();
    out.extend_from_slice(b"MsgStdBn");
    out.extend_from_slice(&[0xFF, 0xFE]);
    out.extend_from_slice(&[0, 0]);
    out.push(0x01);
    out.push(0x03);
    out.extend_from_slice(&(sections.len() as u16).to_le_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&((32 + body.len()) as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 10]);
    out.extend_from_slice(&body);
    out
}

/// A single-group LBL1 body holding the given (name, string index) labels.
fn lbl1_one_group(labels: &[(&str, u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(labels.len() as u32).to_le_bytes());
    out.extend_from_slice(&12u32.to_le_bytes());
    for (name, index) in labels {
        out.push(name.len() as u8);
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&index.to_le_bytes());
    }
    out
}

/// A TXT2 body holding the given strings as terminated UTF-16 LE runs.
fn txt2(texts: &[&str]) -> Vec<u8> {
    let mut runs = Vec::new();
    let mut offsets = Vec::new();
    for text in texts {
        offsets.push((4 + texts.len() * 4 + runs.len()) as u32);
        for unit in text.encode_utf16() {
            runs.extend_from_slice(&unit.to_le_bytes());
        }
        runs.extend_from_slice(&[0, 0]);
    }

    let mut out = Vec::new();
    out.extend_from_slice(&(texts.len() as u32).to_le_bytes());
    for offset in offsets {
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out.extend_from_slice(&runs);
    out
}

fn names_and_indices(msbt: &Msbt) -> Vec<(String, usize)> {
    msbt.labels()
        .map(|label| (label.name.clone(), label.string_index))
        .collect()
}

// ==================== serialization layout ====================

#[test]
fn serialize_minimal_container_layout() {
    let mut msbt = Msbt::with_groups(TextEncoding::Utf16, ByteOrder::Little, 1);
    msbt.add_entry("A", "Hi").unwrap();

    let expected = container(&[
        section(b"LBL1", &lbl1_one_group(&[("A", 0)])),
        section(b"TXT2", &txt2(&["Hi"])),
    ]);
    let actual = serialize_msbt(&msbt).unwrap();

    assert_eq!(actual, expected);
    // Spot-check the header fields.
    assert_eq!(&actual[0..8], b"MsgStdBn");
    assert_eq!(&actual[8..10], &[0xFF, 0xFE]);
    assert_eq!(actual[12], 0x01);
    assert_eq!(actual[13], 0x03);
    assert_eq!(&actual[14..16], &[0x02, 0x00]);
    assert_eq!(
        u32::from_le_bytes([actual[18], actual[19], actual[20], actual[21]]),
        actual.len() as u32
    );
}

#[test]
fn reserialized_bytes_match_input() {
    let bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[("A", 0), ("B", 1)])),
        section(b"TXT2", &txt2(&["first", "second"])),
    ]);

    let msbt = parse_msbt_bytes(&bytes).unwrap();
    assert_eq!(serialize_msbt(&msbt).unwrap(), bytes);
}

// ==================== round-trip semantics ====================

#[test]
fn round_trip_preserves_semantics() {
    let mut msbt = Msbt::with_groups(TextEncoding::Utf16, ByteOrder::Little, 5);
    msbt.add_entry("Hello", "Hi").unwrap();
    msbt.add_entry("World", "Earth und ünïcode テスト").unwrap();
    msbt.add_entry("Greeting", "").unwrap();
    msbt.rename_entry("Greeting", "Gamma").unwrap();

    let reparsed = parse_msbt_bytes(&serialize_msbt(&msbt).unwrap()).unwrap();

    assert_eq!(reparsed.directory().bucket_count(), 5);
    assert_eq!(names_and_indices(&reparsed), names_and_indices(&msbt));
    for label in msbt.labels() {
        assert_eq!(
            reparsed.text(&label.name).unwrap(),
            msbt.text(&label.name).unwrap()
        );
    }
    assert_eq!(reparsed.encoding(), TextEncoding::Utf16);
    assert_eq!(reparsed.byte_order(), ByteOrder::Little);
}

#[test]
fn round_trip_big_endian() {
    let mut msbt = Msbt::with_groups(TextEncoding::Utf16, ByteOrder::Big, 5);
    msbt.add_entry("Hello", "Hi there").unwrap();
    msbt.add_entry("World", "Earth").unwrap();

    let bytes = serialize_msbt(&msbt).unwrap();
    assert_eq!(&bytes[8..10], &[0xFE, 0xFF]);

    let reparsed = parse_msbt_bytes(&bytes).unwrap();
    assert_eq!(reparsed.byte_order(), ByteOrder::Big);
    assert_eq!(names_and_indices(&reparsed), names_and_indices(&msbt));
    assert_eq!(reparsed.text("Hello").unwrap(), "Hi there");
}

#[test]
fn round_trip_utf8() {
    let mut msbt = Msbt::with_groups(TextEncoding::Utf8, ByteOrder::Little, 5);
    msbt.add_entry("Hello", "Hi über-wörld").unwrap();

    let bytes = serialize_msbt(&msbt).unwrap();
    assert_eq!(bytes[12], 0x00);

    let reparsed = parse_msbt_bytes(&bytes).unwrap();
    assert_eq!(reparsed.encoding(), TextEncoding::Utf8);
    assert_eq!(reparsed.text("Hello").unwrap(), "Hi über-wörld");
}

#[test]
fn round_trip_empty_container() {
    let msbt = Msbt::new(TextEncoding::Utf16, ByteOrder::Little);
    let reparsed = parse_msbt_bytes(&serialize_msbt(&msbt).unwrap()).unwrap();

    assert!(reparsed.is_empty());
    assert_eq!(reparsed.directory().bucket_count(), 101);
}

#[test]
fn opaque_sections_pass_through_verbatim() {
    let attr_data = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x05, 0x00, 0x00, 0x00, 0x42];
    let bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[("A", 0)])),
        section(b"ATR1", &attr_data),
        section(b"TXT2", &txt2(&["Hi"])),
    ]);

    let msbt = parse_msbt_bytes(&bytes).unwrap();
    let tags: Vec<_> = msbt
        .sections()
        .iter()
        .map(|s| match s {
            Section::Labels => *b"LBL1",
            Section::Texts => *b"TXT2",
            Section::Opaque(opaque) => opaque.tag,
        })
        .collect();
    assert_eq!(tags, [*b"LBL1", *b"ATR1", *b"TXT2"]);

    match &msbt.sections()[1] {
        Section::Opaque(opaque) => assert_eq!(opaque.data, attr_data),
        other => panic!("expected opaque section, got {other:?}"),
    }

    // Section order and opaque bytes survive a full write/read cycle.
    assert_eq!(serialize_msbt(&msbt).unwrap(), bytes);
}

#[test]
fn edits_survive_round_trip() {
    let mut msbt = Msbt::with_groups(TextEncoding::Utf16, ByteOrder::Little, 5);
    msbt.add_entry("First", "one").unwrap();
    msbt.add_entry("Second", "two").unwrap();
    msbt.add_entry("Third", "three").unwrap();

    msbt.remove_entry("Second").unwrap();
    msbt.set_text("Third", "drei").unwrap();
    msbt.rename_entry("First", "Start").unwrap();

    let reparsed = parse_msbt_bytes(&serialize_msbt(&msbt).unwrap()).unwrap();

    assert_eq!(reparsed.len(), 2);
    assert_eq!(reparsed.text("Start").unwrap(), "one");
    assert_eq!(reparsed.text("Third").unwrap(), "drei");

    // Index space stays dense after the removal.
    let mut indices: Vec<_> = reparsed.labels().map(|l| l.string_index).collect();
    indices.sort_unstable();
    assert_eq!(indices, [0, 1]);
}

// ==================== malformed containers ====================

#[test]
fn rejects_bad_magic() {
    let mut bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[])),
        section(b"TXT2", &txt2(&[])),
    ]);
    bytes[0] = b'X';
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::InvalidMsbtMagic(_))
    ));
}

#[test]
fn rejects_bad_byte_order_mark() {
    let mut bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[])),
        section(b"TXT2", &txt2(&[])),
    ]);
    bytes[8] = 0x00;
    bytes[9] = 0x00;
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::InvalidByteOrderMark([0x00, 0x00]))
    ));
}

#[test]
fn rejects_unknown_encoding_byte() {
    let mut bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[])),
        section(b"TXT2", &txt2(&[])),
    ]);
    bytes[12] = 0x07;
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::UnsupportedEncoding(0x07))
    ));
}

#[test]
fn rejects_missing_mandatory_sections() {
    let no_texts = container(&[section(b"LBL1", &lbl1_one_group(&[]))]);
    assert!(matches!(
        parse_msbt_bytes(&no_texts),
        Err(Error::MissingSection("TXT2"))
    ));

    let no_labels = container(&[section(b"TXT2", &txt2(&[]))]);
    assert!(matches!(
        parse_msbt_bytes(&no_labels),
        Err(Error::MissingSection("LBL1"))
    ));
}

#[test]
fn rejects_duplicate_mandatory_section() {
    let bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[])),
        section(b"LBL1", &lbl1_one_group(&[])),
        section(b"TXT2", &txt2(&[])),
    ]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::DuplicateSection { .. })
    ));
}

#[test]
fn rejects_section_overrunning_file() {
    let mut good = section(b"TXT2", &txt2(&[]));
    // Inflate the declared body size past the end of the file.
    good[4..8].copy_from_slice(&0xFFFF_u32.to_le_bytes());
    let bytes = container(&[section(b"LBL1", &lbl1_one_group(&[])), good]);

    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::SectionOverrun { .. })
    ));
}

#[test]
fn rejects_zero_group_table() {
    let bytes = container(&[
        section(b"LBL1", &0u32.to_le_bytes()),
        section(b"TXT2", &txt2(&[])),
    ]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::EmptyGroupTable)
    ));
}

#[test]
fn rejects_truncated_group_table() {
    // Declares two groups but only carries one table entry.
    let mut body = Vec::new();
    body.extend_from_slice(&2u32.to_le_bytes());
    body.extend_from_slice(&0u32.to_le_bytes());
    body.extend_from_slice(&20u32.to_le_bytes());

    let bytes = container(&[section(b"LBL1", &body), section(b"TXT2", &txt2(&[]))]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::TruncatedSection { .. })
    ));
}

#[test]
fn rejects_absurd_label_count() {
    // One group claiming four billion labels in a 12-byte body.
    let mut body = Vec::new();
    body.extend_from_slice(&1u32.to_le_bytes());
    body.extend_from_slice(&u32::MAX.to_le_bytes());
    body.extend_from_slice(&12u32.to_le_bytes());

    let bytes = container(&[section(b"LBL1", &body), section(b"TXT2", &txt2(&[]))]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::TruncatedSection { .. })
    ));
}

#[test]
fn rejects_label_offset_out_of_bounds() {
    let mut body = Vec::new();
    body.extend_from_slice(&1u32.to_le_bytes());
    body.extend_from_slice(&1u32.to_le_bytes());
    body.extend_from_slice(&500u32.to_le_bytes());

    let bytes = container(&[section(b"LBL1", &body), section(b"TXT2", &txt2(&[]))]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::OffsetOutOfBounds { .. })
    ));
}

#[test]
fn rejects_dangling_string_index() {
    let bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[("A", 3)])),
        section(b"TXT2", &txt2(&["only one"])),
    ]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::InvalidStringIndex { index: 3, count: 1 })
    ));
}

#[test]
fn rejects_duplicate_label_names() {
    let bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[("Twin", 0), ("Twin", 1)])),
        section(b"TXT2", &txt2(&["a", "b"])),
    ]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::DuplicateLabel(_))
    ));
}

#[test]
fn rejects_unterminated_string_run() {
    // One string whose run does not end in a null code unit.
    let mut body = Vec::new();
    body.extend_from_slice(&1u32.to_le_bytes());
    body.extend_from_slice(&8u32.to_le_bytes());
    body.extend_from_slice(&[0x48, 0x00, 0x69, 0x00]); // "Hi", no terminator

    let bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[("A", 0)])),
        section(b"TXT2", &body),
    ]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::UnterminatedString { index: 0 })
    ));
}

#[test]
fn rejects_misaligned_utf16_run() {
    // A 5-byte run cannot be whole UTF-16 code units.
    let mut body = Vec::new();
    body.extend_from_slice(&1u32.to_le_bytes());
    body.extend_from_slice(&8u32.to_le_bytes());
    body.extend_from_slice(&[0x48, 0x00, 0x69, 0x00, 0x00]);

    let bytes = container(&[
        section(b"LBL1", &lbl1_one_group(&[("A", 0)])),
        section(b"TXT2", &body),
    ]);
    assert!(matches!(
        parse_msbt_bytes(&bytes),
        Err(Error::MisalignedTextRun { len: 5, unit: 2 })
    ));
}

#[test]
fn rejects_arbitrary_bytes_without_panicking() {
    assert!(parse_msbt_bytes(&[]).is_err());
    assert!(parse_msbt_bytes(b"definitely not a message container").is_err());
    assert!(parse_msbt_bytes(&[0xAB; 64]).is_err());
}
