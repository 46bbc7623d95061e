use super::*;

#[test]
fn primitives_are_little_endian() {
    let mut w = WireWriter::new();
    w.write_u32(0x0102_0304);
    w.put(&true);
    assert_eq!(w.into_bytes(), [4, 3, 2, 1, 1]);
}

#[test]
fn short_input_reports_what_was_being_read() {
    let mut r = WireReader::new(&[1, 2]);
    let err = r.read_u32("count").unwrap_err();
    assert_eq!(
        err,
        FormatError::Truncated {
            context: "count",
            needed: 4,
            available: 2,
        }
    );
}

#[test]
fn out_of_range_tags_are_rejected() {
    let mut r = WireReader::new(&[7]);
    assert_eq!(
        r.get::<bool>().unwrap_err(),
        FormatError::UnknownTag {
            context: "bool",
            tag: 7,
        }
    );
    let mut r = WireReader::new(&[2, 0]);
    assert!(matches!(
        r.get::<Option<u8>>(),
        Err(FormatError::UnknownTag { context: "option", tag: 2 })
    ));
}

#[test]
fn nested_message_must_consume_declared_length() {
    let mut w = WireWriter::new();
    w.message(|w| {
        w.write_u32(9);
        w.write_u8(0);
    });
    let bytes = w.into_bytes();

    let mut r = WireReader::new(&bytes);
    let err = r.message("probe", |r| r.read_u32("value")).unwrap_err();
    assert_eq!(
        err,
        FormatError::LengthMismatch {
            context: "probe",
            declared: 5,
            consumed: 4,
        }
    );

    let mut r = WireReader::new(&bytes);
    let v = r
        .message("probe", |r| {
            let v = r.read_u32("value")?;
            r.read_u8("pad")?;
            Ok(v)
        })
        .unwrap();
    assert_eq!(v, 9);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn invalid_utf8_is_a_distinct_error() {
    let mut w = WireWriter::new();
    w.write_len(2);
    w.write_raw(&[0xff, 0xfe]);
    let bytes = w.into_bytes();
    let mut r = WireReader::new(&bytes);
    assert_eq!(
        r.get::<String>().unwrap_err(),
        FormatError::InvalidUtf8 { context: "string" }
    );
}

#[test]
fn oversized_length_fails_finish() {
    let mut w = WireWriter::new();
    w.message(|w| w.write_len(u32::MAX as usize + 1));
    assert_eq!(
        w.finish(),
        Err(FormatError::LengthOverflow {
            len: u32::MAX as usize + 1
        })
    );

    let mut ok = WireWriter::new();
    ok.write_len(3);
    assert_eq!(ok.finish(), Ok(vec![3, 0, 0, 0]));
}
