//! End-to-end encode/decode scenarios checked against literal wire bytes.

use wire_quack::{FieldType, Reader, Value, Writer};

#[test]
fn uint32_field_matches_reference_bytes() {
    let mut w = Writer::new();
    w.uint32(1, 150).unwrap();
    assert_eq!(w.as_bytes(), &[0x08, 0x96, 0x01]);

    let mut r = Reader::from_bytes(w.as_bytes());
    assert_eq!(r.next_field().unwrap(), Some(1));
    assert_eq!(r.read_uint32().unwrap(), 150);
    assert!(r.is_eof());
}

#[test]
fn string_field_matches_reference_bytes() {
    let mut w = Writer::new();
    w.string(2, "testing").unwrap();
    assert_eq!(
        w.as_bytes(),
        &[0x12, 0x07, 0x74, 0x65, 0x73, 0x74, 0x69, 0x6E, 0x67]
    );

    let mut r = Reader::from_bytes(w.as_bytes());
    assert_eq!(r.next_field().unwrap(), Some(2));
    assert_eq!(r.read_string().unwrap(), "testing");
}

#[test]
fn sint32_field_matches_reference_bytes() {
    let mut w = Writer::new();
    w.sint32(3, -1).unwrap();
    assert_eq!(w.as_bytes(), &[0x18, 0x01]);

    let mut r = Reader::from_bytes(w.as_bytes());
    assert_eq!(r.next_field().unwrap(), Some(3));
    assert_eq!(r.read_sint32().unwrap(), -1);
}

#[test]
fn fixed32_field_matches_reference_bytes() {
    let mut w = Writer::new();
    w.fixed32(4, 0xDEADBEEF).unwrap();
    assert_eq!(w.as_bytes(), &[0x25, 0xEF, 0xBE, 0xAD, 0xDE]);

    let mut r = Reader::from_bytes(w.as_bytes());
    assert_eq!(r.next_field().unwrap(), Some(4));
    assert_eq!(r.read_fixed32().unwrap(), 0xDEADBEEF);
}

#[test]
fn packed_int32_field_matches_reference_bytes() {
    let items = vec![Value::Int32(3), Value::Int32(270), Value::Int32(86942)];
    let mut w = Writer::new();
    w.write_packed(5, FieldType::Int32, &items).unwrap();
    assert_eq!(
        w.as_bytes(),
        &[0x2A, 0x06, 0x03, 0x8E, 0x02, 0x9E, 0xA7, 0x05]
    );

    let mut r = Reader::from_bytes(w.as_bytes());
    assert_eq!(r.next_field().unwrap(), Some(5));
    let decoded = r.read_packed(FieldType::Int32).unwrap();
    assert_eq!(decoded, items);
}

#[test]
fn streaming_envelope_frames_two_identical_messages() {
    let mut w = Writer::new();
    w.uint32(1, 150).unwrap();
    let body = w.into_bytes();
    assert_eq!(body, &[0x08, 0x96, 0x01]);

    let mut stream = Vec::new();
    for _ in 0..2 {
        stream.extend_from_slice(&wire_quack::encode_header(body.len() as u64).unwrap());
        stream.extend_from_slice(&body);
    }
    stream.extend_from_slice(&wire_quack::encode_header(0).unwrap());

    let mut r = Reader::from_bytes(&stream);
    for _ in 0..2 {
        let len = r.header().unwrap().expect("message present");
        assert_eq!(len, 3);
        assert_eq!(r.next_field().unwrap(), Some(1));
        assert_eq!(r.read_uint32().unwrap(), 150);
        assert!(r.is_eof());
    }
    assert_eq!(r.header().unwrap(), None);
}

#[test]
fn nested_message_descent_restores_cursor_past_declared_length() {
    struct Inner {
        a: i32,
    }
    impl wire_quack::MessageWrite for Inner {
        fn write_message(&self, w: &mut Writer) -> wire_quack::Result<()> {
            w.int32(1, self.a)
        }
    }
    impl<'a> wire_quack::MessageRead<'a> for Inner {
        fn from_reader(r: &mut Reader<'a>) -> wire_quack::Result<Self> {
            let mut a = 0;
            while let Some(field) = r.next_field()? {
                match field {
                    1 => a = r.read_int32()?,
                    _ => r.skip_field()?,
                }
            }
            Ok(Inner { a })
        }
    }

    let mut w = Writer::new();
    w.message(7, &Inner { a: 42 }).unwrap();
    w.uint32(8, 99).unwrap();
    let bytes = w.into_bytes();

    let mut r = Reader::from_bytes(&bytes);
    assert_eq!(r.next_field().unwrap(), Some(7));
    let inner: Inner = r.read_message().unwrap();
    assert_eq!(inner.a, 42);
    assert_eq!(r.next_field().unwrap(), Some(8));
    assert_eq!(r.read_uint32().unwrap(), 99);
}

#[test]
fn map_entry_round_trips_string_to_int32() {
    let mut w = Writer::new();
    let entries = vec![
        (Value::String("a".into()), Value::Int32(1)),
        (Value::String("b".into()), Value::Int32(2)),
    ];
    let borrowed: Vec<(&Value, &Value)> = entries.iter().map(|(k, v)| (k, v)).collect();
    w.map(9, borrowed).unwrap();
    let bytes = w.into_bytes();

    let mut r = Reader::from_bytes(&bytes);
    let mut decoded = Vec::new();
    while let Some(field) = r.next_field().unwrap() {
        assert_eq!(field, 9);
        decoded.push(
            r.read_map_entry(FieldType::String, FieldType::Int32)
                .unwrap(),
        );
    }
    assert_eq!(decoded, entries);
}

#[test]
fn map_entry_with_message_value_round_trips_via_closures() {
    struct Inner {
        a: i32,
    }
    impl wire_quack::MessageWrite for Inner {
        fn write_message(&self, w: &mut Writer) -> wire_quack::Result<()> {
            w.int32(1, self.a)
        }
    }
    impl<'a> wire_quack::MessageRead<'a> for Inner {
        fn from_reader(r: &mut Reader<'a>) -> wire_quack::Result<Self> {
            let mut a = 0;
            while let Some(field) = r.next_field()? {
                match field {
                    1 => a = r.read_int32()?,
                    _ => r.skip_field()?,
                }
            }
            Ok(Inner { a })
        }
    }

    let mut w = Writer::new();
    w.map_entry_with(
        10,
        |w| w.uint32(1, 7),
        |w| w.message(2, &Inner { a: 42 }),
    )
    .unwrap();
    let bytes = w.into_bytes();

    let mut r = Reader::from_bytes(&bytes);
    assert_eq!(r.next_field().unwrap(), Some(10));
    let (key, val): (u32, Inner) = r
        .read_map_with(|r| r.read_uint32(), |r| r.read_message())
        .unwrap();
    assert_eq!(key, 7);
    assert_eq!(val.a, 42);
}

#[test]
fn write_to_flushes_into_an_io_write_sink() {
    let mut w = Writer::new();
    w.uint32(1, 150).unwrap();
    w.string(2, "testing").unwrap();

    let mut sink: Vec<u8> = Vec::new();
    w.write_to(&mut sink).unwrap();
    assert_eq!(sink, w.as_bytes());

    let mut r = Reader::from_bytes(&sink);
    assert_eq!(r.next_field().unwrap(), Some(1));
    assert_eq!(r.read_uint32().unwrap(), 150);
    assert_eq!(r.next_field().unwrap(), Some(2));
    assert_eq!(r.read_string().unwrap(), "testing");
}

#[test]
fn read_string_lossy_resyncs_past_malformed_utf8() {
    // a length-delimited field 1 whose payload is 'a', a lone continuation
    // byte, then 'b' — not valid UTF-8, so `read_string` would fail it.
    let raw = vec![(1 << 3) | 2, 3, b'a', 0x80, b'b'];
    let mut r = Reader::from_bytes(&raw);
    assert_eq!(r.next_field().unwrap(), Some(1));
    assert_eq!(r.read_string_lossy().unwrap(), "ab");
}
