//! Property-based round-trip and invariant checks, one per quantified
//! invariant named for this wire format.

use quickcheck_macros::quickcheck;
use wire_quack::encoder::Encoder;
use wire_quack::reader::Reader;
use wire_quack::writer::Writer;

#[quickcheck]
fn unsigned_varint_round_trips(n: u64) -> bool {
    // Writer::uint64 caps at 2^63 for bit-compatibility with the reference
    // encoder, but the raw varint primitive has no such cap — so this
    // invariant is checked against the Encoder/Reader primitives directly,
    // tagging the payload by hand rather than going through Writer::uint64.
    let mut enc = Encoder::new();
    enc.unsigned_varint((1u64 << 3) | 0); // VARINT tag for field 1
    enc.unsigned_varint(n);
    let bytes = enc.into_bytes();
    let mut r = Reader::from_bytes(&bytes);
    r.next_field().unwrap();
    r.read_uint64().unwrap() == n
}

#[quickcheck]
fn varint32_round_trips_with_sign_extension(n: i32) -> bool {
    let mut w = Writer::new();
    w.int32(1, n).unwrap();
    let mut r = Reader::from_bytes(w.as_bytes());
    r.next_field().unwrap();
    r.read_int32().unwrap() == n
}

#[quickcheck]
fn varint64_round_trips_with_sign_extension(n: i64) -> bool {
    let mut w = Writer::new();
    w.int64(1, n).unwrap();
    let mut r = Reader::from_bytes(w.as_bytes());
    r.next_field().unwrap();
    r.read_int64().unwrap() == n
}

#[quickcheck]
fn zigzag32_round_trips(n: i32) -> bool {
    let mut w = Writer::new();
    w.sint32(1, n).unwrap();
    let mut r = Reader::from_bytes(w.as_bytes());
    r.next_field().unwrap();
    r.read_sint32().unwrap() == n
}

#[quickcheck]
fn zigzag64_round_trips(n: i64) -> bool {
    let mut w = Writer::new();
    w.sint64(1, n).unwrap();
    let mut r = Reader::from_bytes(w.as_bytes());
    r.next_field().unwrap();
    r.read_sint64().unwrap() == n
}

#[quickcheck]
fn double_round_trips_bit_identical(x: f64) -> bool {
    let x = if x.is_nan() { f64::NAN } else { x };
    let mut w = Writer::new();
    if w.double(1, x).is_err() {
        return true; // out of the strict-inequality domain; not this property's concern
    }
    let mut r = Reader::from_bytes(w.as_bytes());
    r.next_field().unwrap();
    let got = r.read_double().unwrap();
    got.to_bits() == x.to_bits() || (got.is_nan() && x.is_nan())
}

#[quickcheck]
fn string_round_trips_scalar_sequence(s: String) -> bool {
    let mut w = Writer::new();
    if w.string(1, &s).is_err() {
        return true;
    }
    let mut r = Reader::from_bytes(w.as_bytes());
    r.next_field().unwrap();
    r.read_string().unwrap() == s
}

#[quickcheck]
fn skip_field_lands_exactly_on_next_field(a: i32, b: u32) -> bool {
    let mut w = Writer::new();
    w.int32(1, a).unwrap();
    w.uint32(2, b).unwrap();
    let mut r = Reader::from_bytes(w.as_bytes());
    r.next_field().unwrap();
    r.skip_field().unwrap();
    let field = r.next_field().unwrap();
    field == Some(2) && r.read_uint32().unwrap() == b
}

#[quickcheck]
fn delimited_scope_length_matches_payload_and_nests(inner_value: i32) -> bool {
    let mut payload = Writer::new();
    payload.int32(1, inner_value).unwrap();
    let payload = payload.into_bytes();

    let mut outer = Writer::new();
    outer.bytes(1, &payload).unwrap();
    let mut r = Reader::from_bytes(outer.as_bytes());
    r.next_field().unwrap();
    let raw = r.read_bytes().unwrap();
    let mut inner_reader = Reader::from_bytes(raw);
    inner_reader.next_field().unwrap();
    inner_reader.read_int32().unwrap() == inner_value
}

#[quickcheck]
fn field_multiset_is_preserved_across_emission_order(a: i32, b: u32, c: bool) -> bool {
    let forward = {
        let mut w = Writer::new();
        w.int32(1, a).unwrap();
        w.uint32(2, b).unwrap();
        w.bool(3, c).unwrap();
        w.into_bytes()
    };
    let reversed = {
        let mut w = Writer::new();
        w.bool(3, c).unwrap();
        w.uint32(2, b).unwrap();
        w.int32(1, a).unwrap();
        w.into_bytes()
    };

    let read_all = |bytes: &[u8]| {
        let mut r = Reader::from_bytes(bytes);
        let mut fields = Vec::new();
        while let Some(f) = r.next_field().unwrap() {
            match f {
                1 => fields.push((1u32, r.read_int32().unwrap() as i64)),
                2 => fields.push((2, r.read_uint32().unwrap() as i64)),
                3 => fields.push((3, r.read_bool().unwrap() as i64)),
                _ => unreachable!(),
            }
        }
        fields.sort();
        fields
    };

    read_all(&forward) == read_all(&reversed)
}
