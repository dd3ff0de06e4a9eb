//! Randomized round trips over the whole message graph.

use anyhow::ensure;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

use wiremsg::*;

// ============================================================================
//  GENERATOR
// ============================================================================

const MAX_DEPTH: usize = 3;

const ENTRY_TYPES: &[MessageEntryType] = &[
    MessageEntryType::PropertyGetReq,
    MessageEntryType::PropertySetRes,
    MessageEntryType::FunctionCallReq,
    MessageEntryType::FunctionCallRes,
    MessageEntryType::EventReq,
    MessageEntryType::PipePacket,
    MessageEntryType::WirePacket,
    MessageEntryType::GeneratorNextReq,
    MessageEntryType::Other(4242),
];

const PRIMITIVES: &[DataType] = &[
    DataType::Void,
    DataType::Double,
    DataType::Single,
    DataType::Int8,
    DataType::UInt8,
    DataType::Int16,
    DataType::UInt16,
    DataType::Int32,
    DataType::UInt32,
    DataType::Int64,
    DataType::UInt64,
    DataType::String,
    DataType::CDouble,
    DataType::CSingle,
    DataType::Bool,
];

fn string(rng: &mut StdRng, max: usize) -> String {
    const ALPHABET: &[char] = &['a', 'b', 'z', 'Q', '0', '9', '_', '.', ' ', 'é', 'ß', '∑', '日', '🦀'];
    let len = rng.gen_range(0..=max);
    (0..len).map(|_| *ALPHABET.choose(rng).unwrap_or(&'a')).collect()
}

fn blob(rng: &mut StdRng) -> Vec<u8> {
    let len = rng.gen_range(0..32);
    (0..len).map(|_| rng.gen()).collect()
}

fn values<T>(rng: &mut StdRng, mut f: impl FnMut(&mut StdRng) -> T) -> Vec<T> {
    let len = if rng.gen_bool(0.1) { rng.gen_range(200..400) } else { rng.gen_range(0..16) };
    (0..len).map(|_| f(rng)).collect()
}

fn primitive(rng: &mut StdRng, ty: DataType) -> ElementData {
    match ty {
        DataType::Double => values(rng, |r| r.gen::<f64>() * 1e6 - 5e5).into(),
        DataType::Single => values(rng, |r| r.gen::<f32>()).into(),
        DataType::Int8 => values(rng, |r| r.gen::<i8>()).into(),
        DataType::UInt8 => values(rng, |r| r.gen::<u8>()).into(),
        DataType::Int16 => values(rng, |r| r.gen::<i16>()).into(),
        DataType::UInt16 => values(rng, |r| r.gen::<u16>()).into(),
        DataType::Int32 => values(rng, |r| r.gen::<i32>()).into(),
        DataType::UInt32 => values(rng, |r| r.gen::<u32>()).into(),
        DataType::Int64 => values(rng, |r| r.gen::<i64>()).into(),
        DataType::UInt64 => values(rng, |r| r.gen::<u64>()).into(),
        DataType::String => string(rng, 40).into(),
        DataType::CDouble => values(rng, |r| CDouble::new(r.gen(), r.gen())).into(),
        DataType::CSingle => values(rng, |r| CSingle::new(r.gen(), r.gen())).into(),
        DataType::Bool => values(rng, |r| r.gen::<bool>()).into(),
        _ => ElementData::Void,
    }
}

fn type_name_for(rng: &mut StdRng, ty: DataType) -> String {
    match ty {
        DataType::Structure
        | DataType::Pod
        | DataType::PodArray
        | DataType::PodMultiDimArray
        | DataType::NamedArrayArray
        | DataType::NamedArrayMultiDimArray => format!("example.service.Type{}", rng.gen_range(0..100)),
        _ => String::new(),
    }
}

/// Multi-dimensional arrays are flattened to a dims element plus a bounded array.
fn multidim(rng: &mut StdRng) -> Vec<MessageElement> {
    let dims: Vec<u32> = (0..rng.gen_range(1..4)).map(|_| rng.gen_range(1..5)).collect();
    let count: u32 = dims.iter().product();
    let array: Vec<f64> = (0..count).map(|_| rng.gen()).collect();
    vec![MessageElement::new("dims", dims), MessageElement::new("array", array)]
}

fn nested(rng: &mut StdRng, depth: usize) -> Result<NestedElementList> {
    let ty = *DataType::COMPOUND.choose(rng).unwrap_or(&DataType::Structure);
    let type_name = type_name_for(rng, ty);
    let children = match ty {
        DataType::MultiDimArray | DataType::PodMultiDimArray | DataType::NamedArrayMultiDimArray => multidim(rng),
        _ => {
            let n = rng.gen_range(0..4);
            (0..n).map(|i| element(rng, depth + 1, i)).collect::<Result<Vec<_>>>()?
        }
    };
    Ok(NestedElementList::new(ty, type_name, children)?)
}

fn element(rng: &mut StdRng, depth: usize, index: i32) -> Result<MessageElement> {
    let data = if depth < MAX_DEPTH && rng.gen_bool(0.25) {
        ElementData::Nested(nested(rng, depth)?)
    } else {
        let ty = *PRIMITIVES.choose(rng).unwrap_or(&DataType::Double);
        primitive(rng, ty)
    };

    let mut e = MessageElement::default();
    match rng.gen_range(0..4) {
        0 => e.set_number(index - 2),
        1 => e.set_name_code(rng.gen_range(0..100_000)),
        2 => {
            e.set_name(string(rng, 12));
            e.set_name_code(rng.gen());
        }
        _ => e.set_name(string(rng, 12)),
    }
    if !matches!(data, ElementData::Nested(_)) && rng.gen_bool(0.2) {
        e.set_type_name(string(rng, 20));
    }
    if rng.gen_bool(0.2) {
        e.set_type_name_code(rng.gen());
    }
    if rng.gen_bool(0.2) {
        e.set_metadata(string(rng, 20));
    }
    if rng.gen_bool(0.1) {
        e.set_extended(blob(rng));
    }
    e.set_data(data);
    Ok(e)
}

fn entry(rng: &mut StdRng) -> Result<MessageEntry> {
    let entry_type = *ENTRY_TYPES.choose(rng).unwrap_or(&MessageEntryType::Null);
    let mut e = MessageEntry { entry_type, ..MessageEntry::default() };
    if rng.gen_bool(0.5) {
        e.set_service_path(string(rng, 30));
    }
    if rng.gen_bool(0.3) {
        e.set_service_path_code(rng.gen());
    }
    if rng.gen_bool(0.7) {
        e.set_member_name(string(rng, 16));
    }
    if rng.gen_bool(0.3) {
        e.set_member_name_code(rng.gen());
    }
    if rng.gen_bool(0.5) {
        e.set_request_id(rng.gen());
    }
    if rng.gen_bool(0.2) {
        e.set_error(rng.gen());
    }
    if rng.gen_bool(0.2) {
        e.set_metadata(string(rng, 20));
    }
    if rng.gen_bool(0.1) {
        e.set_extended(blob(rng));
    }
    let n = rng.gen_range(0..6);
    e.elements = (0..n).map(|i| element(rng, 0, i)).collect::<Result<Vec<_>>>()?;
    Ok(e)
}

fn message(rng: &mut StdRng) -> Result<Message> {
    let n = rng.gen_range(0..5);
    let entries = (0..n).map(|_| entry(rng)).collect::<Result<Vec<_>>>()?;
    let mut m = Message::with_entries(entries);
    let h = &mut m.header;
    if rng.gen_bool(0.5) {
        h.set_routing(NodeId::random(), NodeId::random(), string(rng, 12), string(rng, 12));
    }
    if rng.gen_bool(0.5) {
        h.set_endpoints(rng.gen(), rng.gen());
    }
    if rng.gen_bool(0.3) {
        h.set_priority(rng.gen());
    }
    if rng.gen_bool(0.3) {
        h.set_meta(string(rng, 20), rng.gen(), rng.gen());
    }
    if rng.gen_bool(0.1) {
        h.set_extended(blob(rng));
    }
    // A single entry may still be announced explicitly.
    if rng.gen_bool(0.2) {
        h.flags.insert(MessageFlags::MULTIPLE_ENTRIES);
    }
    Ok(m)
}

fn round_trip(m: &Message) -> Result<Vec<u8>> {
    let size = compute_size(m)?;
    let mut buf = vec![0u8; size as usize];
    ensure!(encode(m, &mut buf)? == size, "encode wrote a different size");

    let d = decode(&buf)?;
    compare_messages(m, &d)?;
    ensure!(compute_size(&d)? == size, "decoded message measures differently");
    ensure!(encode_to_vec(&d)? == buf, "re-encoding changed the bytes");
    Ok(buf)
}

// ============================================================================
//  TESTS
// ============================================================================

#[test]
fn randomized_round_trip() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..200 {
        let m = message(&mut rng)?;
        round_trip(&m)?;
    }
    Ok(())
}

#[test]
fn large_entry_round_trip() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let count = rng.gen_range(512 * 1024..=1024 * 1024);
    let data: Vec<f64> = (0..count).map(|_| rng.gen()).collect();

    let entry = MessageEntry::new(MessageEntryType::PipePacket, "samples")
        .with_elements(vec![MessageElement::new("v", data)]);
    let m = Message::with_entries(vec![entry]);

    let buf = round_trip(&m)?;
    ensure!(buf.len() > count * 8, "payload smaller than its values");
    Ok(())
}

#[test]
fn header_flag_gating() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let mut m = message(&mut rng)?;
    m.header.set_routing(NodeId::random(), NodeId::random(), "a", "b");
    m.header.set_endpoints(1, 2);
    m.header.set_priority(3);
    m.header.set_meta("meta", 4, 5);
    m.header.set_extended(vec![6, 7]);
    let full = compute_size(&m)?;

    let optional = [
        MessageFlags::ROUTING_INFO,
        MessageFlags::ENDPOINT_INFO,
        MessageFlags::PRIORITY,
        MessageFlags::META_INFO,
        MessageFlags::EXTENDED,
    ];
    for flag in optional {
        let mut less = m.clone();
        less.header.flags.remove(flag);
        ensure!(compute_size(&less)? < full, "{:?} did not shrink the message", flag);

        let d = decode(&encode_to_vec(&less)?)?;
        let mut expected = less.clone();
        let flags = expected.header.flags;
        expected.header = MessageHeader { flags, ..m.header.clone() };
        match flag {
            f if f == MessageFlags::ROUTING_INFO => {
                expected.header.sender_node_id = NodeId::nil();
                expected.header.receiver_node_id = NodeId::nil();
                expected.header.sender_node_name.clear();
                expected.header.receiver_node_name.clear();
            }
            f if f == MessageFlags::ENDPOINT_INFO => {
                expected.header.sender_endpoint = 0;
                expected.header.receiver_endpoint = 0;
            }
            f if f == MessageFlags::PRIORITY => expected.header.priority = 0,
            f if f == MessageFlags::META_INFO => {
                expected.header.metadata.clear();
                expected.header.message_id = 0;
                expected.header.message_res_id = 0;
            }
            _ => expected.header.extended.clear(),
        }
        ensure!(d.header == expected.header, "{:?} leaked into other fields", flag);
    }
    Ok(())
}

fn decode_single(e: &MessageEntry) -> Result<MessageEntry> {
    let d = decode(&encode_to_vec(&Message::with_entries(vec![e.clone()]))?)?;
    d.entries.into_iter().next().ok_or_else(|| anyhow::anyhow!("no entry decoded"))
}

/// Zeroes the fields a single element flag governs.
fn clear_element_field(e: &mut MessageElement, flag: ElementFlags) {
    match flag {
        f if f == ElementFlags::NAME_STR => e.name.clear(),
        f if f == ElementFlags::NAME_CODE => e.name_code = 0,
        f if f == ElementFlags::NUMBER => e.number = 0,
        f if f == ElementFlags::TYPE_NAME_STR => e.type_name.clear(),
        f if f == ElementFlags::TYPE_NAME_CODE => e.type_name_code = 0,
        f if f == ElementFlags::META_INFO => e.metadata.clear(),
        _ => e.extended.clear(),
    }
}

#[test]
fn element_flag_gating() -> Result<()> {
    let mut named = MessageElement::new("x", vec![1i16, 2, 3]);
    named.set_name_code(300);
    let mut numbered = MessageElement::numbered(-200, vec![1i16, 2, 3]);
    for e in [&mut named, &mut numbered] {
        e.set_type_name("t");
        e.set_type_name_code(9);
        e.set_metadata("m");
        e.set_extended(vec![1, 2, 3]);
    }

    let cases = [
        (&named, ElementFlags::NAME_STR),
        (&named, ElementFlags::NAME_CODE),
        (&numbered, ElementFlags::NUMBER),
        (&named, ElementFlags::TYPE_NAME_STR),
        (&named, ElementFlags::TYPE_NAME_CODE),
        (&named, ElementFlags::META_INFO),
        (&named, ElementFlags::EXTENDED),
    ];
    for (e, flag) in cases {
        let full = e.compute_size()?;
        let mut less = e.clone();
        less.flags.remove(flag);
        ensure!(less.compute_size()? < full, "{:?} did not shrink the element", flag);

        let entry = MessageEntry::new(MessageEntryType::PropertySetReq, "p").with_elements(vec![less.clone()]);
        let got = decode_single(&entry)?.elements.remove(0);
        compare_elements(&less, &got)?;

        let mut expected = less.clone();
        clear_element_field(&mut expected, flag);
        ensure!(got == expected, "{:?} leaked into other fields", flag);
    }
    Ok(())
}

#[test]
fn entry_flag_gating() -> Result<()> {
    let mut e = MessageEntry::new(MessageEntryType::FunctionCallRes, "member");
    e.set_service_path("example.service.root");
    e.set_service_path_code(1000);
    e.set_member_name_code(2000);
    e.set_request_id(3000);
    e.set_error(4);
    e.set_metadata("meta");
    e.set_extended(vec![5, 6]);
    e.add_element(MessageElement::new("v", vec![1.0f32]));
    let full = e.compute_size()?;

    let optional = [
        EntryFlags::SERVICE_PATH_STR,
        EntryFlags::SERVICE_PATH_CODE,
        EntryFlags::MEMBER_NAME_STR,
        EntryFlags::MEMBER_NAME_CODE,
        EntryFlags::REQUEST_ID,
        EntryFlags::ERROR,
        EntryFlags::META_INFO,
        EntryFlags::EXTENDED,
    ];
    for flag in optional {
        let mut less = e.clone();
        less.flags.remove(flag);
        ensure!(less.compute_size()? < full, "{:?} did not shrink the entry", flag);

        let got = decode_single(&less)?;
        compare_entries(&less, &got)?;

        let mut expected = less.clone();
        match flag {
            f if f == EntryFlags::SERVICE_PATH_STR => expected.service_path.clear(),
            f if f == EntryFlags::SERVICE_PATH_CODE => expected.service_path_code = 0,
            f if f == EntryFlags::MEMBER_NAME_STR => expected.member_name.clear(),
            f if f == EntryFlags::MEMBER_NAME_CODE => expected.member_name_code = 0,
            f if f == EntryFlags::REQUEST_ID => expected.request_id = 0,
            f if f == EntryFlags::ERROR => expected.error = 0,
            f if f == EntryFlags::META_INFO => expected.metadata.clear(),
            _ => expected.extended.clear(),
        }
        ensure!(got == expected, "{:?} leaked into other fields", flag);
    }
    Ok(())
}

#[test]
fn every_prefix_is_rejected() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..10 {
        let bytes = encode_to_vec(&message(&mut rng)?)?;
        for len in 0..bytes.len() {
            ensure!(decode(&bytes[..len]).is_err(), "prefix of {} bytes decoded", len);
        }
    }
    Ok(())
}

#[test]
fn corrupted_bytes_never_panic() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(31);
    let decoder = Decoder::new(DecodeLimits::default().with_max_data_count(1 << 16));
    for _ in 0..50 {
        let bytes = encode_to_vec(&message(&mut rng)?)?;
        for _ in 0..20 {
            let mut bad = bytes.clone();
            let at = rng.gen_range(0..bad.len());
            bad[at] = rng.gen();
            // Either outcome is fine; a decoded message must measure what it read.
            if let Ok(m) = decoder.decode(&bad) {
                ensure!(compute_size(&m)? == peek_message_size(&bad)?, "decoded size drifted");
            }
        }
    }
    Ok(())
}

#[test]
fn concurrent_round_trips() -> Result<()> {
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                s.spawn(move || -> Result<()> {
                    let mut rng = StdRng::seed_from_u64(100 + seed);
                    for _ in 0..25 {
                        round_trip(&message(&mut rng)?)?;
                    }
                    Ok(())
                })
            })
            .collect();
        for h in handles {
            match h.join() {
                Ok(result) => result?,
                Err(_) => anyhow::bail!("round trip thread panicked"),
            }
        }
        Ok(())
    })
}
