//! # Structural Comparison
//!
//! Flag-gated equality between two message graphs. Flags are compared first and
//! the comparison stops at the first difference; fields are then compared only
//! where their flag is set. Floating point values compare by bit pattern, so a
//! NaN that survived a round trip equals itself and `-0.0` differs from `0.0`.
//!
//! `PartialEq` on the data model compares every field, flagged or not; use these
//! functions to check that a decoded message carries what was encoded.

use std::fmt;

use crate::element::ElementData;
use crate::element::MessageElement;
use crate::flags::ElementFlags;
use crate::flags::EntryFlags;
use crate::flags::MessageFlags;
use crate::macros::for_each_array;
use crate::message::Message;
use crate::message::MessageEntry;
use crate::message::MessageHeader;
use crate::types::CDouble;
use crate::types::CSingle;

/// The first difference found, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Location such as `entries[1].elements[0].data[3]`.
    pub path: String,
    pub detail: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.detail)
    }
}

impl std::error::Error for Mismatch {}

type Compared = std::result::Result<(), Mismatch>;

fn mismatch(path: &str, detail: String) -> Compared {
    Err(Mismatch { path: path.to_owned(), detail })
}

fn field<T: PartialEq + fmt::Debug>(path: &str, name: &str, a: &T, b: &T) -> Compared {
    if a != b {
        return mismatch(&format!("{}.{}", path, name), format!("{:?} != {:?}", a, b));
    }
    Ok(())
}

/// Bit-exact equality for wire values.
trait WireEq {
    fn wire_eq(&self, other: &Self) -> bool;
}

macro_rules! wire_eq_by_value {
    ($($ty:ty),*) => {
        $( impl WireEq for $ty {
            fn wire_eq(&self, other: &Self) -> bool {
                self == other
            }
        } )*
    };
}

wire_eq_by_value!(i8, u8, i16, u16, i32, u32, i64, u64, bool);

impl WireEq for f32 {
    fn wire_eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl WireEq for f64 {
    fn wire_eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl WireEq for CDouble {
    fn wire_eq(&self, other: &Self) -> bool {
        self.real.wire_eq(&other.real) && self.imag.wire_eq(&other.imag)
    }
}

impl WireEq for CSingle {
    fn wire_eq(&self, other: &Self) -> bool {
        self.real.wire_eq(&other.real) && self.imag.wire_eq(&other.imag)
    }
}

fn compare_slices<T: WireEq + fmt::Debug>(path: &str, a: &[T], b: &[T]) -> Compared {
    if a.len() != b.len() {
        return mismatch(path, format!("length {} != {}", a.len(), b.len()));
    }
    match a.iter().zip(b).position(|(x, y)| !x.wire_eq(y)) {
        Some(i) => mismatch(&format!("{}[{}]", path, i), format!("{:?} != {:?}", a[i], b[i])),
        None => Ok(()),
    }
}

/// Compares two messages, header first, then entries in order.
pub fn compare_messages(a: &Message, b: &Message) -> Compared {
    compare_headers(&a.header, &b.header)?;
    if a.entries.len() != b.entries.len() {
        return mismatch("entries", format!("count {} != {}", a.entries.len(), b.entries.len()));
    }
    for (i, (x, y)) in a.entries.iter().zip(&b.entries).enumerate() {
        compare_entries_at(&format!("entries[{}]", i), x, y)?;
    }
    Ok(())
}

pub fn messages_equal(a: &Message, b: &Message) -> bool {
    compare_messages(a, b).is_ok()
}

pub fn compare_headers(a: &MessageHeader, b: &MessageHeader) -> Compared {
    let p = "header";
    field(p, "flags", &a.flags, &b.flags)?;
    let f = a.flags;
    if f.contains(MessageFlags::ROUTING_INFO) {
        field(p, "sender_node_id", &a.sender_node_id, &b.sender_node_id)?;
        field(p, "receiver_node_id", &a.receiver_node_id, &b.receiver_node_id)?;
        field(p, "sender_node_name", &a.sender_node_name, &b.sender_node_name)?;
        field(p, "receiver_node_name", &a.receiver_node_name, &b.receiver_node_name)?;
    }
    if f.contains(MessageFlags::ENDPOINT_INFO) {
        field(p, "sender_endpoint", &a.sender_endpoint, &b.sender_endpoint)?;
        field(p, "receiver_endpoint", &a.receiver_endpoint, &b.receiver_endpoint)?;
    }
    if f.contains(MessageFlags::PRIORITY) {
        field(p, "priority", &a.priority, &b.priority)?;
    }
    if f.contains(MessageFlags::META_INFO) {
        field(p, "metadata", &a.metadata, &b.metadata)?;
        field(p, "message_id", &a.message_id, &b.message_id)?;
        field(p, "message_res_id", &a.message_res_id, &b.message_res_id)?;
    }
    if f.contains(MessageFlags::EXTENDED) {
        field(p, "extended", &a.extended, &b.extended)?;
    }
    Ok(())
}

pub fn compare_entries(a: &MessageEntry, b: &MessageEntry) -> Compared {
    compare_entries_at("entry", a, b)
}

fn compare_entries_at(p: &str, a: &MessageEntry, b: &MessageEntry) -> Compared {
    field(p, "flags", &a.flags, &b.flags)?;
    field(p, "entry_type", &a.entry_type, &b.entry_type)?;
    let f = a.flags;
    if f.contains(EntryFlags::SERVICE_PATH_STR) {
        field(p, "service_path", &a.service_path, &b.service_path)?;
    }
    if f.contains(EntryFlags::SERVICE_PATH_CODE) {
        field(p, "service_path_code", &a.service_path_code, &b.service_path_code)?;
    }
    if f.contains(EntryFlags::MEMBER_NAME_STR) {
        field(p, "member_name", &a.member_name, &b.member_name)?;
    }
    if f.contains(EntryFlags::MEMBER_NAME_CODE) {
        field(p, "member_name_code", &a.member_name_code, &b.member_name_code)?;
    }
    if f.contains(EntryFlags::REQUEST_ID) {
        field(p, "request_id", &a.request_id, &b.request_id)?;
    }
    if f.contains(EntryFlags::ERROR) {
        field(p, "error", &a.error, &b.error)?;
    }
    if f.contains(EntryFlags::META_INFO) {
        field(p, "metadata", &a.metadata, &b.metadata)?;
    }
    if f.contains(EntryFlags::EXTENDED) {
        field(p, "extended", &a.extended, &b.extended)?;
    }
    compare_element_lists(p, &a.elements, &b.elements)
}

fn compare_element_lists(p: &str, a: &[MessageElement], b: &[MessageElement]) -> Compared {
    if a.len() != b.len() {
        return mismatch(&format!("{}.elements", p), format!("count {} != {}", a.len(), b.len()));
    }
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        compare_elements_at(&format!("{}.elements[{}]", p, i), x, y)?;
    }
    Ok(())
}

pub fn compare_elements(a: &MessageElement, b: &MessageElement) -> Compared {
    compare_elements_at("element", a, b)
}

fn compare_elements_at(p: &str, a: &MessageElement, b: &MessageElement) -> Compared {
    field(p, "flags", &a.flags, &b.flags)?;
    field(p, "element_type", &a.element_type(), &b.element_type())?;
    let f = a.flags;
    if f.contains(ElementFlags::NAME_STR) {
        field(p, "name", &a.name, &b.name)?;
    }
    if f.contains(ElementFlags::NAME_CODE) {
        field(p, "name_code", &a.name_code, &b.name_code)?;
    }
    if f.contains(ElementFlags::NUMBER) {
        field(p, "number", &a.number, &b.number)?;
    }
    if f.contains(ElementFlags::TYPE_NAME_STR) {
        field(p, "type_name", &a.type_name, &b.type_name)?;
    }
    if f.contains(ElementFlags::TYPE_NAME_CODE) {
        field(p, "type_name_code", &a.type_name_code, &b.type_name_code)?;
    }
    if f.contains(ElementFlags::META_INFO) {
        field(p, "metadata", &a.metadata, &b.metadata)?;
    }
    if f.contains(ElementFlags::EXTENDED) {
        field(p, "extended", &a.extended, &b.extended)?;
    }
    field(p, "data_count", &a.data.len(), &b.data.len())?;
    compare_data(&format!("{}.data", p), &a.data, &b.data)
}

macro_rules! define_compare_data {
    ($( ($variant:ident, $ty:ty, $accessor:ident) ),* $(,)?) => {
        fn compare_data(p: &str, a: &ElementData, b: &ElementData) -> Compared {
            match (a, b) {
                (ElementData::Void, ElementData::Void) => Ok(()),
                $( (ElementData::$variant(x), ElementData::$variant(y)) => compare_slices(p, x.as_slice(), y.as_slice()), )*
                (ElementData::String(x), ElementData::String(y)) => field(p, "value", x, y),
                (ElementData::Nested(x), ElementData::Nested(y)) => {
                    field(p, "type_name", &x.type_name, &y.type_name)?;
                    compare_element_lists(p, &x.elements, &y.elements)
                }
                _ => mismatch(p, format!("{} != {}", a.data_type(), b.data_type())),
            }
        }
    };
}

for_each_array!(define_compare_data);
