//! # Field Plan
//!
//! The one description of field order on the wire. The size pass and the write
//! pass both run these functions, against a `SizeCounter` and a `SliceWriter`
//! respectively, so the computed size is the written size by construction.
//!
//! ## Layout
//!
//! ```text
//! message: "RMSG" | message_size u32 | version u16 | header_size u32 | flags u8 | header fields.. | entries..
//! entry:   entry_size u32 | flags u8 | entry_type u16 | entry fields.. | element_count uint_x | elements..
//! element: element_size u32 | flags u8 | element_type u16 | element fields.. | data_count uint_x | payload
//! ```
//!
//! `message_size` and `header_size` are measured from the magic, entry and
//! element sizes from their own size field. The decoder reads fields in this
//! same order.

use wirepack::Sink;

use crate::element::ElementData;
use crate::element::MessageElement;
use crate::error::Error;
use crate::error::Result;
use crate::flags::ElementFlags;
use crate::flags::EntryFlags;
use crate::flags::MessageFlags;
use crate::macros::for_each_array;
use crate::message::Message;
use crate::message::MessageEntry;

pub const MAGIC: [u8; 4] = *b"RMSG";
pub const VERSION: u16 = 1;

/// Magic, message size, version, header size and flags.
pub(crate) const FIXED_HEADER_SIZE: usize = 4 + 4 + 2 + 4 + 1;
/// Size field, flags, type and a one-byte count.
pub(crate) const MIN_ENTRY_SIZE: usize = 4 + 1 + 2 + 1;
pub(crate) const MIN_ELEMENT_SIZE: usize = 4 + 1 + 2 + 1;

/// Flags checks shared by the writer and the decoder.
pub(crate) fn check_message_flags(flags: MessageFlags) -> Result<MessageFlags> {
    let flags = flags.validate()?;
    if flags.contains(MessageFlags::STRING_TABLE) {
        return Err(Error::UnsupportedFeature("string table"));
    }
    Ok(flags)
}

pub(crate) fn write_message<S: Sink>(s: &mut S, m: &Message) -> Result<u32> {
    let h = &m.header;
    let flags = check_message_flags(h.flags)?;

    let count = m.entries.len();
    if !flags.contains(MessageFlags::MULTIPLE_ENTRIES) && count != 1 {
        return Err(Error::EntryCountMismatch { expected: 1, actual: count });
    }

    let start = s.position();
    s.put_bytes(&MAGIC)?;
    let message = s.begin_sized_from(start)?;
    s.put(VERSION)?;
    let header = s.begin_sized_from(start)?;
    s.put(flags.bits())?;

    if flags.contains(MessageFlags::ROUTING_INFO) {
        s.put_bytes(h.sender_node_id.as_bytes())?;
        s.put_bytes(h.receiver_node_id.as_bytes())?;
        s.put_str(&h.sender_node_name)?;
        s.put_str(&h.receiver_node_name)?;
    }
    if flags.contains(MessageFlags::ENDPOINT_INFO) {
        s.put(h.sender_endpoint)?;
        s.put(h.receiver_endpoint)?;
    }
    if flags.contains(MessageFlags::PRIORITY) {
        s.put(h.priority)?;
    }
    if flags.contains(MessageFlags::META_INFO) {
        s.put_str(&h.metadata)?;
        s.put(h.message_id)?;
        s.put(h.message_res_id)?;
    }
    if flags.contains(MessageFlags::MULTIPLE_ENTRIES) {
        s.put_uint_x(count as u64)?;
    }
    if flags.contains(MessageFlags::EXTENDED) {
        s.put_blob(&h.extended)?;
    }
    s.end_sized(header)?;

    for entry in &m.entries {
        write_entry(s, entry)?;
    }
    Ok(s.end_sized(message)?)
}

pub(crate) fn write_entry<S: Sink>(s: &mut S, e: &MessageEntry) -> Result<()> {
    let flags = e.flags.validate()?;
    let scope = s.begin_sized()?;
    s.put(flags.bits())?;
    s.put(e.entry_type.code())?;

    if flags.contains(EntryFlags::SERVICE_PATH_STR) {
        s.put_str(&e.service_path)?;
    }
    if flags.contains(EntryFlags::SERVICE_PATH_CODE) {
        s.put_uint_x(e.service_path_code as u64)?;
    }
    if flags.contains(EntryFlags::MEMBER_NAME_STR) {
        s.put_str(&e.member_name)?;
    }
    if flags.contains(EntryFlags::MEMBER_NAME_CODE) {
        s.put_uint_x(e.member_name_code as u64)?;
    }
    if flags.contains(EntryFlags::REQUEST_ID) {
        s.put(e.request_id)?;
    }
    if flags.contains(EntryFlags::ERROR) {
        s.put(e.error)?;
    }
    if flags.contains(EntryFlags::META_INFO) {
        s.put_str(&e.metadata)?;
    }
    if flags.contains(EntryFlags::EXTENDED) {
        s.put_blob(&e.extended)?;
    }

    s.put_uint_x(e.elements.len() as u64)?;
    for element in &e.elements {
        write_element(s, element)?;
    }
    s.end_sized(scope)?;
    Ok(())
}

pub(crate) fn write_element<S: Sink>(s: &mut S, e: &MessageElement) -> Result<()> {
    let flags = e.flags.validate()?;
    if let ElementData::Nested(nested) = &e.data {
        // The nested type name is not written on its own; it is read back
        // from the element's type name field.
        if nested.type_name != e.wire_type_name() {
            return Err(Error::NestedTypeName {
                element: e.wire_type_name().to_owned(),
                nested: nested.type_name.clone(),
            });
        }
    }

    let scope = s.begin_sized()?;
    s.put(flags.bits())?;
    s.put(e.element_type().code())?;

    if flags.contains(ElementFlags::NAME_STR) {
        s.put_str(&e.name)?;
    }
    if flags.contains(ElementFlags::NAME_CODE) {
        s.put_uint_x(e.name_code as u64)?;
    }
    if flags.contains(ElementFlags::NUMBER) {
        s.put_int_x(e.number as i64)?;
    }
    if flags.contains(ElementFlags::TYPE_NAME_STR) {
        s.put_str(&e.type_name)?;
    }
    if flags.contains(ElementFlags::TYPE_NAME_CODE) {
        s.put_uint_x(e.type_name_code as u64)?;
    }
    if flags.contains(ElementFlags::META_INFO) {
        s.put_str(&e.metadata)?;
    }
    if flags.contains(ElementFlags::EXTENDED) {
        s.put_blob(&e.extended)?;
    }

    s.put_uint_x(e.data.len() as u64)?;
    write_payload(s, &e.data)?;
    s.end_sized(scope)?;
    Ok(())
}

macro_rules! define_write_payload {
    ($( ($variant:ident, $ty:ty, $accessor:ident) ),* $(,)?) => {
        fn write_payload<S: Sink>(s: &mut S, data: &ElementData) -> Result<()> {
            match data {
                ElementData::Void => {}
                $( ElementData::$variant(v) => s.put_slice(v.as_slice())?, )*
                ElementData::String(v) => s.put_bytes(v.as_bytes())?,
                ElementData::Nested(n) => {
                    for child in &n.elements {
                        write_element(s, child)?;
                    }
                }
            }
            Ok(())
        }
    };
}

for_each_array!(define_write_payload);
