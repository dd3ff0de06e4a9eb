//! # Decoder
//!
//! Reads flags first and then exactly the fields they announce, in field plan
//! order. Every size field is checked against the bytes actually consumed: each
//! record is parsed from a bounded sub-cursor, and bytes left over inside a
//! record are a `SizeMismatch`. Bytes after `message_size` belong to the
//! transport and are ignored.

use tracing::debug;
use tracing::trace;
use wirepack::Cursor;

use crate::element::ElementData;
use crate::element::MessageElement;
use crate::element::NestedElementList;
use crate::error::Error;
use crate::error::Result;
use crate::flags::ElementFlags;
use crate::flags::EntryFlags;
use crate::flags::MessageFlags;
use crate::limits::DecodeLimits;
use crate::macros::for_each_array;
use crate::message::Message;
use crate::message::MessageEntry;
use crate::message::MessageHeader;
use crate::plan;
use crate::types::DataType;
use crate::types::MessageEntryType;
use crate::types::NodeId;

/// Reads the total message size from the first eight bytes, without decoding.
///
/// # Errors
/// `TruncatedInput` with fewer than eight bytes, `BadMagic` if the magic is wrong.
pub fn peek_message_size(buf: &[u8]) -> Result<u32> {
    let mut c = Cursor::new(buf);
    c.need(8)?;
    let magic = c.read_bytes(4)?;
    if magic != plan::MAGIC {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(magic);
        return Err(Error::BadMagic(raw));
    }
    Ok(c.read::<u32>()?)
}

/// Decodes one message with the default limits.
pub fn decode(buf: &[u8]) -> Result<Message> {
    Decoder::default().decode(buf)
}

/// A message decoder bound to a set of resource limits.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    limits: DecodeLimits,
}

impl Decoder {
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Decodes the message at the start of `buf`.
    pub fn decode(&self, buf: &[u8]) -> Result<Message> {
        let result = self.decode_message(buf);
        match &result {
            Ok(m) => trace!(size = buf.len(), entries = m.entries.len(), "decoded message"),
            Err(e) => debug!(error = %e, "rejected message"),
        }
        result
    }

    fn decode_message(&self, buf: &[u8]) -> Result<Message> {
        let message_size = peek_message_size(buf)? as usize;
        self.check_limit("message size", message_size as u64, self.limits.max_message_size)?;
        if message_size < plan::FIXED_HEADER_SIZE {
            return Err(Error::SizeMismatch {
                entity: "message",
                expected: plan::FIXED_HEADER_SIZE as u64,
                actual: message_size as u64,
            });
        }

        let mut c = Cursor::new(buf).take(message_size)?;
        c.skip(8)?;
        let version = c.read::<u16>()?;
        if version != plan::VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let header_size = c.read::<u32>()? as usize;
        let flags = plan::check_message_flags(MessageFlags::from_bits_retain(c.read::<u8>()?))?;

        let mut header = MessageHeader { flags, ..MessageHeader::default() };
        if flags.contains(MessageFlags::ROUTING_INFO) {
            header.sender_node_id = read_node_id(&mut c)?;
            header.receiver_node_id = read_node_id(&mut c)?;
            header.sender_node_name = self.read_string(&mut c)?;
            header.receiver_node_name = self.read_string(&mut c)?;
        }
        if flags.contains(MessageFlags::ENDPOINT_INFO) {
            header.sender_endpoint = c.read()?;
            header.receiver_endpoint = c.read()?;
        }
        if flags.contains(MessageFlags::PRIORITY) {
            header.priority = c.read()?;
        }
        if flags.contains(MessageFlags::META_INFO) {
            header.metadata = self.read_string(&mut c)?;
            header.message_id = c.read()?;
            header.message_res_id = c.read()?;
        }
        let entry_count = if flags.contains(MessageFlags::MULTIPLE_ENTRIES) {
            c.read_uint_x()?
        } else {
            1
        };
        if flags.contains(MessageFlags::EXTENDED) {
            header.extended = self.read_blob(&mut c)?;
        }
        if c.pos() != header_size {
            return Err(Error::SizeMismatch {
                entity: "header",
                expected: header_size as u64,
                actual: c.pos() as u64,
            });
        }

        let entry_count = self.check_count(&c, "entry count", entry_count, self.limits.max_elements, plan::MIN_ENTRY_SIZE)?;
        let mut entries = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            entries.push(self.decode_entry(&mut c)?);
        }
        if !c.is_empty() {
            return Err(Error::SizeMismatch {
                entity: "message",
                expected: message_size as u64,
                actual: c.pos() as u64,
            });
        }

        Ok(Message { header, entries })
    }

    fn decode_entry(&self, c: &mut Cursor<'_>) -> Result<MessageEntry> {
        let mut c = take_record(c, "entry", plan::MIN_ENTRY_SIZE)?;
        let flags = EntryFlags::from_bits_retain(c.read::<u8>()?).validate()?;
        let mut entry = MessageEntry {
            flags,
            entry_type: MessageEntryType::from_u16(c.read::<u16>()?),
            ..MessageEntry::default()
        };

        if flags.contains(EntryFlags::SERVICE_PATH_STR) {
            entry.service_path = self.read_string(&mut c)?;
        }
        if flags.contains(EntryFlags::SERVICE_PATH_CODE) {
            entry.service_path_code = read_code(&mut c, "service path code")?;
        }
        if flags.contains(EntryFlags::MEMBER_NAME_STR) {
            entry.member_name = self.read_string(&mut c)?;
        }
        if flags.contains(EntryFlags::MEMBER_NAME_CODE) {
            entry.member_name_code = read_code(&mut c, "member name code")?;
        }
        if flags.contains(EntryFlags::REQUEST_ID) {
            entry.request_id = c.read()?;
        }
        if flags.contains(EntryFlags::ERROR) {
            entry.error = c.read()?;
        }
        if flags.contains(EntryFlags::META_INFO) {
            entry.metadata = self.read_string(&mut c)?;
        }
        if flags.contains(EntryFlags::EXTENDED) {
            entry.extended = self.read_blob(&mut c)?;
        }

        let count = c.read_uint_x()?;
        entry.elements = self.decode_elements(&mut c, count, 1)?;
        finish_record(&c, "entry")?;
        Ok(entry)
    }

    fn decode_elements(&self, c: &mut Cursor<'_>, count: u64, depth: usize) -> Result<Vec<MessageElement>> {
        let count = self.check_count(c, "element count", count, self.limits.max_elements, plan::MIN_ELEMENT_SIZE)?;
        if count > 0 && depth > self.limits.max_depth {
            return Err(Error::DepthLimitExceeded(self.limits.max_depth));
        }
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.decode_element(c, depth)?);
        }
        Ok(elements)
    }

    fn decode_element(&self, c: &mut Cursor<'_>, depth: usize) -> Result<MessageElement> {
        let mut c = take_record(c, "element", plan::MIN_ELEMENT_SIZE)?;
        let flags = ElementFlags::from_bits_retain(c.read::<u8>()?).validate()?;
        let data_type = DataType::from_u16(c.read::<u16>()?)?;
        let mut element = MessageElement { flags, ..MessageElement::default() };

        if flags.contains(ElementFlags::NAME_STR) {
            element.name = self.read_string(&mut c)?;
        }
        if flags.contains(ElementFlags::NAME_CODE) {
            element.name_code = read_code(&mut c, "element name code")?;
        }
        if flags.contains(ElementFlags::NUMBER) {
            let v = c.read_int_x()?;
            element.number = i32::try_from(v).map_err(|_| Error::OutOfRange { field: "element number", value: v as i128 })?;
        }
        if flags.contains(ElementFlags::TYPE_NAME_STR) {
            element.type_name = self.read_string(&mut c)?;
        }
        if flags.contains(ElementFlags::TYPE_NAME_CODE) {
            element.type_name_code = read_code(&mut c, "type name code")?;
        }
        if flags.contains(ElementFlags::META_INFO) {
            element.metadata = self.read_string(&mut c)?;
        }
        if flags.contains(ElementFlags::EXTENDED) {
            element.extended = self.read_blob(&mut c)?;
        }

        let count = c.read_uint_x()?;
        element.data = match data_type {
            DataType::Void if count != 0 => return Err(Error::VoidWithData(count)),
            DataType::Void => ElementData::Void,
            DataType::String => {
                let len = self.check_count(&c, "string length", count, self.limits.max_string_len, 1)?;
                ElementData::String(read_utf8(&mut c, len)?)
            }
            ty if ty.is_compound() => {
                let children = self.decode_elements(&mut c, count, depth + 1)?;
                let type_name = element.wire_type_name().to_owned();
                ElementData::Nested(NestedElementList::from_wire(ty, type_name, children))
            }
            ty => {
                let n = self.check_count(&c, "data count", count, self.limits.max_data_count, ty.min_unit_width())?;
                read_array(&mut c, ty, n)?
            }
        };

        finish_record(&c, "element")?;
        Ok(element)
    }

    /// Checks a declared count against its limit and against the bytes left,
    /// before anything is allocated for it.
    fn check_count(&self, c: &Cursor<'_>, what: &'static str, count: u64, limit: u64, min_width: usize) -> Result<usize> {
        self.check_limit(what, count, limit)?;
        let needed = count.saturating_mul(min_width as u64);
        if needed > c.remaining() as u64 {
            return Err(Error::TruncatedInput {
                needed: usize::try_from(needed).unwrap_or(usize::MAX),
                remaining: c.remaining(),
            });
        }
        // Bounded by the remaining input, so it fits a usize.
        Ok(count as usize)
    }

    fn check_limit(&self, what: &'static str, requested: u64, limit: u64) -> Result<()> {
        if requested > limit {
            return Err(Error::LimitExceeded { what, requested, limit });
        }
        Ok(())
    }

    fn read_string(&self, c: &mut Cursor<'_>) -> Result<String> {
        let len = c.read_uint_x()?;
        let len = self.check_count(c, "string length", len, self.limits.max_string_len, 1)?;
        read_utf8(c, len)
    }

    fn read_blob(&self, c: &mut Cursor<'_>) -> Result<Vec<u8>> {
        let len = c.read_uint_x()?;
        let len = self.check_count(c, "blob length", len, self.limits.max_string_len, 1)?;
        Ok(c.read_bytes(len)?.to_vec())
    }
}

/// Reads a record's size field and splits the record off as its own cursor.
fn take_record<'a>(c: &mut Cursor<'a>, entity: &'static str, min: usize) -> Result<Cursor<'a>> {
    let size = c.read::<u32>()? as usize;
    if size < min {
        return Err(Error::SizeMismatch { entity, expected: min as u64, actual: size as u64 });
    }
    Ok(c.take(size - 4)?)
}

fn finish_record(c: &Cursor<'_>, entity: &'static str) -> Result<()> {
    if !c.is_empty() {
        // Sizes as declared (size field included) versus consumed.
        let declared = c.pos() + c.remaining() + 4;
        return Err(Error::SizeMismatch {
            entity,
            expected: declared as u64,
            actual: (c.pos() + 4) as u64,
        });
    }
    Ok(())
}

fn read_node_id(c: &mut Cursor<'_>) -> Result<NodeId> {
    let mut raw = [0u8; 16];
    raw.copy_from_slice(c.read_bytes(16)?);
    Ok(NodeId::from_bytes(raw))
}

fn read_code(c: &mut Cursor<'_>, field: &'static str) -> Result<u32> {
    let v = c.read_uint_x()?;
    u32::try_from(v).map_err(|_| Error::OutOfRange { field, value: v as i128 })
}

fn read_utf8(c: &mut Cursor<'_>, len: usize) -> Result<String> {
    let bytes = c.read_bytes(len)?;
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => Err(Error::InvalidUtf8),
    }
}

macro_rules! define_read_array {
    ($( ($variant:ident, $ty:ty, $accessor:ident) ),* $(,)?) => {
        fn read_array(c: &mut Cursor<'_>, ty: DataType, n: usize) -> Result<ElementData> {
            let data = match ty {
                $( DataType::$variant => ElementData::$variant(c.read_slice::<$ty>(n)?), )*
                other => return Err(Error::UnknownDataType(other.code())),
            };
            Ok(data)
        }
    };
}

for_each_array!(define_read_array);
