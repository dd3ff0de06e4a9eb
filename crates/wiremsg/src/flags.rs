//! # Flags Bytes
//!
//! Each entity opens with one flags byte. A set bit means the governing optional
//! fields follow, in the order the bits are declared here; an unset bit means
//! they are neither written nor read.

use crate::macros::wire_flags;

wire_flags! {
    /// Optional header fields.
    MessageFlags("message") reserved 0x80 {
        const ROUTING_INFO = 0x01;
        const ENDPOINT_INFO = 0x02;
        const PRIORITY = 0x04;
        const META_INFO = 0x08;
        /// Declared by the protocol but not implemented; always rejected.
        const STRING_TABLE = 0x10;
        const MULTIPLE_ENTRIES = 0x20;
        const EXTENDED = 0x40;
    }
}

wire_flags! {
    /// Optional entry fields.
    EntryFlags("entry") reserved 0x00 {
        const SERVICE_PATH_STR = 0x01;
        const SERVICE_PATH_CODE = 0x02;
        const MEMBER_NAME_STR = 0x04;
        const MEMBER_NAME_CODE = 0x08;
        const REQUEST_ID = 0x10;
        const ERROR = 0x20;
        const META_INFO = 0x40;
        const EXTENDED = 0x80;
    }
}

wire_flags! {
    /// Optional element fields. Bit `0x40` is reserved and must be zero.
    ElementFlags("element") reserved 0x40 {
        const NAME_STR = 0x01;
        const NAME_CODE = 0x02;
        const NUMBER = 0x04;
        const TYPE_NAME_STR = 0x08;
        const TYPE_NAME_CODE = 0x10;
        const META_INFO = 0x20;
        const EXTENDED = 0x80;
    }
}
