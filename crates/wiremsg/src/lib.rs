//! # Wiremsg
//!
//! A flag-driven, self-describing binary message format for node-to-node RPC
//! traffic: requests, responses, events and streamed packets.
//!
//! ## Shape
//!
//! A [`Message`] is a [`MessageHeader`] plus an ordered list of [`MessageEntry`].
//! Each entry carries [`MessageElement`]s, and each element carries typed data:
//! a flat array, a string, or a [`NestedElementList`] of child elements for the
//! compound types (structures, vectors, dictionaries, lists, pods, named arrays,
//! multi-dimensional arrays).
//!
//! Every entity opens with a flags byte. A set flag means its optional fields
//! follow; an unset flag means they are neither written nor read. The flags are
//! the only source of truth for the wire shape.
//!
//! ## Protocol
//!
//! Encoding is two-pass: [`compute_size`] returns the exact length, the caller
//! provides a buffer of that length, and [`encode`] fills it. Both passes run the
//! same field plan, so they cannot drift apart. [`decode`] reverses it and checks
//! every size field against the bytes it actually consumed.
//!
//! ```text
//! [RMSG][message_size][version][header_size][flags][header fields..]
//!     [entry_size][flags][type][entry fields..][n][element..]
//!         [element_size][flags][type][element fields..][n][payload | element..]
//! ```
//!
//! The codec is stateless. Any error is terminal for the message at hand; what
//! to do with the connection is left to the transport.

mod macros;

pub mod compare;
pub mod decode;
pub mod element;
pub mod encode;
pub mod error;
pub mod flags;
pub mod limits;
pub mod message;
pub mod plan;
pub mod types;

pub use compare::compare_elements;
pub use compare::compare_entries;
pub use compare::compare_headers;
pub use compare::compare_messages;
pub use compare::messages_equal;
pub use compare::Mismatch;
pub use decode::decode;
pub use decode::peek_message_size;
pub use decode::Decoder;
pub use element::ElementData;
pub use element::MessageElement;
pub use element::NestedElementList;
pub use encode::compute_size;
pub use encode::encode;
pub use encode::encode_to_vec;
pub use error::Error;
pub use error::Result;
pub use flags::ElementFlags;
pub use flags::EntryFlags;
pub use flags::MessageFlags;
pub use limits::DecodeLimits;
pub use message::Message;
pub use message::MessageEntry;
pub use message::MessageHeader;
pub use types::CDouble;
pub use types::CSingle;
pub use types::DataType;
pub use types::MessageEntryType;
pub use types::NodeId;
