//! Messages, their headers and their entries.

use crate::element::MessageElement;
use crate::error::Result;
use crate::flags::EntryFlags;
use crate::flags::MessageFlags;
use crate::types::MessageEntryType;
use crate::types::NodeId;

/// Envelope metadata. Fields are only meaningful while their flag is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageHeader {
    pub flags: MessageFlags,
    pub sender_node_id: NodeId,
    pub receiver_node_id: NodeId,
    pub sender_node_name: String,
    pub receiver_node_name: String,
    pub sender_endpoint: u32,
    pub receiver_endpoint: u32,
    pub priority: u16,
    pub metadata: String,
    pub message_id: u16,
    pub message_res_id: u16,
    pub extended: Vec<u8>,
}

impl MessageHeader {
    pub fn set_routing(
        &mut self,
        sender_node_id: NodeId,
        receiver_node_id: NodeId,
        sender_node_name: impl Into<String>,
        receiver_node_name: impl Into<String>,
    ) {
        self.sender_node_id = sender_node_id;
        self.receiver_node_id = receiver_node_id;
        self.sender_node_name = sender_node_name.into();
        self.receiver_node_name = receiver_node_name.into();
        self.flags.insert(MessageFlags::ROUTING_INFO);
    }

    pub fn set_endpoints(&mut self, sender_endpoint: u32, receiver_endpoint: u32) {
        self.sender_endpoint = sender_endpoint;
        self.receiver_endpoint = receiver_endpoint;
        self.flags.insert(MessageFlags::ENDPOINT_INFO);
    }

    pub fn set_priority(&mut self, priority: u16) {
        self.priority = priority;
        self.flags.insert(MessageFlags::PRIORITY);
    }

    pub fn set_meta(&mut self, metadata: impl Into<String>, message_id: u16, message_res_id: u16) {
        self.metadata = metadata.into();
        self.message_id = message_id;
        self.message_res_id = message_res_id;
        self.flags.insert(MessageFlags::META_INFO);
    }

    pub fn set_extended(&mut self, extended: impl Into<Vec<u8>>) {
        self.extended = extended.into();
        self.flags.insert(MessageFlags::EXTENDED);
    }
}

/// One operation, event or packet within a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageEntry {
    pub flags: EntryFlags,
    pub entry_type: MessageEntryType,
    pub service_path: String,
    pub service_path_code: u32,
    pub member_name: String,
    pub member_name_code: u32,
    pub request_id: u32,
    pub error: u16,
    pub metadata: String,
    pub extended: Vec<u8>,
    pub elements: Vec<MessageElement>,
}

impl MessageEntry {
    pub fn new(entry_type: MessageEntryType, member_name: impl Into<String>) -> Self {
        let mut entry = Self { entry_type, ..Self::default() };
        entry.set_member_name(member_name);
        entry
    }

    pub fn with_elements(mut self, elements: Vec<MessageElement>) -> Self {
        self.elements = elements;
        self
    }

    pub fn set_service_path(&mut self, path: impl Into<String>) {
        self.service_path = path.into();
        self.flags.insert(EntryFlags::SERVICE_PATH_STR);
    }

    pub fn set_service_path_code(&mut self, code: u32) {
        self.service_path_code = code;
        self.flags.insert(EntryFlags::SERVICE_PATH_CODE);
    }

    pub fn set_member_name(&mut self, name: impl Into<String>) {
        self.member_name = name.into();
        self.flags.insert(EntryFlags::MEMBER_NAME_STR);
    }

    pub fn set_member_name_code(&mut self, code: u32) {
        self.member_name_code = code;
        self.flags.insert(EntryFlags::MEMBER_NAME_CODE);
    }

    pub fn set_request_id(&mut self, request_id: u32) {
        self.request_id = request_id;
        self.flags.insert(EntryFlags::REQUEST_ID);
    }

    pub fn set_error(&mut self, error: u16) {
        self.error = error;
        self.flags.insert(EntryFlags::ERROR);
    }

    pub fn set_metadata(&mut self, metadata: impl Into<String>) {
        self.metadata = metadata.into();
        self.flags.insert(EntryFlags::META_INFO);
    }

    pub fn set_extended(&mut self, extended: impl Into<Vec<u8>>) {
        self.extended = extended.into();
        self.flags.insert(EntryFlags::EXTENDED);
    }

    pub fn add_element(&mut self, element: MessageElement) {
        self.elements.push(element);
    }

    /// Finds an element by its string name.
    pub fn find_element(&self, name: &str) -> Option<&MessageElement> {
        self.elements
            .iter()
            .find(|e| e.flags.contains(crate::flags::ElementFlags::NAME_STR) && e.name == name)
    }

    /// Bytes this entry occupies on the wire, size field included.
    pub fn compute_size(&self) -> Result<u32> {
        crate::encode::measure(|s| crate::plan::write_entry(s, self))
    }
}

/// The top-level unit exchanged between nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub header: MessageHeader,
    pub entries: Vec<MessageEntry>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a message around `entries`, setting `MultipleEntries` unless
    /// there is exactly one.
    pub fn with_entries(entries: Vec<MessageEntry>) -> Self {
        let mut m = Self { header: MessageHeader::default(), entries };
        m.sync_entry_flag();
        m
    }

    pub fn add_entry(&mut self, entry: MessageEntry) {
        self.entries.push(entry);
        self.sync_entry_flag();
    }

    /// The entry count the header carries, always derived from the entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn sync_entry_flag(&mut self) {
        let multiple = self.entries.len() != 1;
        self.header.flags.set(MessageFlags::MULTIPLE_ENTRIES, multiple);
    }
}
