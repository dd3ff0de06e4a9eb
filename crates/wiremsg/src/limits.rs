//! Resource ceilings applied while decoding untrusted input.

/// Upper bounds the decoder enforces before it allocates.
///
/// Independently of these, a declared count is always checked against the bytes
/// left in its enclosing record, so a lying prefix can never cause an allocation
/// larger than the input itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest allowed nesting of elements; top-level elements sit at depth 1.
    pub max_depth: usize,
    /// Most entries per message, elements per entry or children per nested list.
    pub max_elements: u64,
    /// Most values in one array payload.
    pub max_data_count: u64,
    /// Longest string or blob, in bytes.
    pub max_string_len: u64,
    /// Largest accepted `message_size`.
    pub max_message_size: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_elements: 1 << 20,
            max_data_count: 64 << 20,
            max_string_len: 16 << 20,
            max_message_size: 1 << 30,
        }
    }
}

impl DecodeLimits {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_elements(mut self, count: u64) -> Self {
        self.max_elements = count;
        self
    }

    pub fn with_max_data_count(mut self, count: u64) -> Self {
        self.max_data_count = count;
        self
    }

    pub fn with_max_string_len(mut self, len: u64) -> Self {
        self.max_string_len = len;
        self
    }

    pub fn with_max_message_size(mut self, size: u64) -> Self {
        self.max_message_size = size;
        self
    }
}
