//! # Elements
//!
//! A [`MessageElement`] is a named or numbered typed value. Its payload is an
//! [`ElementData`]: either a flat homogeneous array, a string, nothing (`void`),
//! or a [`NestedElementList`] for the compound types. The element's type tag is
//! always derived from the payload, so the two can never disagree.

use crate::error::Error;
use crate::error::Result;
use crate::flags::ElementFlags;
use crate::macros::for_each_array;
use crate::types::DataType;

/// Child elements of a compound value.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedElementList {
    data_type: DataType,
    /// Structure, pod or namedarray type name; empty when the type has none.
    pub type_name: String,
    pub elements: Vec<MessageElement>,
}

impl NestedElementList {
    /// # Errors
    /// `NotCompound` if `data_type` is a primitive type.
    pub fn new(data_type: DataType, type_name: impl Into<String>, elements: Vec<MessageElement>) -> Result<Self> {
        if !data_type.is_compound() {
            return Err(Error::NotCompound(data_type));
        }
        Ok(Self { data_type, type_name: type_name.into(), elements })
    }

    pub(crate) fn from_wire(data_type: DataType, type_name: String, elements: Vec<MessageElement>) -> Self {
        debug_assert!(data_type.is_compound());
        Self { data_type, type_name, elements }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Finds a child by its string name.
    pub fn find(&self, name: &str) -> Option<&MessageElement> {
        self.elements
            .iter()
            .find(|e| e.flags.contains(ElementFlags::NAME_STR) && e.name == name)
    }
}

macro_rules! define_element_data {
    ($( ($variant:ident, $ty:ty, $accessor:ident) ),* $(,)?) => {
        /// The payload of an element.
        #[derive(Debug, Clone, Default, PartialEq)]
        pub enum ElementData {
            #[default]
            Void,
            $( $variant(Vec<$ty>), )*
            String(String),
            Nested(NestedElementList),
        }

        impl ElementData {
            /// The element type tag this payload is written with.
            pub fn data_type(&self) -> DataType {
                match self {
                    ElementData::Void => DataType::Void,
                    $( ElementData::$variant(_) => DataType::$variant, )*
                    ElementData::String(_) => DataType::String,
                    ElementData::Nested(n) => n.data_type(),
                }
            }

            /// The `data_count` written on the wire: values for arrays, UTF-8
            /// bytes for strings, children for nested lists.
            pub fn len(&self) -> usize {
                match self {
                    ElementData::Void => 0,
                    $( ElementData::$variant(v) => v.len(), )*
                    ElementData::String(s) => s.len(),
                    ElementData::Nested(n) => n.len(),
                }
            }

            $(
                pub fn $accessor(&self) -> Option<&[$ty]> {
                    match self {
                        ElementData::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<Vec<$ty>> for ElementData {
                fn from(v: Vec<$ty>) -> Self {
                    ElementData::$variant(v)
                }
            }
        )*
    };
}

for_each_array!(define_element_data);

impl ElementData {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ElementData::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&NestedElementList> {
        match self {
            ElementData::Nested(n) => Some(n),
            _ => None,
        }
    }
}

impl From<String> for ElementData {
    fn from(v: String) -> Self {
        ElementData::String(v)
    }
}

impl From<&str> for ElementData {
    fn from(v: &str) -> Self {
        ElementData::String(v.to_owned())
    }
}

impl From<NestedElementList> for ElementData {
    fn from(v: NestedElementList) -> Self {
        ElementData::Nested(v)
    }
}

/// A typed value within an entry or a nested list.
///
/// Optional fields are only meaningful while their flag is set. The setters keep
/// the naming flags consistent: an element is named by string, by code, or by
/// number, and naming it one way clears the number (or the names).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageElement {
    pub flags: ElementFlags,
    pub name: String,
    pub name_code: u32,
    pub number: i32,
    pub type_name: String,
    pub type_name_code: u32,
    pub metadata: String,
    pub extended: Vec<u8>,
    pub data: ElementData,
}

impl MessageElement {
    /// An element named by string.
    pub fn new(name: impl Into<String>, data: impl Into<ElementData>) -> Self {
        let mut e = Self::default();
        e.set_name(name);
        e.set_data(data);
        e
    }

    /// An element identified by number, as used for list and vector entries.
    pub fn numbered(number: i32, data: impl Into<ElementData>) -> Self {
        let mut e = Self::default();
        e.set_number(number);
        e.set_data(data);
        e
    }

    pub fn element_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Replaces the payload. A nested list with a type name also sets the
    /// element's type name, which is where that name travels on the wire.
    pub fn set_data(&mut self, data: impl Into<ElementData>) {
        self.data = data.into();
        let type_name = match &self.data {
            ElementData::Nested(n) if !n.type_name.is_empty() => Some(n.type_name.clone()),
            _ => None,
        };
        if let Some(type_name) = type_name {
            self.set_type_name(type_name);
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.flags.insert(ElementFlags::NAME_STR);
        self.flags.remove(ElementFlags::NUMBER);
    }

    pub fn set_name_code(&mut self, code: u32) {
        self.name_code = code;
        self.flags.insert(ElementFlags::NAME_CODE);
        self.flags.remove(ElementFlags::NUMBER);
    }

    pub fn set_number(&mut self, number: i32) {
        self.number = number;
        self.flags.insert(ElementFlags::NUMBER);
        self.flags.remove(ElementFlags::NAME_STR | ElementFlags::NAME_CODE);
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
        self.flags.insert(ElementFlags::TYPE_NAME_STR);
    }

    pub fn set_type_name_code(&mut self, code: u32) {
        self.type_name_code = code;
        self.flags.insert(ElementFlags::TYPE_NAME_CODE);
    }

    pub fn set_metadata(&mut self, metadata: impl Into<String>) {
        self.metadata = metadata.into();
        self.flags.insert(ElementFlags::META_INFO);
    }

    pub fn set_extended(&mut self, extended: impl Into<Vec<u8>>) {
        self.extended = extended.into();
        self.flags.insert(ElementFlags::EXTENDED);
    }

    /// The type name a nested list of this element reads back with.
    pub(crate) fn wire_type_name(&self) -> &str {
        if self.flags.contains(ElementFlags::TYPE_NAME_STR) {
            &self.type_name
        } else {
            ""
        }
    }

    /// Bytes this element occupies on the wire, size field included.
    pub fn compute_size(&self) -> Result<u32> {
        crate::encode::measure(|s| crate::plan::write_element(s, self))
    }
}
