//! Scalar vocabulary of the format: element data types, entry types, node ids
//! and the complex number primitives.

use std::fmt;

use uuid::Uuid;
use wirepack::Primitive;

use crate::error::Error;
use crate::error::Result;

// ============================================================================
//  DATA TYPES
// ============================================================================

/// The type tag carried by every element.
#[repr(u16)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DataType {
    #[default]
    Void = 0,
    Double = 1,
    Single = 2,
    Int8 = 3,
    UInt8 = 4,
    Int16 = 5,
    UInt16 = 6,
    Int32 = 7,
    UInt32 = 8,
    Int64 = 9,
    UInt64 = 10,
    String = 11,
    CDouble = 12,
    CSingle = 13,
    Bool = 14,
    Structure = 101,
    Vector = 102,
    Dictionary = 103,
    MultiDimArray = 104,
    List = 105,
    Pod = 106,
    PodArray = 107,
    PodMultiDimArray = 108,
    NamedArrayArray = 109,
    NamedArrayMultiDimArray = 110,
}

impl DataType {
    /// Every compound type, in code order.
    pub const COMPOUND: [DataType; 10] = [
        DataType::Structure,
        DataType::Vector,
        DataType::Dictionary,
        DataType::MultiDimArray,
        DataType::List,
        DataType::Pod,
        DataType::PodArray,
        DataType::PodMultiDimArray,
        DataType::NamedArrayArray,
        DataType::NamedArrayMultiDimArray,
    ];

    pub fn from_u16(code: u16) -> Result<Self> {
        let ty = match code {
            0 => DataType::Void,
            1 => DataType::Double,
            2 => DataType::Single,
            3 => DataType::Int8,
            4 => DataType::UInt8,
            5 => DataType::Int16,
            6 => DataType::UInt16,
            7 => DataType::Int32,
            8 => DataType::UInt32,
            9 => DataType::Int64,
            10 => DataType::UInt64,
            11 => DataType::String,
            12 => DataType::CDouble,
            13 => DataType::CSingle,
            14 => DataType::Bool,
            101 => DataType::Structure,
            102 => DataType::Vector,
            103 => DataType::Dictionary,
            104 => DataType::MultiDimArray,
            105 => DataType::List,
            106 => DataType::Pod,
            107 => DataType::PodArray,
            108 => DataType::PodMultiDimArray,
            109 => DataType::NamedArrayArray,
            110 => DataType::NamedArrayMultiDimArray,
            _ => return Err(Error::UnknownDataType(code)),
        };
        Ok(ty)
    }

    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Compound types carry a nested element list instead of a flat array.
    pub const fn is_compound(self) -> bool {
        self as u16 > 100
    }

    /// Smallest number of payload bytes one unit of `data_count` can occupy.
    pub(crate) const fn min_unit_width(self) -> usize {
        match self {
            DataType::Void => 0,
            DataType::Int8 | DataType::UInt8 | DataType::Bool | DataType::String => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Single | DataType::Int32 | DataType::UInt32 => 4,
            DataType::Double | DataType::Int64 | DataType::UInt64 | DataType::CSingle => 8,
            DataType::CDouble => 16,
            _ => crate::plan::MIN_ELEMENT_SIZE,
        }
    }

    /// The type name used by the RPC layer's service definitions.
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Void => "void",
            DataType::Double => "double",
            DataType::Single => "single",
            DataType::Int8 => "int8",
            DataType::UInt8 => "uint8",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::String => "string",
            DataType::CDouble => "cdouble",
            DataType::CSingle => "csingle",
            DataType::Bool => "bool",
            DataType::Structure => "structure",
            DataType::Vector => "vector",
            DataType::Dictionary => "dictionary",
            DataType::MultiDimArray => "multidimarray",
            DataType::List => "list",
            DataType::Pod => "pod",
            DataType::PodArray => "pod_array",
            DataType::PodMultiDimArray => "pod_multidimarray",
            DataType::NamedArrayArray => "namedarray_array",
            DataType::NamedArrayMultiDimArray => "namedarray_multidimarray",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
//  ENTRY TYPES
// ============================================================================

macro_rules! entry_types {
    ($( $(#[$meta:meta])* $variant:ident = $code:literal, )*) => {
        /// Operation kind of an entry.
        ///
        /// The codec carries this as a raw u16 and never interprets it. Codes it
        /// does not name survive a round trip through `Other`. Equality and
        /// hashing go by code, so `Other(1111) == PropertyGetReq`.
        #[derive(Debug, Clone, Copy, Default)]
        pub enum MessageEntryType {
            #[default]
            Null,
            $( $(#[$meta])* $variant, )*
            Other(u16),
        }

        impl MessageEntryType {
            pub const fn code(self) -> u16 {
                match self {
                    MessageEntryType::Null => 0,
                    $( MessageEntryType::$variant => $code, )*
                    MessageEntryType::Other(code) => code,
                }
            }

            pub const fn from_u16(code: u16) -> Self {
                match code {
                    0 => MessageEntryType::Null,
                    $( $code => MessageEntryType::$variant, )*
                    other => MessageEntryType::Other(other),
                }
            }
        }

        impl PartialEq for MessageEntryType {
            fn eq(&self, other: &Self) -> bool {
                self.code() == other.code()
            }
        }

        impl Eq for MessageEntryType {}

        impl std::hash::Hash for MessageEntryType {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.code().hash(state);
            }
        }
    };
}

entry_types! {
    GetServiceDesc = 101,
    GetServiceDescRet = 102,
    ObjectTypeName = 103,
    ObjectTypeNameRet = 104,
    ServiceClosed = 105,
    ServiceClosedRet = 106,
    ConnectClient = 107,
    ConnectClientRet = 108,
    DisconnectClient = 109,
    DisconnectClientRet = 110,
    ConnectionTest = 111,
    ConnectionTestRet = 112,
    ClientKeepAliveReq = 119,
    ClientKeepAliveRet = 120,
    ServicePathReleasedReq = 123,
    ServicePathReleasedRet = 124,
    PropertyGetReq = 1111,
    PropertyGetRes = 1112,
    PropertySetReq = 1113,
    PropertySetRes = 1114,
    FunctionCallReq = 1121,
    FunctionCallRes = 1122,
    GeneratorNextReq = 1123,
    GeneratorNextRes = 1124,
    EventReq = 1131,
    EventRes = 1132,
    PipePacket = 1141,
    PipePacketRet = 1142,
    PipeConnectReq = 1143,
    PipeConnectRet = 1144,
    PipeDisconnectReq = 1145,
    PipeDisconnectRet = 1146,
    PipeClosed = 1147,
    PipeClosedRet = 1148,
    CallbackCallReq = 1151,
    CallbackCallRet = 1152,
    WirePacket = 1161,
    WirePacketRet = 1162,
    WireConnectReq = 1163,
    WireConnectRet = 1164,
    WireDisconnectReq = 1165,
    WireDisconnectRet = 1166,
    WireClosed = 1167,
    WireClosedRet = 1168,
    MemoryRead = 1171,
    MemoryReadRet = 1172,
    MemoryWrite = 1173,
    MemoryWriteRet = 1174,
    MemoryGetParam = 1175,
    MemoryGetParamRet = 1176,
}

// ============================================================================
//  NODE IDS
// ============================================================================

/// 128-bit node identifier, sent as the 16 raw bytes of a UUID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub const fn nil() -> Self {
        NodeId(Uuid::nil())
    }

    pub fn random() -> Self {
        NodeId(Uuid::new_v4())
    }

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        NodeId(Uuid::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.braced())
    }
}

// ============================================================================
//  COMPLEX NUMBERS
// ============================================================================

/// Double precision complex value, real part first on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CDouble {
    pub real: f64,
    pub imag: f64,
}

/// Single precision complex value, real part first on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CSingle {
    pub real: f32,
    pub imag: f32,
}

impl CDouble {
    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }
}

impl CSingle {
    pub const fn new(real: f32, imag: f32) -> Self {
        Self { real, imag }
    }
}

impl Primitive for CDouble {
    const SIZE: usize = 16;

    fn write_le(self, dst: &mut [u8]) {
        self.real.write_le(&mut dst[..8]);
        self.imag.write_le(&mut dst[8..16]);
    }

    fn read_le(src: &[u8]) -> Self {
        Self { real: f64::read_le(&src[..8]), imag: f64::read_le(&src[8..16]) }
    }
}

impl Primitive for CSingle {
    const SIZE: usize = 8;

    fn write_le(self, dst: &mut [u8]) {
        self.real.write_le(&mut dst[..4]);
        self.imag.write_le(&mut dst[4..8]);
    }

    fn read_le(src: &[u8]) -> Self {
        Self { real: f32::read_le(&src[..4]), imag: f32::read_le(&src[4..8]) }
    }
}
