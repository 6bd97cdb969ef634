//! Oblibeny type expressions and the declared sizes behind memory estimation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes reserved for one local binding slot on a deploy-time stack frame.
pub const SLOT_BYTES: u64 = 8;

/// A type expression as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    String,
    Void,
    /// Fixed-size array: `(array <elem> <size>)`
    Array { elem_type: Box<Type>, size: usize },
    /// Capability handle for a gated peripheral.
    Capability { resource: ResourceType },
    /// Function type: `(-> <params>... <return>)`
    Function { params: Vec<Type>, return_type: Box<Type> },
}

impl Type {
    /// Declared stack footprint of a value of this type, in bytes.
    ///
    /// Deploy-time Oblibeny has no heap: arrays and strings live inline in
    /// the frame, capability and function values are single slots.
    pub fn byte_size(&self) -> u64 {
        match self {
            Type::Int32 | Type::Uint32 | Type::Float32 => 4,
            Type::Int64 | Type::Uint64 | Type::Float64 => 8,
            Type::Bool => 1,
            Type::String => SLOT_BYTES,
            Type::Void => 0,
            Type::Array { elem_type, size } => {
                elem_type.byte_size().saturating_mul(*size as u64)
            }
            Type::Capability { .. } => SLOT_BYTES,
            Type::Function { .. } => SLOT_BYTES,
        }
    }
}

/// Peripherals a capability can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    UartTx,
    UartRx,
    Gpio,
    I2c,
    Spi,
    SensorRead,
    NetworkSend,
    NetworkRecv,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::UartTx => "uart-tx",
            ResourceType::UartRx => "uart-rx",
            ResourceType::Gpio => "gpio",
            ResourceType::I2c => "i2c",
            ResourceType::Spi => "spi",
            ResourceType::SensorRead => "sensor-read",
            ResourceType::NetworkSend => "network-send",
            ResourceType::NetworkRecv => "network-recv",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int32 => write!(f, "int32"),
            Type::Int64 => write!(f, "int64"),
            Type::Uint32 => write!(f, "uint32"),
            Type::Uint64 => write!(f, "uint64"),
            Type::Float32 => write!(f, "float32"),
            Type::Float64 => write!(f, "float64"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Array { elem_type, size } => write!(f, "(array {} {})", elem_type, size),
            Type::Capability { resource } => write!(f, "(capability {})", resource),
            Type::Function { params, return_type } => {
                write!(f, "(->")?;
                for p in params {
                    write!(f, " {}", p)?;
                }
                write!(f, " {})", return_type)
            }
        }
    }
}

/// A named function parameter with an optional type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<Type>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_annotation: Option<Type>) -> Self {
        Self { name: name.into(), type_annotation }
    }

    /// Declared frame footprint of this parameter.
    pub fn byte_size(&self) -> u64 {
        self.type_annotation
            .as_ref()
            .map(Type::byte_size)
            .unwrap_or(SLOT_BYTES)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_annotation {
            Some(ty) => write!(f, "({} {})", self.name, ty),
            None => write!(f, "{}", self.name),
        }
    }
}
