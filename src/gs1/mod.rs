//! GS1-128: Application Identifier fields carried in Code 128.
//!
//! A GS1-128 symbol starts with FNC1 right after the start symbol. Fixed
//! length fields run together; a variable length field is closed by another
//! FNC1 when a further field follows.

pub mod builder;
pub mod registry;
pub mod split;

pub use builder::{AiField, Gs1Builder, build_gs1, validate_field};
pub use registry::{AiRegistry, AiSpec, LengthClass};
pub use split::{get_ai_data, parse_elements, parse_validated};
