//! Term model, type registry and value conversion for remote query results
//!
//! # Key Design Principles
//!
//! 1. **Lexical forms are kept verbatim** - a [`Literal`] stores exactly what
//!    came off the wire; interpretation happens on access through a
//!    [`Converter`].
//!
//! 2. **Explicit datatypes** - literals always carry a datatype; plain and
//!    language-tagged strings use `xsd:string`.
//!
//! 3. **No global registry** - a [`TypeRegistry`] is built once and passed by
//!    reference to every converter.
//!
//! # Example
//!
//! ```
//! use fluree_remote_term::{Converter, NativeType, NativeValue, Node, TypeRegistry};
//!
//! let registry = TypeRegistry::with_defaults().unwrap();
//! let conv = Converter::new(&registry);
//!
//! let cell = Node::typed("42", "http://www.w3.org/2001/XMLSchema#int");
//! assert_eq!(conv.to_native(&cell, NativeType::Long).unwrap(), NativeValue::Long(42));
//! ```

mod convert;
pub mod error;
mod native;
mod node;
mod registry;
pub mod temporal;
mod wire;

pub use convert::Converter;
pub use error::{RegistryError, Result, TypeConversionError};
pub use native::{NativeType, NativeValue};
pub use node::{BlankId, Iri, Literal, Node};
pub use registry::{RegistryBuilder, TypeMapping, TypeRegistry};
pub use wire::WireType;
