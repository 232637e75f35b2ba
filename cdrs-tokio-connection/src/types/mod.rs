mod type_registry;
mod udt;

pub use crate::types::type_registry::{TypeRegistry, UdtRegistration};
pub use crate::types::udt::{UdtDescriptor, UdtField};
