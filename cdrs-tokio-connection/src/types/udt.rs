use derive_more::Constructor;

/// Single field of a user-defined type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Constructor)]
pub struct UdtField {
    pub name: String,
    pub cql_type: String,
}

/// Describes how a user-defined type maps onto a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UdtDescriptor {
    rust_type: String,
    fields: Vec<UdtField>,
}

impl UdtDescriptor {
    pub fn new(rust_type: impl Into<String>) -> Self {
        UdtDescriptor {
            rust_type: rust_type.into(),
            fields: vec![],
        }
    }

    /// Creates a descriptor named after given Rust type.
    pub fn for_type<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Appends a field. Field order matches the order of declaration in CQL.
    pub fn with_field(mut self, name: impl Into<String>, cql_type: impl Into<String>) -> Self {
        self.fields.push(UdtField::new(name.into(), cql_type.into()));
        self
    }

    #[inline]
    pub fn rust_type(&self) -> &str {
        &self.rust_type
    }

    #[inline]
    pub fn fields(&self) -> &[UdtField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&UdtField> {
        self.fields.iter().find(|field| field.name == name)
    }
}
