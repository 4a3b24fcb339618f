//! Compiler-emitted storage layout: slots, type descriptors and the
//! per-snapshot dictionary that links them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Handle naming a [`TypeDescriptor`] inside one [`TypeDictionary`].
///
/// A `TypeRef` is only meaningful relative to the dictionary it came from.
/// Compilers embed AST ids in these names (`t_struct(S)36_storage`), so the
/// same Solidity type gets different refs in different compilations.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    /// Wrap a compiler type identifier such as `t_uint256`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for TypeRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How a type's data is laid out in storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Packed directly into consecutive slots.
    Inplace,
    /// Keyed by `keccak256(key . slot)`.
    Mapping,
    /// Length in the slot, elements at `keccak256(slot)`.
    DynamicArray,
    /// `bytes` / `string`: short values inline, long values hashed.
    Bytes,
}

impl Encoding {
    /// Name as the compiler spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inplace => "inplace",
            Self::Mapping => "mapping",
            Self::DynamicArray => "dynamic_array",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One state variable (or struct member) and where it lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSlot {
    /// AST id of the declaration. Metadata only; never compared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast_id: Option<i64>,
    /// Full name of the contract that declares this variable.
    #[serde(rename = "contract")]
    pub declaring_contract: String,
    pub label: String,
    /// Slot index as a decimal string; may be a full 256-bit value.
    pub slot: String,
    /// Byte offset inside the slot.
    pub offset: u32,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

impl StorageSlot {
    pub fn new(
        declaring_contract: impl Into<String>,
        label: impl Into<String>,
        slot: impl Into<String>,
        offset: u32,
        type_ref: impl Into<TypeRef>,
    ) -> Self {
        Self {
            ast_id: None,
            declaring_contract: declaring_contract.into(),
            label: label.into(),
            slot: slot.into(),
            offset,
            type_ref: type_ref.into(),
        }
    }
}

/// Compiler metadata for one Solidity type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub label: String,
    pub encoding: Encoding,
    /// Size in bytes as a decimal string.
    pub number_of_bytes: String,
    /// Struct fields, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<StorageSlot>>,
    /// Mapping value type, or dynamic array element type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TypeRef>,
    /// Static array element type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<TypeRef>,
    /// Mapping key type. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<TypeRef>,
}

impl TypeDescriptor {
    /// A plain value type such as `uint256` or `address`.
    pub fn inplace(label: impl Into<String>, number_of_bytes: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            encoding: Encoding::Inplace,
            number_of_bytes: number_of_bytes.into(),
            members: None,
            value: None,
            base: None,
            key: None,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_members(mut self, members: Vec<StorageSlot>) -> Self {
        self.members = Some(members);
        self
    }

    pub fn with_value(mut self, value: impl Into<TypeRef>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<TypeRef>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<TypeRef>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// The type table of one compilation, keyed by [`TypeRef`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDictionary {
    entries: BTreeMap<TypeRef, TypeDescriptor>,
}

impl TypeDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a descriptor by handle.
    pub fn resolve(&self, type_ref: &TypeRef) -> Option<&TypeDescriptor> {
        self.entries.get(type_ref)
    }

    /// Add or replace a descriptor.
    pub fn insert(&mut self, type_ref: impl Into<TypeRef>, descriptor: TypeDescriptor) {
        self.entries.insert(type_ref.into(), descriptor);
    }

    pub fn contains(&self, type_ref: &TypeRef) -> bool {
        self.entries.contains_key(type_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeRef, &TypeDescriptor)> {
        self.entries.iter()
    }
}

impl FromIterator<(TypeRef, TypeDescriptor)> for TypeDictionary {
    fn from_iter<I: IntoIterator<Item = (TypeRef, TypeDescriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The `storageLayout` object solc emits for one contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLayout {
    #[serde(rename = "storage")]
    pub slots: Vec<StorageSlot>,
    /// solc writes `null` here for contracts without state variables.
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: TypeDictionary,
}

impl StorageLayout {
    /// Layout from its ordered slots and the types they reference.
    pub fn new(slots: Vec<StorageSlot>, types: TypeDictionary) -> Self {
        Self { slots, types }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The storage layout of one named contract in one source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractLayout {
    pub name: String,
    /// Source path as the compiler saw it.
    pub source: String,
    #[serde(rename = "entries")]
    pub layout: StorageLayout,
}

impl ContractLayout {
    /// Layout of contract `name` declared in `source`.
    pub fn new(source: impl Into<String>, name: impl Into<String>, layout: StorageLayout) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            layout,
        }
    }

    /// `source:name`, the identity key of a contract within a snapshot.
    pub fn full_name(&self) -> String {
        full_name(&self.source, &self.name)
    }
}

/// Join a source path and a contract name into a full name.
pub fn full_name(source: &str, name: &str) -> String {
    format!("{source}:{name}")
}
