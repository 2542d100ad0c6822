//! Move type tags and the names they are built from.
//!
//! Type tags appear in entry-function payloads as generic type arguments.
//! They parse from and print to the usual Move syntax:
//!
//! ```rust
//! use aptos_txn_core::types::TypeTag;
//!
//! let tag: TypeTag = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>".parse().unwrap();
//! assert_eq!(tag.to_string(), "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>");
//!
//! let tag: TypeTag = "vector<vector<u8>>".parse().unwrap();
//! assert_eq!(tag, TypeTag::vector(TypeTag::vector(TypeTag::U8)));
//! ```

use crate::bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use std::fmt;
use std::str::FromStr;

/// Longest type tag string the parser accepts.
const MAX_TYPE_TAG_LENGTH: usize = 1024;

/// Longest identifier accepted.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Deepest nesting of type arguments the parser accepts.
const MAX_TYPE_NESTING_DEPTH: usize = 8;

/// A Move identifier: module, struct or function name.
///
/// Starts with a letter or underscore; the rest is ASCII alphanumeric or
/// underscore.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Creates an identifier, validating its characters.
    pub fn new(s: impl Into<String>) -> AptosResult<Self> {
        let s = s.into();
        if s.len() > MAX_IDENTIFIER_LENGTH {
            return Err(AptosError::type_tag(format!(
                "identifier longer than {MAX_IDENTIFIER_LENGTH} bytes"
            )));
        }
        let mut chars = s.chars();
        match chars.next() {
            None => return Err(AptosError::type_tag("identifier cannot be empty")),
            Some(first) if !first.is_ascii_alphabetic() && first != '_' => {
                return Err(AptosError::type_tag(format!(
                    "identifier must start with a letter or underscore: {s}"
                )));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AptosError::type_tag(format!(
                "identifier contains invalid characters: {s}"
            )));
        }
        Ok(Self(s))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serializable for Identifier {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_str(&self.0)?)
    }
}

impl Deserializable for Identifier {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::new(deserializer.read_str()?)
    }
}

/// A published module: `address::name`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId {
    /// The address where the module is published.
    pub address: AccountAddress,
    /// The name of the module.
    pub name: Identifier,
}

impl ModuleId {
    /// Creates a new module ID.
    pub fn new(address: AccountAddress, name: Identifier) -> Self {
        Self { address, name }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address.to_short_string(), self.name)
    }
}

impl FromStr for ModuleId {
    type Err = AptosError;

    /// Parses `0x1::coin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, name) = s
            .split_once("::")
            .ok_or_else(|| AptosError::type_tag(format!("invalid module id: {s}")))?;
        Ok(Self {
            address: AccountAddress::from_hex(address)?,
            name: Identifier::new(name)?,
        })
    }
}

impl Serializable for ModuleId {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.address.serialize(serializer)?;
        self.name.serialize(serializer)
    }
}

impl Deserializable for ModuleId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            address: AccountAddress::deserialize(deserializer)?,
            name: Identifier::deserialize(deserializer)?,
        })
    }
}

/// A struct type: `address::module::Name<T1, T2>`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructTag {
    /// The address where the module is published.
    pub address: AccountAddress,
    /// The module name.
    pub module: Identifier,
    /// The struct name.
    pub name: Identifier,
    /// Type arguments (for generic structs).
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    /// Creates a new struct tag.
    pub fn new(
        address: AccountAddress,
        module: Identifier,
        name: Identifier,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module,
            name,
            type_args,
        }
    }

    /// The `0x1::aptos_coin::AptosCoin` struct tag.
    pub fn aptos_coin() -> Self {
        Self {
            address: AccountAddress::ONE,
            module: Identifier("aptos_coin".to_string()),
            name: Identifier("AptosCoin".to_string()),
            type_args: vec![],
        }
    }

    /// Returns the module this struct is declared in.
    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.address, self.module.clone())
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.address.to_short_string(),
            self.module,
            self.name
        )?;
        if let Some((first, rest)) = self.type_args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for StructTag {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TypeTag::from_str(s)? {
            TypeTag::Struct(tag) => Ok(*tag),
            other => Err(AptosError::type_tag(format!("{other} is not a struct type"))),
        }
    }
}

impl Serializable for StructTag {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.address.serialize(serializer)?;
        self.module.serialize(serializer)?;
        self.name.serialize(serializer)?;
        serializer.serialize_seq(&self.type_args)
    }
}

impl Deserializable for StructTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            address: AccountAddress::deserialize(deserializer)?,
            module: Identifier::deserialize(deserializer)?,
            name: Identifier::deserialize(deserializer)?,
            type_args: deserializer.read_seq()?,
        })
    }
}

/// A Move type.
///
/// Wire tags: Bool=0, U8=1, U64=2, U128=3, Address=4, Signer=5, Vector=6,
/// Struct=7, U16=8, U32=9, U256=10.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `address`
    Address,
    /// `signer`
    Signer,
    /// `vector<T>`
    Vector(Box<TypeTag>),
    /// A struct type
    Struct(Box<StructTag>),
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u256`
    U256,
}

impl TypeTag {
    /// Creates a vector type tag with the given element type.
    pub fn vector(element: TypeTag) -> Self {
        Self::Vector(Box::new(element))
    }

    /// Creates a struct type tag.
    pub fn struct_tag(tag: StructTag) -> Self {
        Self::Struct(Box::new(tag))
    }

    /// Returns the `0x1::aptos_coin::AptosCoin` type tag.
    pub fn aptos_coin() -> Self {
        Self::struct_tag(StructTag::aptos_coin())
    }

    fn variant_index(&self) -> u32 {
        match self {
            TypeTag::Bool => 0,
            TypeTag::U8 => 1,
            TypeTag::U64 => 2,
            TypeTag::U128 => 3,
            TypeTag::Address => 4,
            TypeTag::Signer => 5,
            TypeTag::Vector(_) => 6,
            TypeTag::Struct(_) => 7,
            TypeTag::U16 => 8,
            TypeTag::U32 => 9,
            TypeTag::U256 => 10,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_TYPE_TAG_LENGTH {
            return Err(AptosError::type_tag(format!(
                "type tag longer than {MAX_TYPE_TAG_LENGTH} bytes"
            )));
        }
        let mut parser = TypeTagParser::new(s);
        let tag = parser.parse_type(0)?;
        parser.skip_whitespace();
        if !parser.rest().is_empty() {
            return Err(AptosError::type_tag(format!(
                "unexpected trailing input '{}' in {s}",
                parser.rest()
            )));
        }
        Ok(tag)
    }
}

impl Serializable for TypeTag {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_variant_index(self.variant_index());
        match self {
            TypeTag::Vector(inner) => inner.serialize(serializer),
            TypeTag::Struct(tag) => tag.serialize(serializer),
            _ => Ok(()),
        }
    }
}

impl Deserializable for TypeTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        let index = deserializer.read_variant_index()?;
        let tag = match index {
            0 => TypeTag::Bool,
            1 => TypeTag::U8,
            2 => TypeTag::U64,
            3 => TypeTag::U128,
            4 => TypeTag::Address,
            5 => TypeTag::Signer,
            6 => {
                deserializer.enter_container()?;
                let inner = TypeTag::deserialize(deserializer);
                deserializer.leave_container();
                TypeTag::Vector(Box::new(inner?))
            }
            7 => {
                deserializer.enter_container()?;
                let tag = StructTag::deserialize(deserializer);
                deserializer.leave_container();
                TypeTag::Struct(Box::new(tag?))
            }
            8 => TypeTag::U16,
            9 => TypeTag::U32,
            10 => TypeTag::U256,
            _ => {
                return Err(BcsError::InvalidVariant {
                    type_name: "TypeTag",
                    index,
                }
                .into())
            }
        };
        Ok(tag)
    }
}

macro_rules! serde_via_string {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_via_string!(Identifier);
serde_via_string!(ModuleId);
serde_via_string!(StructTag);
serde_via_string!(TypeTag);

/// Recursive-descent parser over Move type syntax.
struct TypeTagParser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> TypeTagParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.position += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> AptosResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(AptosError::type_tag(format!(
                "expected '{token}' at offset {} in {}",
                self.position, self.input
            )))
        }
    }

    /// Reads a run of `[A-Za-z0-9_]`.
    fn word(&mut self) -> AptosResult<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(AptosError::type_tag(format!(
                "expected a name at offset {} in {}",
                self.position, self.input
            )));
        }
        self.position += len;
        Ok(&rest[..len])
    }

    fn parse_type(&mut self, depth: usize) -> AptosResult<TypeTag> {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(AptosError::type_tag(format!(
                "type tag nested deeper than {MAX_TYPE_NESTING_DEPTH} levels"
            )));
        }

        let word = self.word()?;
        if self.eat("::") {
            return self.parse_struct(word, depth);
        }

        Ok(match word {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            "vector" => {
                self.expect("<")?;
                let element = self.parse_type(depth + 1)?;
                self.expect(">")?;
                TypeTag::vector(element)
            }
            other => {
                return Err(AptosError::type_tag(format!("unknown type '{other}'")));
            }
        })
    }

    fn parse_struct(&mut self, address: &str, depth: usize) -> AptosResult<TypeTag> {
        let address = AccountAddress::from_hex(address)?;
        let module = Identifier::new(self.word()?)?;
        self.expect("::")?;
        let name = Identifier::new(self.word()?)?;

        let mut type_args = Vec::new();
        if self.eat("<") {
            loop {
                type_args.push(self.parse_type(depth + 1)?);
                if !self.eat(",") {
                    break;
                }
            }
            self.expect(">")?;
        }

        Ok(TypeTag::struct_tag(StructTag::new(
            address, module, name, type_args,
        )))
    }
}
