//! Transaction payloads.

use crate::bcs::{self, BcsError, Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::transaction::argument::TransactionArgument;
use crate::types::{AccountAddress, Identifier, ModuleId, TypeTag};

/// The payload of a transaction, specifying what action to take.
///
/// Wire tags: Script=0, ModuleBundle=1, EntryFunction=2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Execute a script with bytecode.
    Script(Script),
    /// Publish modules. Deprecated on chain; kept so old transactions decode.
    ModuleBundle(ModuleBundle),
    /// Call an entry function on a module.
    EntryFunction(EntryFunction),
}

impl Serializable for TransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            TransactionPayload::Script(script) => {
                serializer.serialize_variant_index(0);
                script.serialize(serializer)
            }
            TransactionPayload::ModuleBundle(bundle) => {
                serializer.serialize_variant_index(1);
                bundle.serialize(serializer)
            }
            TransactionPayload::EntryFunction(entry_function) => {
                serializer.serialize_variant_index(2);
                entry_function.serialize(serializer)
            }
        }
    }
}

impl Deserializable for TransactionPayload {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.read_variant_index()? {
            0 => Ok(TransactionPayload::Script(Script::deserialize(deserializer)?)),
            1 => Ok(TransactionPayload::ModuleBundle(ModuleBundle::deserialize(
                deserializer,
            )?)),
            2 => Ok(TransactionPayload::EntryFunction(EntryFunction::deserialize(
                deserializer,
            )?)),
            index => Err(BcsError::InvalidVariant {
                type_name: "TransactionPayload",
                index,
            }
            .into()),
        }
    }
}

/// A script payload with inline bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    /// The Move bytecode to execute.
    pub code: Vec<u8>,
    /// Type arguments for the script.
    pub type_args: Vec<TypeTag>,
    /// Arguments to the script.
    pub args: Vec<TransactionArgument>,
}

impl Script {
    /// Creates a new script payload.
    pub fn new(code: Vec<u8>, type_args: Vec<TypeTag>, args: Vec<TransactionArgument>) -> Self {
        Self {
            code,
            type_args,
            args,
        }
    }
}

impl Serializable for Script {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_bytes(&self.code)?;
        serializer.serialize_seq(&self.type_args)?;
        serializer.serialize_seq(&self.args)
    }
}

impl Deserializable for Script {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            code: deserializer.read_bytes()?,
            type_args: deserializer.read_seq()?,
            args: deserializer.read_seq()?,
        })
    }
}

/// A single module's bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    /// Compiled module bytes.
    pub code: Vec<u8>,
}

impl Serializable for Module {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.code)?)
    }
}

impl Deserializable for Module {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            code: deserializer.read_bytes()?,
        })
    }
}

/// A bundle of modules to publish.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleBundle {
    /// The modules, in publishing order.
    pub modules: Vec<Module>,
}

impl Serializable for ModuleBundle {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_seq(&self.modules)
    }
}

impl Deserializable for ModuleBundle {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            modules: deserializer.read_seq()?,
        })
    }
}

/// An entry function call payload.
///
/// Each argument is held as its own BCS encoding and written as a
/// length-prefixed byte string, so arguments are encoded exactly once.
///
/// # Example
///
/// ```rust
/// use aptos_txn_core::transaction::EntryFunction;
/// use aptos_txn_core::types::{AccountAddress, TypeTag};
///
/// let recipient = AccountAddress::from_hex("0x123").unwrap();
/// let transfer = EntryFunction::builder("0x1::coin::transfer")
///     .unwrap()
///     .type_arg(TypeTag::aptos_coin())
///     .arg(&recipient)
///     .unwrap()
///     .arg(&1000u64)
///     .unwrap()
///     .build();
/// assert_eq!(transfer.function.as_str(), "transfer");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunction {
    /// The module containing the function.
    pub module: ModuleId,
    /// The function name.
    pub function: Identifier,
    /// Type arguments for generic functions.
    pub type_args: Vec<TypeTag>,
    /// BCS-encoded arguments.
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Creates a new entry function payload from pre-encoded arguments.
    pub fn new(
        module: ModuleId,
        function: Identifier,
        type_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            module,
            function,
            type_args,
            args,
        }
    }

    /// Starts a builder for a function id such as `0x1::coin::transfer`.
    pub fn builder(function_id: &str) -> AptosResult<EntryFunctionBuilder> {
        let (module, function) = function_id.rsplit_once("::").ok_or_else(|| {
            AptosError::transaction(format!(
                "function id must be address::module::function, got '{function_id}'"
            ))
        })?;
        Ok(EntryFunctionBuilder {
            module: module.parse()?,
            function: Identifier::new(function)?,
            type_args: Vec::new(),
            args: Vec::new(),
        })
    }

    /// `0x1::coin::transfer<coin_type>(recipient, amount)`.
    pub fn coin_transfer(
        coin_type: TypeTag,
        recipient: AccountAddress,
        amount: u64,
    ) -> AptosResult<Self> {
        Ok(Self::builder("0x1::coin::transfer")?
            .type_arg(coin_type)
            .arg(&recipient)?
            .arg(&amount)?
            .build())
    }
}

impl Serializable for EntryFunction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.module.serialize(serializer)?;
        self.function.serialize(serializer)?;
        serializer.serialize_seq(&self.type_args)?;
        serializer.serialize_seq_with(&self.args, |s, arg| Ok(s.serialize_bytes(arg)?))
    }
}

impl Deserializable for EntryFunction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            module: ModuleId::deserialize(deserializer)?,
            function: Identifier::deserialize(deserializer)?,
            type_args: deserializer.read_seq()?,
            args: deserializer.read_seq_with(|d| Ok(d.read_bytes()?))?,
        })
    }
}

/// Incrementally assembles an [`EntryFunction`].
#[derive(Clone, Debug)]
pub struct EntryFunctionBuilder {
    module: ModuleId,
    function: Identifier,
    type_args: Vec<TypeTag>,
    args: Vec<Vec<u8>>,
}

impl EntryFunctionBuilder {
    /// Appends a type argument.
    pub fn type_arg(mut self, type_arg: TypeTag) -> Self {
        self.type_args.push(type_arg);
        self
    }

    /// Appends a type argument parsed from a string such as `vector<u8>`.
    pub fn type_arg_str(self, type_arg: &str) -> AptosResult<Self> {
        Ok(self.type_arg(type_arg.parse()?))
    }

    /// Encodes and appends an argument.
    pub fn arg<T: Serializable + ?Sized>(mut self, value: &T) -> AptosResult<Self> {
        self.args.push(bcs::to_bytes(value)?);
        Ok(self)
    }

    /// Appends an argument that is already BCS-encoded.
    pub fn raw_arg(mut self, encoded: Vec<u8>) -> Self {
        self.args.push(encoded);
        self
    }

    /// Finishes the entry function.
    pub fn build(self) -> EntryFunction {
        EntryFunction {
            module: self.module,
            function: self.function,
            type_args: self.type_args,
            args: self.args,
        }
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry_function: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(entry_function)
    }
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        TransactionPayload::Script(script)
    }
}

impl From<ModuleBundle> for TransactionPayload {
    fn from(bundle: ModuleBundle) -> Self {
        TransactionPayload::ModuleBundle(bundle)
    }
}
