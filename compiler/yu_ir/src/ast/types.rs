//! Columnar type storage.
//!
//! A type is identified by its row index. Primitive types occupy the
//! first rows in a fixed order (see the `PRIM_*` constants) so that
//! inference and checking can refer to them without lookups.

use crate::{TokenKind, INVALID_INDEX};

pub const PRIM_VOID: u32 = 0;
pub const PRIM_BOOL: u32 = 1;
pub const PRIM_U8: u32 = 2;
pub const PRIM_I8: u32 = 3;
pub const PRIM_U16: u32 = 4;
pub const PRIM_I16: u32 = 5;
pub const PRIM_U32: u32 = 6;
pub const PRIM_I32: u32 = 7;
pub const PRIM_U64: u32 = 8;
pub const PRIM_I64: u32 = 9;
pub const PRIM_F32: u32 = 10;
pub const PRIM_F64: u32 = 11;
pub const PRIM_STRING: u32 = 12;
pub const PRIM_PTR: u32 = 13;

/// Names of the seeded primitive rows, indexed by `PRIM_*` constants.
const PRIMITIVE_NAMES: [&str; 14] = [
    "void", "boolean", "u8", "i8", "u16", "i16", "u32", "i32", "u64", "i64", "f32", "f64",
    "string", "Ptr",
];

/// Map a primitive type name token to its seeded row index.
pub fn primitive_type_index(kind: TokenKind) -> Option<u32> {
    let idx = match kind {
        TokenKind::Void => PRIM_VOID,
        TokenKind::Boolean => PRIM_BOOL,
        TokenKind::U8 => PRIM_U8,
        TokenKind::I8 => PRIM_I8,
        TokenKind::U16 => PRIM_U16,
        TokenKind::I16 => PRIM_I16,
        TokenKind::U32 => PRIM_U32,
        TokenKind::I32 => PRIM_I32,
        TokenKind::U64 => PRIM_U64,
        TokenKind::I64 => PRIM_I64,
        TokenKind::F32 => PRIM_F32,
        TokenKind::F64 => PRIM_F64,
        TokenKind::StringType => PRIM_STRING,
        TokenKind::Ptr => PRIM_PTR,
        _ => return None,
    };
    Some(idx)
}

/// Columnar type table.
///
/// Per-row columns: `names`, `generic_starts`, `generic_counts`,
/// `function_indices`. Function types additionally have a row in the
/// `function_*` family columns, addressed via `function_indices`.
#[derive(Debug, Default)]
pub struct TypeList<'src> {
    pub names: Vec<&'src str>,
    /// Start of this row's slice in `generic_params`.
    pub generic_starts: Vec<u32>,
    pub generic_counts: Vec<u32>,
    /// Flat slab of generic argument/parameter type indices.
    pub generic_params: Vec<u32>,
    /// Row in the function family, or `INVALID_INDEX` for non-function rows.
    pub function_indices: Vec<u32>,

    pub function_param_starts: Vec<u32>,
    pub function_param_counts: Vec<u32>,
    /// Flat slab of function parameter type indices.
    pub function_params: Vec<u32>,
    pub function_return_types: Vec<u32>,
}

impl<'src> TypeList<'src> {
    /// Create a table with the primitive rows pre-seeded.
    pub fn with_primitives() -> Self {
        let mut list = TypeList::default();
        for name in PRIMITIVE_NAMES {
            list.add_simple(name);
        }
        list
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append a type with no generic arguments.
    pub fn add_simple(&mut self, name: &'src str) -> u32 {
        let index = self.names.len() as u32;
        self.names.push(name);
        self.generic_starts.push(0);
        self.generic_counts.push(0);
        self.function_indices.push(INVALID_INDEX);
        index
    }

    /// Append a generic type application. `args` are type indices.
    pub fn add_generic(&mut self, name: &'src str, args: &[u32]) -> u32 {
        let index = self.names.len() as u32;
        self.names.push(name);
        self.generic_starts.push(self.generic_params.len() as u32);
        self.generic_counts.push(args.len() as u32);
        self.generic_params.extend_from_slice(args);
        self.function_indices.push(INVALID_INDEX);
        index
    }

    /// Append a function type. `params` are type indices.
    pub fn add_function(&mut self, params: &[u32], return_type: u32) -> u32 {
        let index = self.names.len() as u32;
        self.names.push("function");
        self.generic_starts.push(0);
        self.generic_counts.push(0);
        self.function_indices.push(self.function_param_starts.len() as u32);

        self.function_param_starts.push(self.function_params.len() as u32);
        self.function_param_counts.push(params.len() as u32);
        self.function_params.extend_from_slice(params);
        self.function_return_types.push(return_type);
        index
    }

    /// Generic argument slice of a type row.
    pub fn generic_args(&self, index: u32) -> &[u32] {
        let start = self.generic_starts[index as usize] as usize;
        let count = self.generic_counts[index as usize] as usize;
        &self.generic_params[start..start + count]
    }

    /// Return type of a function row, if the row is a function type.
    pub fn function_return_type(&self, index: u32) -> Option<u32> {
        let f = self.function_indices[index as usize];
        (f != INVALID_INDEX).then(|| self.function_return_types[f as usize])
    }
}
