//! The host type-system interface consumed by schema extraction.

use crate::symbol::{DeclId, Declaration, SymbolTable};
use crate::types::{TypeId, TypeKind, TypeTable};
use typegen_core::intern::StringInterner;

/// Read-only access to bound declarations and types.
///
/// Every method is synchronous and side-effect free; implementations that
/// are also `Sync` can be walked from several threads at once.
pub trait TypeHost {
    fn type_kind(&self, id: TypeId) -> &TypeKind;

    fn declaration(&self, id: DeclId) -> &Declaration;

    /// All declarations, in binding order.
    fn declarations(&self) -> &[Declaration];

    /// Resolve a (possibly qualified) type name to its declaration.
    fn resolve_name(&self, name: &str) -> Option<DeclId>;
}

/// The output of binding: the type arena plus the global declaration table.
#[derive(Debug)]
pub struct BoundProgram {
    pub(crate) interner: StringInterner,
    pub(crate) types: TypeTable,
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) globals: SymbolTable,
}

impl BoundProgram {
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Look up a declaration by its unqualified name.
    pub fn declaration_named(&self, name: &str) -> Option<&Declaration> {
        self.resolve_name(name).map(|id| self.declaration(id))
    }
}

impl TypeHost for BoundProgram {
    fn type_kind(&self, id: TypeId) -> &TypeKind {
        self.types.get(id)
    }

    fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.index()]
    }

    fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    fn resolve_name(&self, name: &str) -> Option<DeclId> {
        let lookup = |text: &str| self.interner.get(text).and_then(|key| self.globals.get(&key));
        // `ns.Name` resolves through the last segment; namespaces are flat.
        lookup(name).or_else(|| {
            name.rsplit_once('.')
                .and_then(|(_, last)| lookup(last))
        })
    }
}
