//! The two-scope symbol table.
//!
//! Jack has exactly two lexical levels: a persistent class scope (`static`
//! and `field` entries, alive for the whole class) and a subroutine scope
//! that is wiped and rebuilt at the start of every method/function/
//! constructor. Rather than a general scope stack, this is modeled directly
//! as a two-field struct — the shape is fixed by the language, not by
//! anything the table needs to be generic over.

use std::collections::HashMap;

use crate::error::{SymbolError, SymbolResult};
use crate::kind::Kind;

#[derive(Debug, Clone)]
struct Entry {
    ty: String,
    kind: Kind,
    index: usize,
}

/// One scope: a name -> entry map plus one dense index counter per `Kind`
/// that can live in this scope.
#[derive(Debug, Clone, Default)]
struct Scope {
    entries: HashMap<String, Entry>,
    counters: HashMap<Kind, usize>,
}

impl Scope {
    fn define(&mut self, name: &str, ty: &str, kind: Kind) -> SymbolResult<usize> {
        if self.entries.contains_key(name) {
            return Err(SymbolError::AlreadyDefined {
                name: name.to_string(),
            });
        }
        let index = *self.counters.get(&kind).unwrap_or(&0);
        self.entries.insert(
            name.to_string(),
            Entry {
                ty: ty.to_string(),
                kind,
                index,
            },
        );
        self.counters.insert(kind, index + 1);
        Ok(index)
    }

    fn count(&self, kind: Kind) -> usize {
        *self.counters.get(&kind).unwrap_or(&0)
    }

    fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.counters.clear();
    }
}

/// `(type, kind, index)` for a resolved name, the shape the parser needs in
/// order to emit a `push`/`pop` of the right segment and index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub ty: String,
    pub kind: Kind,
    pub index: usize,
}

/// The class-scope and subroutine-scope pair. Lookup tries the subroutine
/// scope first, then the class scope — inner shadows outer.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    class_scope: Scope,
    subroutine_scope: Scope,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a new entry of `kind` in whichever scope `kind` belongs to.
    /// Fails if `name` is already defined in that scope.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) -> SymbolResult<usize> {
        if kind.is_class_scoped() {
            self.class_scope.define(name, ty, kind)
        } else {
            self.subroutine_scope.define(name, ty, kind)
        }
    }

    /// The number of entries of `kind` defined so far, used to size VM
    /// frames (`function Class.sub <var count>`) and heap objects (`push
    /// constant <field count>`).
    pub fn count(&self, kind: Kind) -> usize {
        if kind.is_class_scoped() {
            self.class_scope.count(kind)
        } else {
            self.subroutine_scope.count(kind)
        }
    }

    /// Resolves `name`, trying the subroutine scope before the class scope.
    /// `None` means `name` is not a variable in scope — it must be a class
    /// name or subroutine name used in a different grammatical position.
    pub fn resolve(&self, name: &str) -> Option<ResolvedSymbol> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
            .map(|e| ResolvedSymbol {
                ty: e.ty.clone(),
                kind: e.kind,
                index: e.index,
            })
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.resolve(name).map(|e| e.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<String> {
        self.resolve(name).map(|e| e.ty)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.resolve(name).map(|e| e.index)
    }

    /// Clears every `Arg` and `Var` entry, readying the table for the next
    /// subroutine. The class scope is untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_per_kind() {
        let mut t = SymbolTable::new();
        t.define("x", "int", Kind::Field).unwrap();
        t.define("y", "int", Kind::Field).unwrap();
        t.define("count", "int", Kind::Static).unwrap();
        assert_eq!(t.index_of("x"), Some(0));
        assert_eq!(t.index_of("y"), Some(1));
        assert_eq!(t.index_of("count"), Some(0));
        assert_eq!(t.count(Kind::Field), 2);
        assert_eq!(t.count(Kind::Static), 1);
    }

    #[test]
    fn duplicate_definition_in_one_scope_fails() {
        let mut t = SymbolTable::new();
        t.define("x", "int", Kind::Var).unwrap();
        let err = t.define("x", "int", Kind::Var).unwrap_err();
        assert!(matches!(err, SymbolError::AlreadyDefined { .. }));
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut t = SymbolTable::new();
        t.define("x", "int", Kind::Field).unwrap();
        t.define("x", "boolean", Kind::Var).unwrap();
        let resolved = t.resolve("x").unwrap();
        assert_eq!(resolved.kind, Kind::Var);
        assert_eq!(resolved.ty, "boolean");
    }

    #[test]
    fn start_subroutine_clears_only_arg_and_var() {
        let mut t = SymbolTable::new();
        t.define("count", "int", Kind::Static).unwrap();
        t.define("a", "int", Kind::Arg).unwrap();
        t.define("b", "int", Kind::Var).unwrap();
        t.start_subroutine();
        assert_eq!(t.resolve("a"), None);
        assert_eq!(t.resolve("b"), None);
        assert!(t.resolve("count").is_some());
        assert_eq!(t.count(Kind::Arg), 0);
        assert_eq!(t.count(Kind::Var), 0);
    }

    #[test]
    fn unresolved_name_is_none() {
        let t = SymbolTable::new();
        assert_eq!(t.resolve("nope"), None);
    }

    #[test]
    fn same_name_distinct_kind_across_scopes_can_coexist_after_reset() {
        let mut t = SymbolTable::new();
        t.define("p", "Point", Kind::Arg).unwrap();
        t.start_subroutine();
        // A fresh subroutine can reuse the name with a different kind/type.
        t.define("p", "int", Kind::Var).unwrap();
        let resolved = t.resolve("p").unwrap();
        assert_eq!(resolved.kind, Kind::Var);
        assert_eq!(resolved.index, 0);
    }
}
