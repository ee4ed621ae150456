//! Symbol table and scope management
//!
//! Scopes live in an arena owned by [`ScopeStore`] and are addressed by
//! [`ScopeId`]. The store keeps two views over the arena:
//!
//! - the *stack* of currently open scopes, innermost last, used for
//!   declaration and lexical resolution while the tree is walked;
//! - the *registry* of closed scopes in closing order, used for the listing
//!   and for lookups after the declaration pass has finished.
//!
//! Nothing is ever removed from the arena, so a closed scope and its symbols
//! stay queryable for the lifetime of the store.

use std::collections::HashMap;
use std::fmt;

use string_interner::{DefaultStringInterner, DefaultSymbol};

use crate::ast::ExpType;
use crate::common::{AnalysisError, AnalysisResult};

/// Index of a scope in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// Address of a symbol: owning scope plus its slot in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId {
    scope: ScopeId,
    index: usize,
}

impl SymbolId {
    pub fn scope(self) -> ScopeId {
        self.scope
    }
}

/// Kind of symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SymbolKind::Variable => "Variable",
            SymbolKind::Function => "Function",
        })
    }
}

/// A symbol in the symbol table
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: DefaultSymbol,
    pub kind: SymbolKind,
    /// Declared type; the return type for functions
    pub ty: ExpType,
    /// Memory location, monotonic within the owning scope
    pub location: u32,
    /// Declaration line followed by every reference, in the order recorded
    pub lines: Vec<u32>,
    pub scope: ScopeId,
}

/// A scope containing symbols
#[derive(Debug)]
pub struct Scope {
    name: String,
    level: u32,
    parent: Option<ScopeId>,
    symbols: Vec<Symbol>,
    by_name: HashMap<DefaultSymbol, usize>,
    next_location: u32,
}

impl Scope {
    fn new(name: String, level: u32, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            level,
            parent,
            symbols: Vec::new(),
            by_name: HashMap::new(),
            next_location: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nesting level, 0 for the global scope
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Symbols in declaration order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn lookup(&self, name: DefaultSymbol) -> Option<usize> {
        self.by_name.get(&name).copied()
    }
}

/// Result of [`ScopeStore::declare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declared {
    /// A fresh entry was created
    New(SymbolId),
    /// The name was already taken in the active scope; the entry is untouched
    Existing(SymbolId),
}

impl Declared {
    pub fn id(self) -> SymbolId {
        match self {
            Declared::New(id) | Declared::Existing(id) => id,
        }
    }
}

/// Arena of scopes with the open-scope stack and closed-scope registry
#[derive(Debug)]
pub struct ScopeStore {
    interner: DefaultStringInterner,
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
    registry: Vec<ScopeId>,
}

impl ScopeStore {
    pub fn new() -> Self {
        Self {
            interner: DefaultStringInterner::default(),
            scopes: Vec::new(),
            stack: Vec::new(),
            registry: Vec::new(),
        }
    }

    /// Allocate an empty, parentless scope at level 0
    pub fn create_scope(&mut self, name: impl Into<String>) -> ScopeId {
        self.alloc(Scope::new(name.into(), 0, None))
    }

    /// Make `scope` the active scope
    pub fn push_scope(&mut self, scope: ScopeId) {
        tracing::debug!(scope = self.scope(scope).name(), level = self.scope(scope).level, "enter scope");
        self.stack.push(scope);
    }

    /// Open a scope nested in the active one and make it active
    pub fn open_nested_scope(&mut self, name: impl Into<String>) -> AnalysisResult<ScopeId> {
        let parent = self.current_scope()?;
        let level = self.scope(parent).level + 1;
        let id = self.alloc(Scope::new(name.into(), level, Some(parent)));
        self.push_scope(id);
        Ok(id)
    }

    /// Pop the active scope and archive it in the registry
    pub fn close_scope(&mut self) -> AnalysisResult<ScopeId> {
        let id = self.stack.pop().ok_or(AnalysisError::NoActiveScope)?;
        tracing::debug!(scope = self.scope(id).name(), symbols = self.scope(id).symbols.len(), "leave scope");
        self.registry.push(id);
        Ok(id)
    }

    pub fn current_scope(&self) -> AnalysisResult<ScopeId> {
        self.stack.last().copied().ok_or(AnalysisError::NoActiveScope)
    }

    /// Declare `name` in the active scope.
    ///
    /// An existing entry with the same name is returned unchanged as
    /// [`Declared::Existing`]; no location is consumed in that case.
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        ty: ExpType,
        lineno: u32,
    ) -> AnalysisResult<Declared> {
        let scope_id = self.current_scope()?;
        let key = self.interner.get_or_intern(name);
        let scope = &mut self.scopes[scope_id.0];

        if let Some(index) = scope.lookup(key) {
            return Ok(Declared::Existing(SymbolId { scope: scope_id, index }));
        }

        let index = scope.symbols.len();
        scope.symbols.push(Symbol {
            name: key,
            kind,
            ty,
            location: scope.next_location,
            lines: vec![lineno],
            scope: scope_id,
        });
        scope.next_location += 1;
        scope.by_name.insert(key, index);
        tracing::trace!(name, ?kind, %ty, scope = scope.name.as_str(), lineno, "declare");

        Ok(Declared::New(SymbolId { scope: scope_id, index }))
    }

    /// Look `name` up in the active scope only
    pub fn lookup_local(&self, name: &str) -> AnalysisResult<Option<SymbolId>> {
        let scope = self.current_scope()?;
        Ok(self.lookup_in(scope, name))
    }

    /// Resolve `name` from the active scope outward; the nearest declaration wins
    pub fn resolve(&self, name: &str) -> AnalysisResult<Option<SymbolId>> {
        let scope = self.current_scope()?;
        Ok(self.resolve_from(scope, name))
    }

    /// Resolve `name` starting at an arbitrary scope and following its parents
    pub fn resolve_from(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.lookup_in(id, name) {
                return Some(found);
            }
            current = self.scope(id).parent;
        }
        None
    }

    /// Append a reference line to a symbol; duplicates are kept
    pub fn record_reference(&mut self, symbol: SymbolId, lineno: u32) {
        self.scopes[symbol.scope.0].symbols[symbol.index].lines.push(lineno);
    }

    /// First archived scope, in closing order, whose table holds `name`.
    ///
    /// This is not necessarily the lexically nearest declaration when several
    /// scopes declare the same name.
    pub fn find_declaring_scope(&self, name: &str) -> Option<ScopeId> {
        self.registry
            .iter()
            .copied()
            .find(|&id| self.lookup_in(id, name).is_some())
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.scopes[id.scope.0].symbols[id.index]
    }

    /// Name of a symbol as written in the source
    pub fn symbol_name(&self, symbol: &Symbol) -> &str {
        self.interner.resolve(symbol.name).unwrap_or_default()
    }

    /// Closed scopes in closing order
    pub fn registry(&self) -> impl Iterator<Item = &Scope> {
        self.registry.iter().map(|&id| self.scope(id))
    }

    /// Number of scopes still open
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Formatted listing of every archived scope
    pub fn symbol_table(&self) -> SymbolTable<'_> {
        SymbolTable { store: self }
    }

    fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(scope);
        id
    }

    fn lookup_in(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let key = self.interner.get(name)?;
        self.scope(scope)
            .lookup(key)
            .map(|index| SymbolId { scope, index })
    }
}

impl Default for ScopeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Symbol table listing, one row per symbol of every archived scope
pub struct SymbolTable<'a> {
    store: &'a ScopeStore,
}

impl fmt::Display for SymbolTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "< Symbol Table >")?;
        writeln!(
            f,
            " {:<12} {:<16} {:<12} {:<12} {:<10} {}",
            "Symbol Name", "Symbol Kind", "Symbol Type", "Scope Name", "Location", "Line Numbers"
        )?;
        writeln!(
            f,
            "-------------  -----------  -------------  ------------  --------  ------------"
        )?;

        for scope in self.store.registry() {
            for symbol in &scope.symbols {
                write!(
                    f,
                    " {:<12} {:<16} {:<12} {:<12} {:<10} ",
                    self.store.symbol_name(symbol),
                    symbol.kind,
                    symbol.ty,
                    scope.name,
                    symbol.location
                )?;
                for line in &symbol.lines {
                    write!(f, "{line} ")?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f)
    }
}
