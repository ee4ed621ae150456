//! Semantic analyzer - symbol table construction and type checking

use crate::ast::TranslationUnit;
use crate::common::{AnalysisError, AnalysisResult, Diagnostics};

use super::check::TypeCheckPass;
use super::declare::{enter_global, DeclarationPass};
use super::scope::{ScopeStore, SymbolTable};
use super::walker::traverse;

/// Configuration options for the analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Log the symbol table once the declaration pass is done
    pub trace_analyze: bool,
    /// Skip type diagnostics caused by implicitly declared names
    pub suppress_undetermined: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            trace_analyze: false,
            suppress_undetermined: true,
        }
    }
}

/// Semantic analyzer for name resolution and type checking.
///
/// Owns the scope store and the diagnostics sink shared by both passes. The
/// declaration pass must complete before the type-check pass runs.
pub struct SemanticAnalyzer {
    config: AnalyzerConfig,
    scopes: ScopeStore,
    diagnostics: Diagnostics,
    symtab_built: bool,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            scopes: ScopeStore::new(),
            diagnostics: Diagnostics::new(),
            symtab_built: false,
        }
    }

    /// Run both passes over a translation unit
    pub fn analyze(&mut self, tu: &mut TranslationUnit) -> AnalysisResult<()> {
        self.build_symtab(tu)?;
        self.type_check(tu)
    }

    /// Declaration pass: build every scope and resolve every name
    pub fn build_symtab(&mut self, tu: &mut TranslationUnit) -> AnalysisResult<()> {
        if self.symtab_built {
            return Err(AnalysisError::SymtabAlreadyBuilt);
        }

        tracing::debug!("declaration pass");
        enter_global(&mut self.scopes)?;
        let mut pass = DeclarationPass::new(&mut self.scopes, &mut self.diagnostics);
        traverse(tu.root.as_deref_mut(), &mut pass)?;
        self.scopes.close_scope()?;
        self.symtab_built = true;

        if self.config.trace_analyze {
            tracing::info!("\nSymbol table:\n\n{}", self.scopes.symbol_table());
        }
        Ok(())
    }

    /// Type-check pass: annotate expression types and validate statements
    pub fn type_check(&mut self, tu: &mut TranslationUnit) -> AnalysisResult<()> {
        if !self.symtab_built {
            return Err(AnalysisError::SymtabNotBuilt);
        }

        tracing::debug!("type-check pass");
        let mut pass = TypeCheckPass::new(
            &self.scopes,
            &mut self.diagnostics,
            self.config.suppress_undetermined,
        );
        traverse(tu.root.as_deref_mut(), &mut pass)
    }

    /// The error indicator
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn scopes(&self) -> &ScopeStore {
        &self.scopes
    }

    /// Formatted listing of every scope
    pub fn symbol_table(&self) -> SymbolTable<'_> {
        self.scopes.symbol_table()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
