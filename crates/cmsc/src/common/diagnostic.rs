//! Diagnostic collection and reporting

use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{self, Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};

use super::SemaError;

/// Ordered sink of semantic errors.
///
/// Errors keep traversal order, not line order. Any reported error sets the
/// error indicator.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<SemaError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: SemaError) {
        tracing::debug!(line = error.line(), "{error}");
        self.errors.push(error);
    }

    /// The error indicator: true iff anything was reported
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SemaError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[SemaError] {
        &self.errors
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a SemaError;
    type IntoIter = std::slice::Iter<'a, SemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Build a diagnostic, labelling the offending line when the source is known
    pub fn to_diagnostic(&self, file_id: Option<usize>, error: &SemaError) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(error.category());

        match file_id.and_then(|id| self.line_range(id, error.line()).map(|r| (id, r))) {
            Some((id, range)) => diagnostic
                .with_labels(vec![Label::primary(id, range).with_message(error.to_string())]),
            None => diagnostic.with_notes(vec![error.to_string()]),
        }
    }

    /// Render every diagnostic, in order, to `writer`
    pub fn emit<'a>(
        &self,
        writer: &mut dyn WriteColor,
        file_id: Option<usize>,
        errors: impl IntoIterator<Item = &'a SemaError>,
    ) -> Result<(), files::Error> {
        for error in errors {
            let diagnostic = self.to_diagnostic(file_id, error);
            term::emit(writer, &self.config, &self.files, &diagnostic)?;
        }
        Ok(())
    }

    /// Render every diagnostic to stderr
    pub fn report_all(&self, file_id: Option<usize>, diagnostics: &Diagnostics) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let _ = self.emit(&mut writer.lock(), file_id, diagnostics);
    }

    fn line_range(&self, file_id: usize, line: u32) -> Option<Range<usize>> {
        let line_index = (line as usize).checked_sub(1)?;
        self.files.line_range(file_id, line_index).ok()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
