//! Warning accumulation (spec §6: "warnings never stop the pipeline").
//!
//! The pipeline is single-threaded and synchronous end to end, so a
//! warning sink is just a `Vec` behind a `&mut` reference threaded
//! through the call chain — the same convention the teacher uses for
//! passing `&mut State`/`&mut Namespace` through its evaluator rather
//! than reaching for interior mutability or channels.

use super::{Diagnostic, Severity};

/// Accumulates warning-severity diagnostics produced during a single
/// compilation run. Holds no error-severity diagnostics: those are
/// returned directly via `Result` by the phase that detected them.
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<Diagnostic>,
}

impl WarningCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `diag`.
    ///
    /// # Panics
    /// Panics if `diag.severity` is [`Severity::Error`] — errors must be
    /// propagated with `?`, never pushed here. This is a caller bug, not
    /// a recoverable condition.
    pub fn add(&mut self, diag: Diagnostic) {
        assert!(
            diag.severity == Severity::Warning,
            "error-severity diagnostic {:?} pushed into WarningCollector; propagate it with `?` instead",
            diag.code
        );
        self.warnings.push(diag);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Takes ownership of every warning collected so far, leaving the
    /// collector empty.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;
    use crate::intern::StringId;
    use crate::source::{Location, Span};

    fn dummy_span() -> Span {
        Span::point(Location::start_of_file(StringId::from_index(0)))
    }

    #[test]
    fn drain_empties_the_collector_and_returns_what_was_pushed() {
        let mut collector = WarningCollector::new();
        collector.add(Diagnostic::create(DiagnosticCode::VF4900, dummy_span(), &[]));
        assert_eq!(collector.len(), 1);
        let drained = collector.drain();
        assert_eq!(drained.len(), 1);
        assert!(collector.is_empty());
    }

    #[test]
    #[should_panic(expected = "propagate it with")]
    fn pushing_an_error_severity_diagnostic_panics() {
        let mut collector = WarningCollector::new();
        collector.add(Diagnostic::create(DiagnosticCode::VF4100, dummy_span(), &[("name", "x")]));
    }
}
