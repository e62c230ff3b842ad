//! Error adapter for converting Simon problems and errors to miette
//! diagnostics.
//!
//! This module provides the bridge between the library's plain-data
//! problems and miette's rich diagnostic formatting used in the CLI. Every
//! problem is rendered independently, against the text of the unit it was
//! found in.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceSpan};

use simon::{Problem, Severity, SimonError};

/// Adapter for a single [`Problem`].
pub struct ProblemAdapter<'a> {
    problem: &'a Problem,
    /// Text of the problem's unit, if it could be read.
    src: Option<NamedSource<String>>,
}

impl<'a> ProblemAdapter<'a> {
    pub fn new(problem: &'a Problem, text: Option<String>) -> Self {
        let src = text.map(|text| NamedSource::new(problem.source(), text));
        Self { problem, src }
    }

    pub fn is_warning(&self) -> bool {
        self.problem.severity().is_warning()
    }
}

impl fmt::Debug for ProblemAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemAdapter")
            .field("problem", &self.problem)
            .finish()
    }
}

impl fmt::Display for ProblemAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.src.is_none() && self.problem.line() == 0 {
            write!(f, "{}: {}", self.problem.source(), self.problem.message())
        } else {
            write!(f, "{}", self.problem.message())
        }
    }
}

impl std::error::Error for ProblemAdapter<'_> {}

impl MietteDiagnostic for ProblemAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.problem.category().code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.problem.severity() {
            Severity::Warning => miette::Severity::Warning,
            Severity::Error | Severity::Fatal => miette::Severity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.problem
            .diagnostic()
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.src
            .as_ref()
            .map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        // Spans are only meaningful against the unit's text.
        self.src.as_ref()?;
        let labels = self.problem.diagnostic().labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`SimonError`], which carries no source location.
pub struct ErrorAdapter<'a>(pub &'a SimonError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SimonError::Io(_) => "simon::io",
            SimonError::Metamodel(_) => "simon::metamodel",
            SimonError::NoMetamodel => "simon::no_metamodel",
            SimonError::NoEntryPoints => "simon::no_entry_points",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SimonError::NoMetamodel => Some(Box::new(
                "pass `--metamodel <FILE>` or set `path` in the `[metamodel]` section",
            )),
            _ => None,
        }
    }
}

/// A reportable problem or error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A problem in a source unit.
    Problem(ProblemAdapter<'a>),
    /// An error that stopped the compilation from running.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Problem(p) => fmt::Display::fmt(p, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Problem(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Problem(p) => p.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Problem(p) => p.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Problem(p) => p.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Problem(p) => p.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Problem(p) => p.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a simon [`Span`](simon_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: simon_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`SimonError`] into a reportable error.
pub fn error_reportables(err: &SimonError) -> Vec<Reportable<'_>> {
    vec![Reportable::Error(ErrorAdapter(err))]
}

/// Convert every problem of a compilation into a reportable, fetching each
/// unit's text with `text_of`.
pub fn problem_reportables<'a>(
    problems: impl IntoIterator<Item = &'a Problem>,
    text_of: impl Fn(&str) -> Option<String>,
) -> Vec<Reportable<'a>> {
    problems
        .into_iter()
        .map(|problem| {
            let text = text_of(problem.source());
            Reportable::Problem(ProblemAdapter::new(problem, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use simon::{Category, Diagnostic};
    use simon_parser::Span;

    use super::*;

    fn problem() -> Problem {
        Problem::new(
            "main",
            2,
            19,
            Diagnostic::fatal("Feature `widgets` not found in `Application`")
                .with_category(Category::MissingFeature)
                .with_label(Span::new(30..37), "unknown composition")
                .with_secondary_label(Span::new(12..23), "element declared here")
                .with_help("declared compositions: `screens`"),
        )
    }

    #[test]
    fn test_problem_adapter() {
        let problem = problem();
        let adapter = ProblemAdapter::new(
            &problem,
            Some("language UI\nApplication app { widgets {} }".into()),
        );

        assert_eq!(
            adapter.to_string(),
            "Feature `widgets` not found in `Application`"
        );
        assert_eq!(adapter.code().unwrap().to_string(), "S203");
        assert_eq!(adapter.severity(), Some(miette::Severity::Error));
        assert_eq!(
            adapter.help().unwrap().to_string(),
            "declared compositions: `screens`"
        );
    }

    #[test]
    fn test_labels_keep_primary_flag() {
        let problem = problem();
        let adapter = ProblemAdapter::new(
            &problem,
            Some("language UI\nApplication app { widgets {} }".into()),
        );

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("unknown composition"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_problem_without_text_has_no_labels() {
        let problem = Problem::unpositioned(
            "lib.shapes",
            Diagnostic::fatal("No source found for unit `lib.shapes`")
                .with_category(Category::MissingElement),
        );
        let adapter = ProblemAdapter::new(&problem, None);

        assert!(adapter.labels().is_none());
        assert!(adapter.source_code().is_none());
        assert_eq!(
            adapter.to_string(),
            "lib.shapes: No source found for unit `lib.shapes`"
        );
    }

    #[test]
    fn test_problem_reportables_fetch_text_per_source() {
        let problems = [problem(), problem()];
        let reportables = problem_reportables(&problems, |name| {
            (name == "main").then(|| "language UI".to_string())
        });

        assert_eq!(reportables.len(), 2);
        assert!(reportables.iter().all(|r| r.source_code().is_some()));
    }

    #[test]
    fn test_error_reportable() {
        let err = SimonError::NoEntryPoints;
        let reportables = error_reportables(&err);

        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "No entry points given");
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "simon::no_entry_points"
        );
    }
}
