//! Unified error type with diagnostics.

use std::fmt;

use graft_core::{BuildError, ExecutionError, RuntimeError};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, Severity};

/// Any error surfaced by graft.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A descriptor or tree was built with invalid arguments.
    #[error("Invalid construction: {0}")]
    Build(#[from] BuildError),

    /// Executing a tree failed.
    #[error("Execution failed: {0}")]
    Execution(#[from] ExecutionError),
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error::Execution(ExecutionError::Runtime(err))
    }
}

impl Error {
    /// Stable diagnostic code, e.g. `graft::unsupported_operands`.
    pub fn diagnostic_code(&self) -> &'static str {
        match self {
            Error::Build(err) => match err {
                BuildError::EmptyDescriptor { .. } => "graft::empty_descriptor",
                BuildError::TooManyCandidates { .. } => "graft::too_many_candidates",
                BuildError::PredicateArity { .. } => "graft::predicate_arity",
                BuildError::DuplicateCandidate { .. } => "graft::duplicate_candidate",
                BuildError::ModifierWithoutCandidate { .. } => "graft::modifier_without_candidate",
                BuildError::Arity { .. } => "graft::arity",
                BuildError::OperandKind { .. } => "graft::operand_kind",
                BuildError::UnknownNode { .. } => "graft::unknown_node",
                BuildError::OperandAlreadyOwned { .. } => "graft::operand_already_owned",
                BuildError::DuplicateOperand { .. } => "graft::duplicate_operand",
                BuildError::DetachedNode { .. } => "graft::detached_node",
            },
            Error::Execution(err) => match err {
                ExecutionError::UnsupportedOperands { .. } => "graft::unsupported_operands",
                ExecutionError::Runtime(RuntimeError::DivisionByZero) => "graft::division_by_zero",
                ExecutionError::Runtime(RuntimeError::UnknownGlobal { .. }) => {
                    "graft::unknown_global"
                }
                ExecutionError::Runtime(RuntimeError::MissingEnvironment { .. }) => {
                    "graft::missing_environment"
                }
                ExecutionError::Runtime(RuntimeError::Custom(_)) => "graft::runtime",
                ExecutionError::MissingArgument { .. } => "graft::missing_argument",
                ExecutionError::NotSpecializable { .. } => "graft::not_specializable",
                ExecutionError::StackOverflow { .. } => "graft::stack_overflow",
            },
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Build(BuildError::OperandAlreadyOwned { .. }) => {
                Some("every node has exactly one owner; build a fresh node for each use")
            }
            Error::Build(BuildError::DetachedNode { .. }) => {
                Some("attach the node as an operand or drop it before finishing the tree")
            }
            Error::Build(BuildError::ModifierWithoutCandidate { .. }) => {
                Some("guards, assumptions and `generic` apply to the preceding candidate")
            }
            Error::Execution(ExecutionError::UnsupportedOperands { .. }) => {
                Some("no candidate accepts these operand kinds; add one to the descriptor")
            }
            Error::Execution(ExecutionError::StackOverflow { .. }) => {
                Some("raise `TreeOptions::max_depth` or reduce nesting")
            }
            _ => None,
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diagnostic_code()))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.hint()
            .map(|hint| Box::new(hint) as Box<dyn fmt::Display + 'a>)
    }
}

/// Render an error with formatting to stderr.
pub fn render_error(error: &Error) {
    let mut out = String::new();
    match GraphicalReportHandler::new().render_report(&mut out, error) {
        Ok(()) => eprintln!("{}", out),
        Err(_) => eprintln!("{}", error),
    }
}

/// Render an error to a String without color codes (useful for tests, logs,
/// etc.)
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use graft::{Frame, TreeBuilder, Value, render_error_to_string, stdlib};
///
/// let div = Arc::new(stdlib::arith::div());
/// let mut builder = TreeBuilder::new();
/// let x = builder.literal(Value::Int(1));
/// let y = builder.literal(Value::Int(0));
/// let node = builder.operation(&div, &[x, y]).unwrap();
/// let mut tree = builder.finish(node).unwrap();
///
/// let err = graft::Error::from(tree.execute(&Frame::empty()).unwrap_err());
/// let rendered = render_error_to_string(&err);
/// assert!(rendered.contains("graft::division_by_zero"));
/// assert!(rendered.contains("Division by zero"));
/// ```
pub fn render_error_to_string(error: &Error) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    match handler.render_report(&mut out, error) {
        Ok(()) => out,
        Err(_) => error.to_string(),
    }
}
