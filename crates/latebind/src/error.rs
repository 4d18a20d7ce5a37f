//! Binding failures and handler faults.
//!
//! Keeping match/ambiguity/conversion/invocation failures distinct lets
//! callers handle user feedback and recovery accurately without string
//! matching. Every variant names the member; match failures also carry the
//! candidate signatures considered, rendered against the registry so the
//! error stays fully owned.

use std::fmt;

/// A fault raised by a method handler or a conversion operator.
///
/// Hosts may wrap a root cause one level deep (an invocation wrapper around
/// the real error); the engine unwraps that level before reporting.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallFault {
    pub message: String,
    pub cause: Option<Box<CallFault>>,
}

impl CallFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: CallFault) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Strips one level of wrapping, exposing the true cause of a wrapped
    /// invocation fault.
    pub(crate) fn unwrap_wrapping(self) -> Self {
        match self.cause {
            Some(cause) => *cause,
            None => self,
        }
    }
}

impl fmt::Display for CallFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CallFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|cause| cause.as_ref() as _)
    }
}

/// Error type for one resolution-and-invocation, separating failures by
/// pipeline stage.
///
/// `NoMatch` and `Ambiguous` are detected before any call is attempted;
/// `Conversion` aborts before the call; `Invocation` reports a fault from
/// the selected, fully-bound call. All four are terminal — the engine never
/// retries.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BindError {
    /// No candidate is structurally admissible for the call shape.
    NoMatch {
        member: String,
        given: usize,
        /// The candidate signatures considered, rendered.
        candidates: Vec<String>,
    },
    /// Two or more candidates tie at minimal distance.
    Ambiguous {
        member: String,
        /// The tied candidate signatures, rendered.
        candidates: Vec<String>,
    },
    /// A bound value could not be coerced to its parameter's type, or a
    /// default could not be synthesized.
    Conversion {
        member: String,
        candidate: String,
        param: String,
        value_type: String,
        target_type: String,
        /// Extra detail when the failure came from an operator fault or a
        /// range check.
        reason: Option<String>,
    },
    /// The selected, fully-bound call raised a fault during execution.
    Invocation {
        member: String,
        candidate: String,
        fault: CallFault,
    },
}

impl BindError {
    /// The member name the failing call targeted.
    pub fn member(&self) -> &str {
        match self {
            Self::NoMatch { member, .. }
            | Self::Ambiguous { member, .. }
            | Self::Conversion { member, .. }
            | Self::Invocation { member, .. } => member,
        }
    }
}

fn write_candidate_list(f: &mut fmt::Formatter<'_>, candidates: &[String]) -> fmt::Result {
    for (i, candidate) in candidates.iter().enumerate() {
        if i > 0 {
            f.write_str(" and ")?;
        }
        write!(f, "'{candidate}'")?;
    }
    Ok(())
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch {
                member,
                given,
                candidates,
            } => {
                write!(
                    f,
                    "no overload of '{member}' takes {given} argument{}",
                    if *given == 1 { "" } else { "s" }
                )?;
                if !candidates.is_empty() {
                    f.write_str("; considered: ")?;
                    write_candidate_list(f, candidates)?;
                }
                Ok(())
            }
            Self::Ambiguous { member, candidates } => {
                write!(f, "the call to '{member}' is ambiguous between: ")?;
                write_candidate_list(f, candidates)
            }
            Self::Conversion {
                candidate,
                param,
                value_type,
                target_type,
                reason,
                ..
            } => {
                write!(
                    f,
                    "cannot convert argument '{param}' from '{value_type}' to '{target_type}' for '{candidate}'"
                )?;
                if let Some(reason) = reason {
                    write!(f, " ({reason})")?;
                }
                Ok(())
            }
            Self::Invocation { candidate, fault, .. } => {
                write!(f, "'{candidate}' raised a fault: {fault}")
            }
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invocation { fault, .. } => Some(fault),
            _ => None,
        }
    }
}
