//! Speakable name values handed to the speech backend

use std::fmt;

/// Ref / street / destination of one road, already normalized.
/// Empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTriple {
    pub ref_code: Option<String>,
    pub street: Option<String>,
    pub destination: Option<String>,
}

impl NameTriple {
    pub fn is_empty(&self) -> bool {
        self.ref_code.is_none() && self.street.is_none() && self.destination.is_none()
    }
}

/// Structured road names for backends that can phrase them themselves
/// ("on A1, turn left onto B2 towards Berlin").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredUtterance {
    /// Road entered by the maneuver
    pub next: NameTriple,
    /// Road currently driven, when known
    pub current: Option<NameTriple>,
}

/// Name parameter of a phrase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpeakableName {
    #[default]
    Empty,
    /// Single string for backends without structured support
    Plain(String),
    Structured(StructuredUtterance),
}

impl SpeakableName {
    pub fn is_empty(&self) -> bool {
        match self {
            SpeakableName::Empty => true,
            SpeakableName::Plain(s) => s.is_empty(),
            SpeakableName::Structured(s) => {
                s.next.is_empty() && s.current.as_ref().is_none_or(NameTriple::is_empty)
            }
        }
    }

    /// Whether the destination of the next road is part of this name
    pub fn names_destination(&self) -> bool {
        matches!(self, SpeakableName::Structured(s) if s.next.destination.is_some())
    }
}

fn write_triple(f: &mut fmt::Formatter<'_>, triple: &NameTriple) -> fmt::Result {
    let parts: Vec<&str> = [&triple.ref_code, &triple.street, &triple.destination]
        .into_iter()
        .map(|p| p.as_deref().unwrap_or(""))
        .collect();
    write!(f, "[{}]", parts.join("|"))
}

impl fmt::Display for SpeakableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakableName::Empty => Ok(()),
            SpeakableName::Plain(s) => f.write_str(s),
            SpeakableName::Structured(s) => {
                write_triple(f, &s.next)?;
                if let Some(current) = &s.current {
                    f.write_str(" from ")?;
                    write_triple(f, current)?;
                }
                Ok(())
            }
        }
    }
}
