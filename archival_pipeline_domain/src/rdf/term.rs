// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! RDF term types: IRIs, literals, and the object/graph-name sum types.
//!
//! The pipeline never emits blank nodes or quoted triples: every subject and
//! every graph name is a well-known IRI derived from an archival ID or a
//! fixed convention (§6.6), so `Term` only needs two variants.

use std::fmt;

use crate::error::PipelineError;
use crate::rdf::prefixes::XSD_STRING;

/// An absolute IRI. Validated to be non-empty and free of the characters
/// N-Quads requires IRIs to avoid (`<`, `>`, `"`, whitespace, `{`, `}`,
/// `|`, `^`, backtick); callers that build IRIs from path segments must
/// percent-encode them first (see [`crate::rdf::nquads::percent_encode`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(String);

const FORBIDDEN_IRI_CHARS: &[char] = &['<', '>', '"', '{', '}', '|', '^', '`', ' ', '\n', '\t'];

impl Iri {
    /// Validates and wraps an absolute IRI string.
    pub fn new(iri: impl Into<String>) -> Result<Self, PipelineError> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(PipelineError::validation_error("IRI cannot be empty"));
        }
        if iri.chars().any(|c| FORBIDDEN_IRI_CHARS.contains(&c)) {
            return Err(PipelineError::validation_error(format!("IRI contains forbidden character: {iri}")));
        }
        Ok(Self(iri))
    }

    /// Wraps an IRI string known to already be valid (constants, or values
    /// already built through [`Iri::new`]). Debug-asserts the invariant.
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        let iri = iri.into();
        debug_assert!(!iri.is_empty() && !iri.chars().any(|c| FORBIDDEN_IRI_CHARS.contains(&c)));
        Self(iri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An RDF literal: a lexical value plus an optional datatype IRI. A literal
/// with no explicit datatype is `xsd:string` (the N-Quads writer omits the
/// `^^<...>` suffix in that case, matching standard Turtle/N-Quads style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    value: String,
    datatype: Option<Iri>,
}

impl Literal {
    /// A plain (`xsd:string`) literal.
    pub fn plain(value: impl Into<String>) -> Self {
        Self { value: value.into(), datatype: None }
    }

    /// A literal with an explicit datatype IRI.
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self { value: value.into(), datatype: Some(datatype) }
    }

    /// An `xsd:boolean` literal.
    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), Iri::new_unchecked(crate::rdf::prefixes::XSD_BOOLEAN))
    }

    /// An `xsd:date` literal (`YYYY-MM-DD`).
    pub fn date(value: impl Into<String>) -> Self {
        Self::typed(value.into(), Iri::new_unchecked(crate::rdf::prefixes::XSD_DATE))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_literal(&self.value))?;
        match &self.datatype {
            Some(dt) if dt.as_str() != XSD_STRING => write!(f, "^^{}", dt),
            _ => Ok(()),
        }
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n").replace('\r', "\\r")
}

/// An RDF object term: either a named node or a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Named(Iri),
    Literal(Literal),
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Named(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Named(iri) => write!(f, "{}", iri),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// The fourth N-Quads component: the named graph an entity's quads belong
/// to (§6.6). The pipeline always writes into a named graph; there is no
/// default-graph variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphName(pub Iri);

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_angle_brackets() {
        assert!(Iri::new("http://example.org/<bad>").is_err());
    }

    #[test]
    fn literal_escapes_quotes_and_newlines() {
        let lit = Literal::plain("line1\n\"quoted\"");
        assert_eq!(lit.to_string(), "\"line1\\n\\\"quoted\\\"\"");
    }

    #[test]
    fn typed_literal_renders_datatype_suffix() {
        let lit = Literal::date("2025-07-12");
        assert_eq!(lit.to_string(), format!("\"2025-07-12\"^^<{}>", crate::rdf::prefixes::XSD_DATE));
    }

    #[test]
    fn plain_string_literal_omits_xsd_string_suffix() {
        let lit = Literal::typed("hello", Iri::new_unchecked(XSD_STRING));
        assert_eq!(lit.to_string(), "\"hello\"");
    }
}
