//! Inheritance links and facet constraints

use super::TypeId;
use indexmap::IndexMap;

/// Facet kinds a restriction may constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum FacetKind {
    Enumeration,
    Pattern,
    Length,
    MinLength,
    MaxLength,
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
    FractionDigits,
    TotalDigits,
    WhiteSpace,
}

impl FacetKind {
    /// Map an XSD facet element name to its kind
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "enumeration" => FacetKind::Enumeration,
            "pattern" => FacetKind::Pattern,
            "length" => FacetKind::Length,
            "minLength" => FacetKind::MinLength,
            "maxLength" => FacetKind::MaxLength,
            "minInclusive" => FacetKind::MinInclusive,
            "maxInclusive" => FacetKind::MaxInclusive,
            "minExclusive" => FacetKind::MinExclusive,
            "maxExclusive" => FacetKind::MaxExclusive,
            "fractionDigits" => FacetKind::FractionDigits,
            "totalDigits" => FacetKind::TotalDigits,
            "whiteSpace" => FacetKind::WhiteSpace,
            _ => return None,
        })
    }

    /// The XSD facet element name
    pub fn as_str(self) -> &'static str {
        match self {
            FacetKind::Enumeration => "enumeration",
            FacetKind::Pattern => "pattern",
            FacetKind::Length => "length",
            FacetKind::MinLength => "minLength",
            FacetKind::MaxLength => "maxLength",
            FacetKind::MinInclusive => "minInclusive",
            FacetKind::MaxInclusive => "maxInclusive",
            FacetKind::MinExclusive => "minExclusive",
            FacetKind::MaxExclusive => "maxExclusive",
            FacetKind::FractionDigits => "fractionDigits",
            FacetKind::TotalDigits => "totalDigits",
            FacetKind::WhiteSpace => "whiteSpace",
        }
    }
}

/// One facet declaration: the constraining value and its documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCheck {
    /// The facet's `value` attribute
    pub value: String,
    /// Documentation attached to the facet node
    pub doc: String,
}

/// A `restriction` derivation: optional base type plus an ordered multi-map
/// of facet checks, preserving declaration order per kind
#[derive(Debug, Clone, Default)]
pub struct Restriction {
    base: Option<TypeId>,
    checks: IndexMap<FacetKind, Vec<FacetCheck>>,
}

impl Restriction {
    /// Create an empty restriction
    pub fn new() -> Self {
        Self::default()
    }

    /// The base type, once resolved
    pub fn base(&self) -> Option<TypeId> {
        self.base
    }

    /// Set the base type
    pub fn set_base(&mut self, base: TypeId) {
        self.base = Some(base);
    }

    /// Append a facet check, preserving declaration order within its kind
    pub fn add_check(&mut self, kind: FacetKind, check: FacetCheck) {
        self.checks.entry(kind).or_default().push(check);
    }

    /// All facet checks, grouped by kind in first-seen order
    pub fn checks(&self) -> &IndexMap<FacetKind, Vec<FacetCheck>> {
        &self.checks
    }

    /// Facet checks of one kind, in declaration order
    pub fn checks_by_kind(&self, kind: FacetKind) -> &[FacetCheck] {
        self.checks.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// An `extension` derivation: base type only
#[derive(Debug, Clone, Default)]
pub struct Extension {
    base: Option<TypeId>,
}

impl Extension {
    /// Create an empty extension
    pub fn new() -> Self {
        Self::default()
    }

    /// The base type, once resolved
    pub fn base(&self) -> Option<TypeId> {
        self.base
    }

    /// Set the base type
    pub fn set_base(&mut self, base: TypeId) {
        self.base = Some(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_kind_round_trip() {
        for name in [
            "enumeration",
            "pattern",
            "length",
            "minLength",
            "maxLength",
            "minInclusive",
            "maxInclusive",
            "minExclusive",
            "maxExclusive",
            "fractionDigits",
            "totalDigits",
            "whiteSpace",
        ] {
            let kind = FacetKind::from_name(name).unwrap();
            assert_eq!(kind.as_str(), name);
        }
        assert_eq!(FacetKind::from_name("assertion"), None);
    }

    #[test]
    fn test_checks_preserve_order() {
        let mut restriction = Restriction::new();
        for value in ["red", "green", "blue"] {
            restriction.add_check(
                FacetKind::Enumeration,
                FacetCheck {
                    value: value.to_string(),
                    doc: String::new(),
                },
            );
        }
        let values: Vec<_> = restriction
            .checks_by_kind(FacetKind::Enumeration)
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["red", "green", "blue"]);
        assert!(restriction.checks_by_kind(FacetKind::Pattern).is_empty());
    }
}
