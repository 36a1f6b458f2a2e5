//! Filter expressions for the CMCI `CRITERIA` query parameter.
//!
//! A [`Filter`] is a tree of comparisons joined by `AND`/`OR`, or a raw
//! expression passed through unchanged. [`Filter::to_criteria`] renders it
//! in the CMCI criteria grammar:
//!
//! - a comparison renders as `(ATTRIBUTE<op>'value')`
//! - a group renders as `a AND b` at the top level and `(a AND b)` when nested
//! - a raw expression is used verbatim, and parenthesized inside a group
//! - a single-member group renders as its member
//!
//! Rendering is deterministic. Percent-encoding happens when the criteria is
//! placed in the URL.
//!
//! # Example
//!
//! ```rust
//! use cmci::resources::{Filter, FilterOperator};
//!
//! let filter = Filter::eq("name", "PONGALT").unwrap();
//! assert_eq!(filter.to_criteria(), "(NAME='PONGALT')");
//!
//! let filter = Filter::or(vec![
//!     Filter::eq("program", "DFH*").unwrap(),
//!     Filter::compare("usecount", FilterOperator::Gt, "0").unwrap(),
//! ])
//! .unwrap();
//! assert_eq!(filter.to_criteria(), "(PROGRAM='DFH*') OR (USECOUNT>'0')");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Comparison operators of the CMCI criteria grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOperator {
    /// `=`: equal, honouring `*` and `+` wildcards.
    Eq,
    /// `==`: equal, without wildcard expansion.
    Is,
    /// `¬=`: not equal.
    Ne,
    /// `<`: less than.
    Lt,
    /// `<=`: less than or equal.
    Le,
    /// `>`: greater than.
    Gt,
    /// `>=`: greater than or equal.
    Ge,
}

impl FilterOperator {
    /// Returns the operator as written in criteria strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Is => "==",
            Self::Ne => "¬=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "=" | "EQ" => Ok(Self::Eq),
            "==" | "IS" => Ok(Self::Is),
            "!=" | "¬=" | "¬" | "NE" => Ok(Self::Ne),
            "<" | "LT" => Ok(Self::Lt),
            "<=" | "LE" => Ok(Self::Le),
            ">" | "GT" => Ok(Self::Gt),
            ">=" | "GE" => Ok(Self::Ge),
            _ => Err(ValidationError::UnsupportedOperator {
                operator: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `attribute <op> value` predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    attribute: String,
    operator: FilterOperator,
    value: String,
}

impl Comparison {
    /// Returns the attribute name, upper-cased.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// Returns the value to compare against.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn render(&self) -> String {
        let quoted = self.value.replace('\'', "''");
        format!("({}{}'{quoted}')", self.attribute, self.operator)
    }
}

/// A filter selecting the resource instances an operation applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    /// A single comparison.
    Comparison(Comparison),
    /// All members must match.
    And(Vec<Filter>),
    /// Any member must match.
    Or(Vec<Filter>),
    /// A criteria expression used verbatim.
    Raw(String),
}

impl Filter {
    /// Creates a comparison filter.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFilterAttribute`] if the attribute
    /// name is empty.
    pub fn compare(
        attribute: impl AsRef<str>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let attribute = attribute.as_ref().trim();
        if attribute.is_empty() {
            return Err(ValidationError::EmptyFilterAttribute);
        }
        Ok(Self::Comparison(Comparison {
            attribute: attribute.to_ascii_uppercase(),
            operator,
            value: value.into(),
        }))
    }

    /// Creates an equality filter. `*` and `+` in the value act as wildcards.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFilterAttribute`] if the attribute
    /// name is empty.
    pub fn eq(attribute: impl AsRef<str>, value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::compare(attribute, FilterOperator::Eq, value)
    }

    /// Creates a filter from a raw criteria expression.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFilter`] if the expression is blank.
    pub fn raw(expression: impl AsRef<str>) -> Result<Self, ValidationError> {
        let expression = expression.as_ref().trim();
        if expression.is_empty() {
            return Err(ValidationError::EmptyFilter);
        }
        Ok(Self::Raw(expression.to_string()))
    }

    /// Creates a conjunction.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFilterGroup`] if `filters` is empty.
    pub fn and(filters: Vec<Self>) -> Result<Self, ValidationError> {
        if filters.is_empty() {
            return Err(ValidationError::EmptyFilterGroup { group: "and" });
        }
        Ok(Self::And(filters))
    }

    /// Creates a disjunction.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFilterGroup`] if `filters` is empty.
    pub fn or(filters: Vec<Self>) -> Result<Self, ValidationError> {
        if filters.is_empty() {
            return Err(ValidationError::EmptyFilterGroup { group: "or" });
        }
        Ok(Self::Or(filters))
    }

    /// Creates a conjunction of comparisons from attribute/criterion pairs.
    ///
    /// Pairs are sorted by attribute name so the same map always renders
    /// the same criteria.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFilter`] if there are no pairs, or
    /// the error of the first invalid comparison.
    pub fn from_attributes<I, K>(attributes: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, FilterOperator, String)>,
        K: AsRef<str>,
    {
        let mut comparisons = attributes
            .into_iter()
            .map(|(attribute, operator, value)| Self::compare(attribute, operator, value))
            .collect::<Result<Vec<_>, _>>()?;
        if comparisons.is_empty() {
            return Err(ValidationError::EmptyFilter);
        }
        comparisons.sort_by(|a, b| match (a, b) {
            (Self::Comparison(a), Self::Comparison(b)) => a
                .attribute
                .cmp(&b.attribute)
                .then_with(|| a.value.cmp(&b.value)),
            _ => std::cmp::Ordering::Equal,
        });
        if comparisons.len() == 1 {
            return Ok(comparisons.remove(0));
        }
        Ok(Self::And(comparisons))
    }

    /// Renders the filter as a CMCI criteria string.
    #[must_use]
    pub fn to_criteria(&self) -> String {
        self.render(false)
    }

    fn render(&self, nested: bool) -> String {
        match self {
            Self::Comparison(comparison) => comparison.render(),
            Self::Raw(expression) if nested => format!("({expression})"),
            Self::Raw(expression) => expression.clone(),
            Self::And(members) => Self::render_group(members, " AND ", nested),
            Self::Or(members) => Self::render_group(members, " OR ", nested),
        }
    }

    fn render_group(members: &[Self], joiner: &str, nested: bool) -> String {
        if let [single] = members {
            return single.render(nested);
        }
        let joined = members
            .iter()
            .map(|member| member.render(true))
            .collect::<Vec<_>>()
            .join(joiner);
        if nested {
            format!("({joined})")
        } else {
            joined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_equality_matches_cmci_example() {
        let filter = Filter::eq("name", "PONGALT").unwrap();
        assert_eq!(filter.to_criteria(), "(NAME='PONGALT')");
    }

    #[test]
    fn test_operator_aliases() {
        assert_eq!("EQ".parse::<FilterOperator>().unwrap(), FilterOperator::Eq);
        assert_eq!("is".parse::<FilterOperator>().unwrap(), FilterOperator::Is);
        assert_eq!("!=".parse::<FilterOperator>().unwrap(), FilterOperator::Ne);
        assert_eq!("¬".parse::<FilterOperator>().unwrap(), FilterOperator::Ne);
        assert_eq!("ge".parse::<FilterOperator>().unwrap(), FilterOperator::Ge);
        assert_eq!("<".parse::<FilterOperator>().unwrap(), FilterOperator::Lt);
    }

    #[test]
    fn test_unsupported_operator_is_rejected() {
        assert!(matches!(
            "LIKE".parse::<FilterOperator>(),
            Err(ValidationError::UnsupportedOperator { operator }) if operator == "LIKE"
        ));
    }

    #[test]
    fn test_quotes_in_values_are_doubled() {
        let filter = Filter::eq("description", "it's").unwrap();
        assert_eq!(filter.to_criteria(), "(DESCRIPTION='it''s')");
    }

    #[test]
    fn test_empty_attribute_is_rejected() {
        assert!(matches!(
            Filter::eq("  ", "X"),
            Err(ValidationError::EmptyFilterAttribute)
        ));
    }

    #[test]
    fn test_attribute_map_renders_sorted_conjunction() {
        let first = Filter::from_attributes(vec![
            ("status", FilterOperator::Eq, "DISABLED".to_string()),
            ("name", FilterOperator::Eq, "PONG*".to_string()),
        ])
        .unwrap();
        let second = Filter::from_attributes(vec![
            ("name", FilterOperator::Eq, "PONG*".to_string()),
            ("status", FilterOperator::Eq, "DISABLED".to_string()),
        ])
        .unwrap();

        assert_eq!(
            first.to_criteria(),
            "(NAME='PONG*') AND (STATUS='DISABLED')"
        );
        assert_eq!(first.to_criteria(), second.to_criteria());
    }

    #[test]
    fn test_empty_attribute_map_is_rejected() {
        let empty: Vec<(&str, FilterOperator, String)> = Vec::new();
        assert!(matches!(
            Filter::from_attributes(empty),
            Err(ValidationError::EmptyFilter)
        ));
    }

    #[test]
    fn test_nested_groups_are_parenthesised() {
        let filter = Filter::and(vec![
            Filter::eq("enablestatus", "ENABLED").unwrap(),
            Filter::or(vec![
                Filter::eq("name", "A*").unwrap(),
                Filter::compare("name", FilterOperator::Is, "B").unwrap(),
            ])
            .unwrap(),
        ])
        .unwrap();

        assert_eq!(
            filter.to_criteria(),
            "(ENABLESTATUS='ENABLED') AND ((NAME='A*') OR (NAME=='B'))"
        );
    }

    #[test]
    fn test_single_member_group_renders_member() {
        let filter = Filter::or(vec![Filter::eq("name", "X").unwrap()]).unwrap();
        assert_eq!(filter.to_criteria(), "(NAME='X')");
    }

    #[test]
    fn test_empty_groups_are_rejected() {
        assert!(matches!(
            Filter::and(Vec::new()),
            Err(ValidationError::EmptyFilterGroup { group: "and" })
        ));
        assert!(matches!(
            Filter::or(Vec::new()),
            Err(ValidationError::EmptyFilterGroup { group: "or" })
        ));
    }

    #[test]
    fn test_raw_expression_is_trimmed_and_kept() {
        let filter = Filter::raw("  NAME=PONG* AND STATUS=ENABLED ").unwrap();
        assert_eq!(filter.to_criteria(), "NAME=PONG* AND STATUS=ENABLED");
        assert!(matches!(Filter::raw("   "), Err(ValidationError::EmptyFilter)));
    }

    #[test]
    fn test_raw_expression_is_parenthesised_inside_group() {
        let filter = Filter::and(vec![
            Filter::raw("NAME=A OR NAME=B").unwrap(),
            Filter::eq("enablestatus", "DISABLED").unwrap(),
        ])
        .unwrap();

        assert_eq!(
            filter.to_criteria(),
            "(NAME=A OR NAME=B) AND (ENABLESTATUS='DISABLED')"
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let filter = Filter::compare("usecount", FilterOperator::Ge, "10").unwrap();
        assert_eq!(filter.to_criteria(), filter.clone().to_criteria());
        assert_eq!(filter.to_criteria(), "(USECOUNT>='10')");
    }
}
