//! Generic ordered-bracket table resolution.
//!
//! A contribution type has one or more [`TableVersion`]s, each effective
//! from a date. Version selection picks the latest `effective_from` on or
//! before the query date; no match means "not configured", which is a
//! first-class value rather than an error. Within a version, brackets are
//! ordered by lower salary bound with closed-open `[lower, upper)` ranges
//! and an open-ended top bracket.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::ContributionShare;
use crate::money::round_centavos;

/// A salary sub-range within a table version.
pub trait SalaryBracket {
    /// Inclusive lower salary bound.
    fn lower(&self) -> Decimal;
    /// Exclusive upper salary bound; `None` for the open-ended top bracket.
    fn upper(&self) -> Option<Decimal>;

    /// Returns true if `salary` falls within `[lower, upper)`.
    fn contains(&self, salary: Decimal) -> bool {
        salary >= self.lower() && self.upper().is_none_or(|u| salary < u)
    }
}

/// How a [`ShareBracket`] computes the employee/employer split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareRule {
    /// Fixed peso amounts per side (SSS-style rows, floor/ceiling rows).
    Fixed {
        /// Employee amount.
        employee: Decimal,
        /// Employer amount.
        employer: Decimal,
    },
    /// Rates applied to the actual salary (PhilHealth/Pag-IBIG-style rows).
    RateOfSalary {
        /// Employee rate as a fraction (e.g., 0.025 for 2.5%).
        employee_rate: Decimal,
        /// Employer rate as a fraction.
        employer_rate: Decimal,
    },
}

/// One salary bracket mapping to an employee/employer contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareBracket {
    /// Inclusive lower salary bound.
    pub lower: Decimal,
    /// Exclusive upper salary bound; `None` when open-ended.
    pub upper: Option<Decimal>,
    /// How the shares are computed.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub rule: ShareRule,
}

impl SalaryBracket for ShareBracket {
    fn lower(&self) -> Decimal {
        self.lower
    }

    fn upper(&self) -> Option<Decimal> {
        self.upper
    }
}

impl ShareBracket {
    /// Computes the contribution for a salary within this bracket, rounded
    /// to centavos per side.
    pub fn compute(&self, salary: Decimal) -> ContributionShare {
        match self.rule {
            ShareRule::Fixed { employee, employer } => {
                ContributionShare::new(round_centavos(employee), round_centavos(employer))
            }
            ShareRule::RateOfSalary {
                employee_rate,
                employer_rate,
            } => ContributionShare::new(
                round_centavos(salary * employee_rate),
                round_centavos(salary * employer_rate),
            ),
        }
    }
}

/// One dated version of a contribution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableVersion<B> {
    /// The date this version takes effect.
    pub effective_from: NaiveDate,
    /// Brackets ordered by lower bound.
    pub brackets: Vec<B>,
}

impl<B: SalaryBracket> TableVersion<B> {
    /// Validates bracket coverage: the first bracket starts at zero, each
    /// bracket's upper bound equals the next bracket's lower bound, and the
    /// last bracket is open-ended — so every non-negative salary matches
    /// exactly one bracket.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidContributionTable`] naming the first violation.
    pub fn validate(&self, table: &str) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidContributionTable {
            table: table.to_string(),
            effective_from: self.effective_from,
            message,
        };

        let first = self
            .brackets
            .first()
            .ok_or_else(|| invalid("table has no brackets".to_string()))?;
        if first.lower() != Decimal::ZERO {
            return Err(invalid(format!(
                "first bracket starts at {} instead of 0",
                first.lower()
            )));
        }

        for pair in self.brackets.windows(2) {
            let upper = pair[0].upper().ok_or_else(|| {
                invalid("only the last bracket may be open-ended".to_string())
            })?;
            if upper != pair[1].lower() {
                return Err(invalid(format!(
                    "gap or overlap between brackets at {} and {}",
                    upper,
                    pair[1].lower()
                )));
            }
        }

        let last = self.brackets.last().expect("non-empty checked above");
        if last.upper().is_some() {
            return Err(invalid("last bracket must be open-ended".to_string()));
        }
        Ok(())
    }

    /// Finds the bracket whose `[lower, upper)` range contains `salary`.
    ///
    /// A boundary salary equal to a bracket's lower bound resolves to that
    /// bracket, not the previous one. Returns `None` only for salaries below
    /// the first bracket, which a validated table rules out for non-negative
    /// salaries.
    pub fn bracket_for(&self, salary: Decimal) -> Option<&B> {
        self.brackets.iter().find(|b| b.contains(salary))
    }
}

/// All configured versions of one contribution type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSet<B> {
    versions: Vec<TableVersion<B>>,
}

impl<B> Default for TableSet<B> {
    fn default() -> Self {
        TableSet {
            versions: Vec::new(),
        }
    }
}

impl<B: SalaryBracket> TableSet<B> {
    /// Builds a set from versions, sorted oldest first.
    pub fn new(mut versions: Vec<TableVersion<B>>) -> Self {
        versions.sort_by(|a, b| a.effective_from.cmp(&b.effective_from));
        TableSet { versions }
    }

    /// Adds a version, keeping the effective-date ordering.
    pub fn push(&mut self, version: TableVersion<B>) {
        self.versions.push(version);
        self.versions
            .sort_by(|a, b| a.effective_from.cmp(&b.effective_from));
    }

    /// Returns true when no version is configured at all.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Selects the version with the greatest `effective_from` on or before
    /// `date`, or `None` when the type is not configured for that date.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::contributions::{ShareBracket, ShareRule, TableSet, TableVersion};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let bracket = ShareBracket {
    ///     lower: Decimal::ZERO,
    ///     upper: None,
    ///     rule: ShareRule::Fixed {
    ///         employee: Decimal::new(10000, 2),
    ///         employer: Decimal::new(20000, 2),
    ///     },
    /// };
    /// let set = TableSet::new(vec![TableVersion {
    ///     effective_from: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
    ///     brackets: vec![bracket],
    /// }]);
    ///
    /// let mid_2022 = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
    /// assert!(set.version_for(mid_2022).is_some());
    /// let before = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    /// assert!(set.version_for(before).is_none());
    /// ```
    pub fn version_for(&self, date: NaiveDate) -> Option<&TableVersion<B>> {
        // Versions are sorted by effective_from ascending; take the most
        // recent one on or before the query date.
        self.versions.iter().rfind(|v| v.effective_from <= date)
    }

    /// Validates every version in the set.
    pub fn validate(&self, table: &str) -> EngineResult<()> {
        for version in &self.versions {
            version.validate(table)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn fixed(employee: &str, employer: &str) -> ShareRule {
        ShareRule::Fixed {
            employee: dec(employee),
            employer: dec(employer),
        }
    }

    fn three_bracket_version(effective_from: &str) -> TableVersion<ShareBracket> {
        TableVersion {
            effective_from: date(effective_from),
            brackets: vec![
                ShareBracket {
                    lower: dec("0"),
                    upper: Some(dec("10000")),
                    rule: fixed("100", "200"),
                },
                ShareBracket {
                    lower: dec("10000"),
                    upper: Some(dec("20000")),
                    rule: fixed("200", "400"),
                },
                ShareBracket {
                    lower: dec("20000"),
                    upper: None,
                    rule: fixed("300", "600"),
                },
            ],
        }
    }

    /// TBL-001: version selection picks the latest on-or-before date
    #[test]
    fn test_version_selection() {
        let set = TableSet::new(vec![
            three_bracket_version("2023-01-01"),
            three_bracket_version("2022-01-01"),
        ]);

        let picked = set.version_for(date("2022-06-01")).unwrap();
        assert_eq!(picked.effective_from, date("2022-01-01"));

        let picked = set.version_for(date("2023-01-01")).unwrap();
        assert_eq!(picked.effective_from, date("2023-01-01"));
    }

    /// TBL-002: dates before every version yield "not configured"
    #[test]
    fn test_not_configured_before_first_version() {
        let set = TableSet::new(vec![three_bracket_version("2022-01-01")]);
        assert!(set.version_for(date("2021-01-01")).is_none());
    }

    /// TBL-003: boundary salaries resolve to the bracket whose lower bound
    /// equals the salary
    #[test]
    fn test_boundary_salary_goes_to_upper_bracket() {
        let version = three_bracket_version("2022-01-01");
        let bracket = version.bracket_for(dec("10000")).unwrap();
        assert_eq!(bracket.lower, dec("10000"));
    }

    /// TBL-004: the top bracket is unbounded
    #[test]
    fn test_open_ended_top_bracket() {
        let version = three_bracket_version("2022-01-01");
        let bracket = version.bracket_for(dec("5000000")).unwrap();
        assert_eq!(bracket.lower, dec("20000"));
    }

    /// TBL-005: validation rejects gaps
    #[test]
    fn test_validate_rejects_gap() {
        let version = TableVersion {
            effective_from: date("2022-01-01"),
            brackets: vec![
                ShareBracket {
                    lower: dec("0"),
                    upper: Some(dec("10000")),
                    rule: fixed("100", "200"),
                },
                ShareBracket {
                    lower: dec("15000"),
                    upper: None,
                    rule: fixed("300", "600"),
                },
            ],
        };
        let err = version.validate("sss").unwrap_err();
        assert!(err.to_string().contains("gap or overlap"));
    }

    /// TBL-006: validation rejects a closed top bracket
    #[test]
    fn test_validate_rejects_closed_top() {
        let version = TableVersion {
            effective_from: date("2022-01-01"),
            brackets: vec![ShareBracket {
                lower: dec("0"),
                upper: Some(dec("10000")),
                rule: fixed("100", "200"),
            }],
        };
        assert!(version.validate("sss").is_err());
    }

    /// TBL-007: validation rejects a nonzero first lower bound
    #[test]
    fn test_validate_rejects_nonzero_start() {
        let version = TableVersion {
            effective_from: date("2022-01-01"),
            brackets: vec![ShareBracket {
                lower: dec("1000"),
                upper: None,
                rule: fixed("100", "200"),
            }],
        };
        let err = version.validate("sss").unwrap_err();
        assert!(err.to_string().contains("instead of 0"));
    }

    /// TBL-008: rate rule applies to the actual salary, rounded half-up
    #[test]
    fn test_rate_rule_rounding() {
        let bracket = ShareBracket {
            lower: dec("0"),
            upper: None,
            rule: ShareRule::RateOfSalary {
                employee_rate: dec("0.025"),
                employer_rate: dec("0.025"),
            },
        };
        let share = bracket.compute(dec("18333.33"));
        // 18333.33 * 0.025 = 458.33325 -> 458.33
        assert_eq!(share.employee_share, dec("458.33"));
        assert_eq!(share.total, dec("916.66"));
    }

    /// TBL-009: repeated lookups with the same input are bit-identical
    #[test]
    fn test_lookup_idempotence() {
        let version = three_bracket_version("2022-01-01");
        let a = version.bracket_for(dec("12345.67")).unwrap().compute(dec("12345.67"));
        let b = version.bracket_for(dec("12345.67")).unwrap().compute(dec("12345.67"));
        assert_eq!(a, b);
    }

    proptest! {
        /// For every non-negative salary, exactly one bracket of a valid
        /// table matches.
        #[test]
        fn prop_bracket_coverage(cents in 0i64..50_000_000) {
            let salary = Decimal::new(cents, 2);
            let version = three_bracket_version("2022-01-01");
            version.validate("sss").unwrap();
            let matching = version
                .brackets
                .iter()
                .filter(|b| b.contains(salary))
                .count();
            prop_assert_eq!(matching, 1);
        }
    }
}
