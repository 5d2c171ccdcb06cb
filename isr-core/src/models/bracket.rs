use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance between one bracket's upper bound and the next bracket's lower
/// bound in the published monthly tables.
pub const BRACKET_GAP: Decimal = dec!(0.01);

/// One row of a monthly progressive ISR table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower_bound: Decimal,
    /// `None` marks the open-ended top bracket.
    pub upper_bound: Option<Decimal>,
    pub fixed_quota: Decimal,
    pub marginal_rate: Decimal,
}

/// Reasons a bracket list is rejected as a monthly schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("a monthly schedule needs at least one bracket")]
    Empty,

    #[error("first bracket starts at {0}, lower bounds must be non-negative")]
    NegativeLowerBound(Decimal),

    #[error("bracket {index} has upper bound {upper} below its lower bound {lower}")]
    InvertedBracket {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    #[error("last bracket must be unbounded so every base falls in a bracket")]
    NotExhaustive,

    #[error("bracket {index} has marginal rate {rate}, expected a value between 0 and 1")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} starts at {found}, expected {expected}")]
    Discontiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },
}

/// An ordered, contiguous and exhaustive list of monthly brackets.
///
/// Construction checks that each bracket starts exactly [`BRACKET_GAP`]
/// above the previous upper bound and that the final bracket is open-ended,
/// so lookups never have to deal with overlaps or holes wider than a cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bracket>", into = "Vec<Bracket>")]
pub struct MonthlySchedule {
    brackets: Vec<Bracket>,
}

impl MonthlySchedule {
    /// Validates `brackets` and wraps them.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] describing the first violated rule.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, ScheduleError> {
        validate(&brackets)?;
        Ok(Self { brackets })
    }

    /// Wraps brackets that are known to be valid (the shipped tables).
    pub(crate) fn from_published(brackets: Vec<Bracket>) -> Self {
        debug_assert_eq!(validate(&brackets), Ok(()));
        Self { brackets }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Finds the bracket for a monthly base.
    ///
    /// Uses the bracket with the greatest lower bound not above
    /// `monthly_base`. Bases inside the sub-cent gap between two published
    /// brackets stay in the lower one. Returns `None` for bases below the
    /// first lower bound.
    pub fn find(
        &self,
        monthly_base: Decimal,
    ) -> Option<&Bracket> {
        let idx = self
            .brackets
            .partition_point(|b| b.lower_bound <= monthly_base);

        if idx == 0 {
            None
        } else {
            self.brackets.get(idx - 1)
        }
    }
}

impl TryFrom<Vec<Bracket>> for MonthlySchedule {
    type Error = ScheduleError;

    fn try_from(brackets: Vec<Bracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<MonthlySchedule> for Vec<Bracket> {
    fn from(schedule: MonthlySchedule) -> Self {
        schedule.brackets
    }
}

fn validate(brackets: &[Bracket]) -> Result<(), ScheduleError> {
    let first = brackets.first().ok_or(ScheduleError::Empty)?;
    if first.lower_bound < Decimal::ZERO {
        return Err(ScheduleError::NegativeLowerBound(first.lower_bound));
    }

    let last_index = brackets.len() - 1;
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.marginal_rate < Decimal::ZERO || bracket.marginal_rate > Decimal::ONE {
            return Err(ScheduleError::RateOutOfRange {
                index,
                rate: bracket.marginal_rate,
            });
        }

        match bracket.upper_bound {
            Some(upper) if upper < bracket.lower_bound => {
                return Err(ScheduleError::InvertedBracket {
                    index,
                    lower: bracket.lower_bound,
                    upper,
                });
            }
            Some(_) if index == last_index => return Err(ScheduleError::NotExhaustive),
            None if index != last_index => {
                return Err(ScheduleError::UnboundedBeforeEnd { index });
            }
            _ => {}
        }
    }

    for (index, pair) in brackets.windows(2).enumerate() {
        // Unbounded-before-end was rejected above, so `pair[0]` is bounded.
        if let Some(upper) = pair[0].upper_bound {
            let expected = upper + BRACKET_GAP;
            if pair[1].lower_bound != expected {
                return Err(ScheduleError::Discontiguous {
                    index: index + 1,
                    expected,
                    found: pair[1].lower_bound,
                });
            }
        }
    }

    Ok(())
}
