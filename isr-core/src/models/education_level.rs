use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// School levels whose tuition is deductible, each with its own ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[serde(alias = "preescolar")]
    Preschool,
    #[serde(alias = "primaria")]
    Elementary,
    #[serde(alias = "secundaria")]
    MiddleSchool,
    #[serde(alias = "profesional_tecnico")]
    TechnicalSchool,
    #[serde(alias = "preparatoria")]
    HighSchool,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 5] = [
        Self::Preschool,
        Self::Elementary,
        Self::MiddleSchool,
        Self::TechnicalSchool,
        Self::HighSchool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preschool => "preschool",
            Self::Elementary => "elementary",
            Self::MiddleSchool => "middle_school",
            Self::TechnicalSchool => "technical_school",
            Self::HighSchool => "high_school",
        }
    }
}

/// One amount per [`EducationLevel`].
///
/// Used both for the per-level tuition ceilings of a fiscal year and for
/// the tuition a taxpayer paid. Every level is always present, so a level
/// without a ceiling is an explicit zero rather than a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuitionByLevel {
    #[serde(alias = "preescolar")]
    pub preschool: Decimal,
    #[serde(alias = "primaria")]
    pub elementary: Decimal,
    #[serde(alias = "secundaria")]
    pub middle_school: Decimal,
    #[serde(alias = "profesional_tecnico")]
    pub technical_school: Decimal,
    #[serde(alias = "preparatoria")]
    pub high_school: Decimal,
}

/// Per-level deductible tuition ceilings.
pub type TuitionCaps = TuitionByLevel;

/// Per-level tuition paid by a taxpayer.
pub type TuitionPayments = TuitionByLevel;

impl TuitionByLevel {
    pub fn get(
        &self,
        level: EducationLevel,
    ) -> Decimal {
        match level {
            EducationLevel::Preschool => self.preschool,
            EducationLevel::Elementary => self.elementary,
            EducationLevel::MiddleSchool => self.middle_school,
            EducationLevel::TechnicalSchool => self.technical_school,
            EducationLevel::HighSchool => self.high_school,
        }
    }

    pub fn get_mut(
        &mut self,
        level: EducationLevel,
    ) -> &mut Decimal {
        match level {
            EducationLevel::Preschool => &mut self.preschool,
            EducationLevel::Elementary => &mut self.elementary,
            EducationLevel::MiddleSchool => &mut self.middle_school,
            EducationLevel::TechnicalSchool => &mut self.technical_school,
            EducationLevel::HighSchool => &mut self.high_school,
        }
    }

    /// Builder-style setter, handy for single-level inputs.
    pub fn with(
        mut self,
        level: EducationLevel,
        amount: Decimal,
    ) -> Self {
        *self.get_mut(level) = amount;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (EducationLevel, Decimal)> + '_ {
        EducationLevel::ALL
            .into_iter()
            .map(|level| (level, self.get(level)))
    }

    pub fn total(&self) -> Decimal {
        self.iter().map(|(_, amount)| amount).sum()
    }
}
