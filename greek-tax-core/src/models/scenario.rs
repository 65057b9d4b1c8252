use serde::{Deserialize, Serialize};

/// The five filing scenarios the engine can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Sole proprietorship.
    Individual,
    /// Incorporated company.
    Company,
    /// Sole proprietorship plus wage income.
    Employee,
    /// Sole proprietorship and company, taxed separately.
    IndividualCompany,
    /// Sole proprietorship, company and wage income.
    Full,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        Self::Individual,
        Self::Company,
        Self::Employee,
        Self::IndividualCompany,
        Self::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Company => "company",
            Self::Employee => "employee",
            Self::IndividualCompany => "individual_company",
            Self::Full => "full",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(Self::Individual),
            "company" => Some(Self::Company),
            "employee" => Some(Self::Employee),
            "individual_company" => Some(Self::IndividualCompany),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// Human readable title used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Individual => "Individual business",
            Self::Company => "Company",
            Self::Employee => "Individual business + wages",
            Self::IndividualCompany => "Individual business + company",
            Self::Full => "Full combination",
        }
    }

    /// Which input kinds the scenario needs, as `(individual, company, employee)`.
    pub fn required_inputs(&self) -> (bool, bool, bool) {
        match self {
            Self::Individual => (true, false, false),
            Self::Company => (false, true, false),
            Self::Employee => (true, false, true),
            Self::IndividualCompany => (true, true, false),
            Self::Full => (true, true, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_code() {
        for kind in ScenarioKind::ALL {
            assert_eq!(ScenarioKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!(ScenarioKind::parse("partnership"), None);
        assert_eq!(ScenarioKind::parse("Individual"), None);
    }

    #[test]
    fn full_scenario_requires_every_input_kind() {
        assert_eq!(ScenarioKind::Full.required_inputs(), (true, true, true));
        assert_eq!(
            ScenarioKind::Company.required_inputs(),
            (false, true, false)
        );
    }
}
