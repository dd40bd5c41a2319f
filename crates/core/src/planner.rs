//! Budgeting, investing and saving helpers shown next to the chatbot.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlannerError {
    #[error("unknown risk appetite: {0}")]
    UnknownRisk(String),

    #[error("months must be between 1 and 24, got {0}")]
    InvalidMonths(u32),
}

//
// ─── BUDGET ────────────────────────────────────────────────────────────────────
//

/// Monthly income split by the 50/30/20 rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSplit {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

/// Split a monthly income; `None` when there is nothing to split.
#[must_use]
pub fn budget_split(income: f64) -> Option<BudgetSplit> {
    if !income.is_finite() || income <= 0.0 {
        return None;
    }
    Some(BudgetSplit {
        needs: income * 0.5,
        wants: income * 0.3,
        savings: income * 0.2,
    })
}

//
// ─── INVESTING ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskAppetite {
    Low,
    Medium,
    High,
}

impl RiskAppetite {
    #[must_use]
    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            RiskAppetite::Low => &["Government Bonds", "Savings Accounts", "Certificates of Deposit"],
            RiskAppetite::Medium => &["ETFs", "Balanced Funds", "Real Estate"],
            RiskAppetite::High => &["Stocks", "Crypto", "Startups"],
        }
    }
}

impl fmt::Display for RiskAppetite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskAppetite::Low => "Low",
            RiskAppetite::Medium => "Medium",
            RiskAppetite::High => "High",
        };
        f.write_str(label)
    }
}

impl FromStr for RiskAppetite {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(PlannerError::UnknownRisk(s.to_owned())),
        }
    }
}

//
// ─── SAVING ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsPlan {
    pub goal: String,
    pub months: u32,
    pub monthly: f64,
}

/// Monthly deposit needed to reach `amount` within `months`.
///
/// Returns `Ok(None)` when the goal is blank or the amount is not positive.
///
/// # Errors
///
/// Returns `PlannerError::InvalidMonths` outside `1..=24`.
pub fn savings_plan(goal: &str, amount: f64, months: u32) -> Result<Option<SavingsPlan>, PlannerError> {
    if !(1..=24).contains(&months) {
        return Err(PlannerError::InvalidMonths(months));
    }
    let goal = goal.trim();
    if goal.is_empty() || !amount.is_finite() || amount <= 0.0 {
        return Ok(None);
    }
    Ok(Some(SavingsPlan {
        goal: goal.to_owned(),
        months,
        monthly: amount / f64::from(months),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_follows_fifty_thirty_twenty() {
        let split = budget_split(3_000.0).unwrap();
        assert!((split.needs - 1_500.0).abs() < 1e-9);
        assert!((split.wants - 900.0).abs() < 1e-9);
        assert!((split.savings - 600.0).abs() < 1e-9);
        assert!(budget_split(0.0).is_none());
        assert!(budget_split(f64::NAN).is_none());
    }

    #[test]
    fn risk_parses_case_insensitively() {
        let risk: RiskAppetite = " MEDIUM ".parse().unwrap();
        assert_eq!(risk, RiskAppetite::Medium);
        assert_eq!(risk.suggestions()[0], "ETFs");
        assert!("yolo".parse::<RiskAppetite>().is_err());
    }

    #[test]
    fn savings_plan_divides_evenly() {
        let plan = savings_plan("Laptop", 1_200.0, 6).unwrap().unwrap();
        assert_eq!(plan.goal, "Laptop");
        assert!((plan.monthly - 200.0).abs() < 1e-9);

        assert_eq!(savings_plan(" ", 1_200.0, 6).unwrap(), None);
        assert_eq!(savings_plan("Laptop", 0.0, 6).unwrap(), None);
        assert_eq!(
            savings_plan("Laptop", 100.0, 25).unwrap_err(),
            PlannerError::InvalidMonths(25)
        );
    }
}
