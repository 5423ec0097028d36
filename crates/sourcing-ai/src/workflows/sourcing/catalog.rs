use serde::{Deserialize, Serialize};

/// Tolerance applied when asserting that catalog weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Sub-range of [0,100] the AI recommendation generator draws from for a
/// criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub low: f64,
    pub high: f64,
}

impl ScoreBand {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }
}

/// A named, weighted dimension of vendor evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    /// Share of the weighted score, in (0, 1]. The active catalog's weights
    /// must sum to 1.0.
    pub weight: f64,
    pub description: String,
    pub ai_band: ScoreBand,
    /// Canned rationale pool the recommendation generator indexes into.
    pub rationales: Vec<String>,
}

/// Validation failures raised by the catalog constructor.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("criteria catalog must contain at least one criterion")]
    Empty,
    #[error("duplicate criterion name: {0}")]
    DuplicateName(String),
    #[error("criterion '{name}' weight {weight} outside (0, 1]")]
    WeightOutOfRange { name: String, weight: f64 },
    #[error("criterion weights sum to {sum}, expected 1.0 within {tolerance}")]
    WeightSum { sum: f64, tolerance: f64 },
}

/// Fixed, ordered list of scoring criteria for an evaluation session.
///
/// The constructor asserts the weight-sum invariant instead of trusting the
/// caller; a catalog that validates once stays valid because it is immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct CriteriaCatalog {
    criteria: Vec<Criterion>,
}

impl CriteriaCatalog {
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, CatalogError> {
        if criteria.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, criterion) in criteria.iter().enumerate() {
            if criterion.weight <= 0.0 || criterion.weight > 1.0 {
                return Err(CatalogError::WeightOutOfRange {
                    name: criterion.name.clone(),
                    weight: criterion.weight,
                });
            }
            if criteria[..index]
                .iter()
                .any(|earlier| earlier.name == criterion.name)
            {
                return Err(CatalogError::DuplicateName(criterion.name.clone()));
            }
        }

        let sum: f64 = criteria.iter().map(|criterion| criterion.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CatalogError::WeightSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(Self { criteria })
    }

    /// The canned procurement rubric used by the demo and as the service
    /// default.
    pub fn standard() -> Self {
        Self {
            criteria: standard_criteria(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| criterion.name == name)
    }

    pub fn weight_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(|criterion| criterion.weight)
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

fn rationales(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| (*line).to_string()).collect()
}

fn standard_criteria() -> Vec<Criterion> {
    vec![
        Criterion {
            name: "Price Competitiveness".to_string(),
            weight: 0.25,
            description: "Total cost of ownership relative to the event budget and peer bids."
                .to_string(),
            ai_band: ScoreBand::new(70.0, 95.0),
            rationales: rationales(&[
                "Quoted pricing sits below the median of comparable bids for this category.",
                "Unit economics are competitive once volume discounts are applied.",
                "Pricing is within budget but leaves limited room against the best offer.",
                "Landed cost benefits from favorable payment and freight terms.",
            ]),
        },
        Criterion {
            name: "Technical Capability".to_string(),
            weight: 0.20,
            description: "Fit of the proposed solution against the stated technical requirements."
                .to_string(),
            ai_band: ScoreBand::new(75.0, 95.0),
            rationales: rationales(&[
                "Proposal covers every mandatory requirement with demonstrated references.",
                "Solution architecture matches the requested integration surface.",
                "Capability statements are strong though two requirements rely on roadmap items.",
            ]),
        },
        Criterion {
            name: "Quality Assurance".to_string(),
            weight: 0.15,
            description: "Certifications, defect rates, and documented quality processes."
                .to_string(),
            ai_band: ScoreBand::new(72.0, 92.0),
            rationales: rationales(&[
                "Current ISO 9001 certification with audited defect rates below category norms.",
                "Quality manual and inspection records were provided and are consistent.",
                "QA program is adequate; corrective-action turnaround is slower than peers.",
            ]),
        },
        Criterion {
            name: "Delivery Timeline".to_string(),
            weight: 0.15,
            description: "Ability to meet the requested delivery schedule and ramp plan."
                .to_string(),
            ai_band: ScoreBand::new(68.0, 90.0),
            rationales: rationales(&[
                "Committed lead times beat the requested schedule with buffer.",
                "Delivery plan meets the schedule assuming no customs delays.",
                "Timeline is achievable but depends on a single production line.",
            ]),
        },
        Criterion {
            name: "Financial Stability".to_string(),
            weight: 0.10,
            description: "Balance-sheet strength and continuity risk over the contract term."
                .to_string(),
            ai_band: ScoreBand::new(70.0, 93.0),
            rationales: rationales(&[
                "Three years of audited statements show stable margins and low leverage.",
                "Credit profile is sound; concentration risk with one major customer.",
                "Financials are acceptable though working capital is tight for the ramp.",
            ]),
        },
        Criterion {
            name: "Past Performance".to_string(),
            weight: 0.10,
            description: "Track record on comparable contracts, including this organization."
                .to_string(),
            ai_band: ScoreBand::new(74.0, 94.0),
            rationales: rationales(&[
                "Prior awards with this organization closed on time and on budget.",
                "Reference checks report consistent service levels on similar scopes.",
                "Solid references, with one dispute resolved amicably last year.",
            ]),
        },
        Criterion {
            name: "Innovation".to_string(),
            weight: 0.05,
            description: "Differentiated capabilities or process improvements offered beyond the baseline."
                .to_string(),
            ai_band: ScoreBand::new(60.0, 88.0),
            rationales: rationales(&[
                "Proposal includes process automation that reduces our handling cost.",
                "Offers an improvement roadmap with shared-savings pricing.",
                "Meets the baseline; little differentiation beyond the requested scope.",
            ]),
        },
    ]
}
