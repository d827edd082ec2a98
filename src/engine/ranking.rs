use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::engine::scoring::{weighted_score, SawCoefficients, ScoreBreakdown};
use crate::engine::urgency::urgency;
use crate::engine::weight::{Classification, WeightPolicy, WeightResolver};
use crate::models::category::Category;
use crate::models::request::Request;
use crate::models::user::User;

#[derive(Debug, Error, PartialEq)]
pub enum RankingError {
    #[error("request {request_id} has weight {weight} outside [0, 1]")]
    WeightOutOfRange { request_id: Uuid, weight: f64 },

    #[error("invalid ranking settings: {0}")]
    InvalidSettings(String),
}

/// A request with its category and requester already loaded.
#[derive(Debug, Clone)]
pub struct RankCandidate {
    pub request: Request,
    pub category: Option<Category>,
    pub requester: Option<User>,
}

impl RankCandidate {
    fn classification(&self) -> Classification<'_> {
        Classification {
            category: self.category.as_ref(),
            type_label: self.request.request_type.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoredRequest {
    pub candidate: RankCandidate,
    pub breakdown: ScoreBreakdown,
    pub score: f64,
}

impl ScoredRequest {
    /// Human-readable classification: the category name, or the inline type
    /// label when there is no category.
    pub fn type_label(&self) -> Option<&str> {
        self.candidate
            .category
            .as_ref()
            .map(|category| category.name.as_str())
            .or(self.candidate.request.request_type.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub ranked: Vec<ScoredRequest>,
    /// Candidates whose classification did not resolve and were scored with
    /// weight 0.
    pub unresolved: usize,
}

pub struct Ranker {
    resolver: Box<dyn WeightResolver>,
    coefficients: SawCoefficients,
    horizon_days: i64,
}

impl Ranker {
    pub fn new(
        resolver: Box<dyn WeightResolver>,
        coefficients: SawCoefficients,
        horizon_days: i64,
    ) -> Result<Self, RankingError> {
        coefficients.validate().map_err(RankingError::InvalidSettings)?;

        if horizon_days <= 0 {
            return Err(RankingError::InvalidSettings(format!(
                "horizon must be > 0 days, got {horizon_days}"
            )));
        }

        Ok(Self {
            resolver,
            coefficients,
            horizon_days,
        })
    }

    pub fn policy(&self) -> WeightPolicy {
        self.resolver.policy()
    }

    /// Scores every candidate and orders them by descending score. Equal
    /// scores keep their input order.
    pub fn rank(
        &self,
        candidates: Vec<RankCandidate>,
        now: DateTime<Utc>,
    ) -> Result<RankingOutcome, RankingError> {
        let mut unresolved = 0;
        let mut ranked = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let weight = match self.resolver.resolve(&candidate.classification()) {
                Some(weight) => weight,
                None => {
                    debug!(
                        request_id = %candidate.request.id,
                        policy = %self.resolver.policy(),
                        "classification unresolved; scoring with weight 0"
                    );
                    unresolved += 1;
                    0.0
                }
            };

            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(RankingError::WeightOutOfRange {
                    request_id: candidate.request.id,
                    weight,
                });
            }

            let breakdown = ScoreBreakdown {
                weight,
                urgency: urgency(candidate.request.target_date, now, self.horizon_days),
            };
            let score = weighted_score(&breakdown, &self.coefficients);

            ranked.push(ScoredRequest {
                candidate,
                breakdown,
                score,
            });
        }

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(RankingOutcome { ranked, unresolved })
    }
}
