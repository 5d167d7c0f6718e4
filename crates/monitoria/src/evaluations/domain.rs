use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calls::CallId;
use crate::users::UserId;
use crate::wire::null_as_default;

/// Identifier wrapper for stored evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluationId(pub i64);

/// Highest value a criterion may take; 0 means "not scored yet".
pub const MAX_CRITERION_SCORE: u8 = 5;

/// The six aspects of a call that supervisors score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Greeting,
    Communication,
    ProblemResolution,
    Empathy,
    ProcedureCompliance,
    Closing,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Greeting,
        Criterion::Communication,
        Criterion::ProblemResolution,
        Criterion::Empathy,
        Criterion::ProcedureCompliance,
        Criterion::Closing,
    ];

    /// Field name on the wire.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Greeting => "greeting_score",
            Self::Communication => "communication_score",
            Self::ProblemResolution => "problem_resolution_score",
            Self::Empathy => "empathy_score",
            Self::ProcedureCompliance => "procedure_compliance_score",
            Self::Closing => "closing_score",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Greeting => "Greeting and introduction",
            Self::Communication => "Clarity and communication",
            Self::ProblemResolution => "Problem resolution",
            Self::Empathy => "Empathy and courtesy",
            Self::ProcedureCompliance => "Procedure compliance",
            Self::Closing => "Proper closing",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Greeting => "Appropriate greeting and clear identification",
            Self::Communication => "Clear, objective language",
            Self::ProblemResolution => "Effectiveness of the solution",
            Self::Empathy => "Attentive, human service",
            Self::ProcedureCompliance => "Adherence to documented processes",
            Self::Closing => "Professional wrap-up",
        }
    }
}

/// Per-criterion scores. Older servers send `problem_solving_score` and
/// `procedure_score`; both spellings decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScores {
    #[serde(rename = "greeting_score", default, deserialize_with = "null_as_default")]
    pub greeting: u8,
    #[serde(
        rename = "communication_score",
        default,
        deserialize_with = "null_as_default"
    )]
    pub communication: u8,
    #[serde(
        rename = "problem_resolution_score",
        alias = "problem_solving_score",
        default,
        deserialize_with = "null_as_default"
    )]
    pub problem_resolution: u8,
    #[serde(rename = "empathy_score", default, deserialize_with = "null_as_default")]
    pub empathy: u8,
    #[serde(
        rename = "procedure_compliance_score",
        alias = "procedure_score",
        default,
        deserialize_with = "null_as_default"
    )]
    pub procedure_compliance: u8,
    #[serde(rename = "closing_score", default, deserialize_with = "null_as_default")]
    pub closing: u8,
}

impl CriterionScores {
    pub fn uniform(score: u8) -> Self {
        Self {
            greeting: score,
            communication: score,
            problem_resolution: score,
            empathy: score,
            procedure_compliance: score,
            closing: score,
        }
    }

    /// Scores in [`Criterion::ALL`] order.
    pub fn from_array(values: [u8; 6]) -> Self {
        let [greeting, communication, problem_resolution, empathy, procedure_compliance, closing] =
            values;
        Self {
            greeting,
            communication,
            problem_resolution,
            empathy,
            procedure_compliance,
            closing,
        }
    }

    pub fn as_array(&self) -> [u8; 6] {
        [
            self.greeting,
            self.communication,
            self.problem_resolution,
            self.empathy,
            self.procedure_compliance,
            self.closing,
        ]
    }

    pub fn get(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::Greeting => self.greeting,
            Criterion::Communication => self.communication,
            Criterion::ProblemResolution => self.problem_resolution,
            Criterion::Empathy => self.empathy,
            Criterion::ProcedureCompliance => self.procedure_compliance,
            Criterion::Closing => self.closing,
        }
    }

    fn slot(&mut self, criterion: Criterion) -> &mut u8 {
        match criterion {
            Criterion::Greeting => &mut self.greeting,
            Criterion::Communication => &mut self.communication,
            Criterion::ProblemResolution => &mut self.problem_resolution,
            Criterion::Empathy => &mut self.empathy,
            Criterion::ProcedureCompliance => &mut self.procedure_compliance,
            Criterion::Closing => &mut self.closing,
        }
    }

    /// Sets a criterion. Passing 0 clears it.
    pub fn set(&mut self, criterion: Criterion, score: u8) -> Result<(), ScoreOutOfRange> {
        if score > MAX_CRITERION_SCORE {
            return Err(ScoreOutOfRange { criterion, score });
        }
        *self.slot(criterion) = score;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{} must be between 0 and 5, got {score}", criterion.key())]
pub struct ScoreOutOfRange {
    pub criterion: Criterion,
    pub score: u8,
}

/// Stored evaluation as returned by the server. `overall_score` is the
/// server's value and is never replaced by a local computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub call_id: CallId,
    #[serde(default)]
    pub evaluator_id: Option<UserId>,
    #[serde(default)]
    pub evaluator_name: Option<String>,
    #[serde(flatten)]
    pub scores: CriterionScores,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positive_points: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub improvement_points: String,
    #[serde(default)]
    pub general_comments: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_coaching: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_exemplary: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Form state for authoring an evaluation; also the request body for create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationDraft {
    #[serde(flatten)]
    pub scores: CriterionScores,
    pub positive_points: String,
    pub improvement_points: String,
    pub general_comments: String,
    pub requires_coaching: bool,
    pub is_exemplary: bool,
}

impl EvaluationDraft {
    /// Seeds the form from a stored evaluation; absent values become unset.
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self {
            scores: evaluation.scores,
            positive_points: evaluation.positive_points.clone(),
            improvement_points: evaluation.improvement_points.clone(),
            general_comments: evaluation.general_comments.clone().unwrap_or_default(),
            requires_coaching: evaluation.requires_coaching,
            is_exemplary: evaluation.is_exemplary,
        }
    }

    pub fn set_score(&mut self, criterion: Criterion, score: u8) -> Result<(), ScoreOutOfRange> {
        self.scores.set(criterion, score)
    }

    /// Local preview of the overall score; see [`super::compute_overall_score`].
    pub fn overall_score(&self) -> f64 {
        super::compute_overall_score(&self.scores)
    }
}

/// Body for `POST /evaluations`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateEvaluationRequest<'a> {
    pub call_id: CallId,
    #[serde(flatten)]
    pub draft: &'a EvaluationDraft,
}

/// Create/update responses arrive either wrapped with a message or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EvaluationEnvelope {
    Wrapped { evaluation: Evaluation },
    Bare(Evaluation),
}

impl EvaluationEnvelope {
    pub fn into_evaluation(self) -> Evaluation {
        match self {
            EvaluationEnvelope::Wrapped { evaluation } => evaluation,
            EvaluationEnvelope::Bare(evaluation) => evaluation,
        }
    }
}
