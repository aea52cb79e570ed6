// SPDX-License-Identifier: PMPL-1.0-or-later
//! Evaluation outcomes.
//!
//! Every candidate element terminates in exactly one [`Evaluation`]: there
//! are no fatal paths in this engine. Malformed styles degrade to a
//! conservative verdict (warning or inapplicable) instead of aborting the
//! batch. Evaluations are immutable once emitted and collected in document
//! order by [`EvaluationSet`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of evaluating one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Contrast requirement met
    Passed,
    /// Contrast requirement not met
    Failed,
    /// Needs human judgement; not programmatically verifiable
    Warning,
    /// The check does not apply to this element
    Inapplicable,
}

impl Verdict {
    /// Whether this outcome reports a definite contrast failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Passed => write!(f, "passed"),
            Verdict::Failed => write!(f, "failed"),
            Verdict::Warning => write!(f, "warning"),
            Verdict::Inapplicable => write!(f, "inapplicable"),
        }
    }
}

/// Stable identifier of the branch that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultCode {
    /// Element is not visible
    NotVisible,
    /// Element has no text
    NoText,
    /// Element is not a plain HTML content element
    NotHtmlElement,
    /// Element has a semantic role that inherits from widget
    WidgetRole,
    /// Element text is part of the label of a disabled widget
    DisabledWidgetLabel,
    /// Element has a group role and is disabled
    DisabledGroup,
    /// Foreground and background colors are identical
    EqualColors,
    /// Gradient background, all samples above the required ratio
    GradientContrastSufficient,
    /// Solid background, ratio above the required minimum
    ContrastSufficient,
    /// Text is not recognized as human language
    NonHumanText,
    /// Gradient background, a sample fell at or below the required ratio
    GradientContrastInsufficient,
    /// Solid background, ratio at or below the required minimum
    ContrastInsufficient,
    /// Raster image background; ratio cannot be computed
    ImageBackground,
    /// Gradient direction this engine does not evaluate
    UnverifiableGradient,
    /// Text shadow may supply the contrast on its own
    TextShadow,
    /// Foreground color syntax this engine does not parse
    UnparseableColor,
}

/// One immutable evaluation record for one element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Unique identifier
    pub id: Uuid,
    /// Source engine identifier
    pub source: String,
    /// Outcome
    pub verdict: Verdict,
    /// Branch that fired
    pub result_code: ResultCode,
    /// Human-readable description
    pub description: String,
    /// Pointer to the element in the source document
    pub element_pointer: Option<String>,
    /// When this evaluation was produced
    pub created_at: DateTime<Utc>,
}

impl Evaluation {
    /// Create a new evaluation record
    pub fn new(verdict: Verdict, result_code: ResultCode, description: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: "contrastbot".to_string(),
            verdict,
            result_code,
            description: description.to_string(),
            element_pointer: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the element pointer
    pub fn with_pointer(mut self, pointer: &str) -> Self {
        self.element_pointer = Some(pointer.to_string());
        self
    }
}

/// Ordered, append-only collection of evaluations for one page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationSet {
    /// All evaluations, in document order
    pub evaluations: Vec<Evaluation>,
}

impl EvaluationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an evaluation, preserving insertion order
    pub fn add(&mut self, evaluation: Evaluation) {
        self.evaluations.push(evaluation);
    }

    /// Evaluations with a given verdict
    pub fn by_verdict(&self, verdict: Verdict) -> Vec<&Evaluation> {
        self.evaluations.iter().filter(|e| e.verdict == verdict).collect()
    }

    /// Evaluations with a given result code
    pub fn by_code(&self, code: ResultCode) -> Vec<&Evaluation> {
        self.evaluations.iter().filter(|e| e.result_code == code).collect()
    }

    /// All passed evaluations
    pub fn passed(&self) -> Vec<&Evaluation> {
        self.by_verdict(Verdict::Passed)
    }

    /// All failed evaluations
    pub fn failed(&self) -> Vec<&Evaluation> {
        self.by_verdict(Verdict::Failed)
    }

    /// All warnings
    pub fn warnings(&self) -> Vec<&Evaluation> {
        self.by_verdict(Verdict::Warning)
    }

    /// Whether any element failed the contrast requirement
    pub fn has_failures(&self) -> bool {
        self.evaluations.iter().any(|e| e.verdict.is_failure())
    }

    /// Total count
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    /// Is empty
    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }
}
