//! Declarative keyword-weight model.
//!
//! A [`WeightModel`] is an ordered list of rules, each a set of lowercase
//! trigger substrings and a weight. A rule fires at most once per text
//! blob, however many of its triggers occur. Weights may be negative to
//! push distractor pages (films, games, social media) down the ranking.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Built-in bilingual (English / Traditional Chinese) rules for the sitcom
/// *Friends*: cast, crew and venue terms score up, distractors score down.
const FRIENDS_RULES: &[(&[&str], f64)] = &[
    (&["friends", "six friends", "六人行"], 3.0),
    (&["rachel"], 2.5),
    (&["monica"], 2.5),
    (&["chandler"], 2.0),
    (&["joey"], 2.0),
    (&["phoebe"], 2.0),
    (&["ross"], 2.0),
    (&["central perk", "中央咖啡館"], 2.0),
    (&["liu renxing", "六人行"], 1.5),
    (&["eric ascieline", "eric ascièline"], 2.5),
    (&["david crane"], 2.5),
    (&["lao you ji", "老友記"], 3.0),
    (&["sitcom", "情境喜劇"], 2.5),
    (&["emmy", "艾美獎"], 1.0),
    (&["actor", "演員"], 1.0),
    (&["fictional character", "虛構角色"], 1.5),
    (&["usa", "美國"], 2.0),
    (&["new york", "紐約"], 2.0),
    (&["hollywood", "好萊塢"], 1.5),
    (&["apartment", "公寓"], 2.0),
    (&["中央公園"], 2.0),
    (&["friend", "朋友", "老友"], 2.0),
    (&["season", "季"], 1.0),
    (&["movie", "電影"], -3.0),
    (&["model", "模特兒"], -3.0),
    (&["italy", "義大利"], -1.0),
    (&["instagram"], -3.0),
    (&["facebook"], -3.0),
    (&["university", "大學"], -1.0),
    (&["animation", "動畫"], -2.0),
    (&["game", "遊戲"], -2.0),
    (&["sport", "運動"], -1.0),
];

/// One `(trigger set, weight)` rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRule {
    /// Lowercase substrings; any one of them fires the rule.
    pub triggers: Vec<String>,
    /// Added to the score when the rule fires.
    pub weight: f64,
}

impl WeightRule {
    /// Build a rule, lowercasing every trigger.
    pub fn new<I, S>(triggers: I, weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            triggers: triggers
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
            weight,
        }
    }

    /// Whether any trigger occurs in `lowered`, which must already be lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t.as_str()))
    }
}

/// Ordered set of weight rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WeightRule>", into = "Vec<WeightRule>")]
pub struct WeightModel {
    rules: Vec<WeightRule>,
}

impl WeightModel {
    /// Build a model from rules; triggers are normalised to lowercase.
    pub fn new(rules: Vec<WeightRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| WeightRule::new(rule.triggers, rule.weight))
            .collect();
        Self { rules }
    }

    /// The built-in *Friends* table.
    pub fn friends() -> Self {
        Self::new(
            FRIENDS_RULES
                .iter()
                .map(|(triggers, weight)| WeightRule::new(triggers.iter(), *weight))
                .collect(),
        )
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[WeightRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the model has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sum of the weights of every rule firing on `lowered`.
    pub fn score_lowered(&self, lowered: &str) -> f64 {
        self.rules
            .iter()
            .filter(|rule| rule.matches(lowered))
            .map(|rule| rule.weight)
            .sum()
    }

    /// Rejects empty triggers (they would match every text) and non-finite weights.
    pub fn validate(&self) -> Result<(), SearchError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.triggers.is_empty() || rule.triggers.iter().any(|t| t.is_empty()) {
                return Err(SearchError::Config(format!(
                    "weight rule {index} has an empty trigger"
                )));
            }
            if !rule.weight.is_finite() {
                return Err(SearchError::Config(format!(
                    "weight rule {index} has a non-finite weight"
                )));
            }
        }
        Ok(())
    }
}

impl Default for WeightModel {
    fn default() -> Self {
        Self::friends()
    }
}

impl From<Vec<WeightRule>> for WeightModel {
    fn from(rules: Vec<WeightRule>) -> Self {
        Self::new(rules)
    }
}

impl From<WeightModel> for Vec<WeightRule> {
    fn from(model: WeightModel) -> Self {
        model.rules
    }
}
