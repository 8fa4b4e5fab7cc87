//! Keyword-based sentiment tagging for headlines
//!
//! Classification is an ordered list of rules: the first rule with a keyword
//! contained in the lowercased headline decides the label, and a headline no
//! rule matches is `Neutral`. Keyword sets are injected at construction so
//! callers (and tests) can swap them without touching shared state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NewsError, Result};

/// Coarse sentiment label attached to every article record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Alarm,
    Opportunity,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Alarm => "alarm",
            Sentiment::Opportunity => "opportunity",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ALARM_KEYWORDS: &[&str] = &[
    "warning", "drop", "crash", "concern", "risk", "loss", "decline", "bear", "fear",
    "sell-off", "plunge", "volatile", "lawsuit", "investigation", "fraud", "scandal",
    "downturn", "recession", "layoff", "cut", "regulation", "ban", "fine", "penalty",
    "recall", "hack", "breach", "scare", "shortfall", "miss", "disappoint", "collapse",
    "bubble", "panic", "fire", "explosion", "shutdown", "delay", "deficit", "probe",
    "scam", "controversy",
];

pub const OPPORTUNITY_KEYWORDS: &[&str] = &[
    "gain", "buy", "strong", "growth", "opportunity", "bull", "rally", "surge", "record",
    "profit", "beat", "outperform", "expansion", "innovation", "launch", "acquire",
    "merger", "deal", "partnership", "investment", "funding", "award", "win", "approval",
    "breakthrough", "milestone", "success", "upgrade", "positive", "recovery", "rebound",
    "hire", "open", "increase", "rise", "improve", "boost", "lead", "advance", "soar",
    "skyrocket", "all-time high", "top", "best", "strongest", "record-breaking",
];

/// The two keyword families, as loaded from config or the built-in lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSet {
    pub alarm: Vec<String>,
    pub opportunity: Vec<String>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            alarm: ALARM_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            opportunity: OPPORTUNITY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeywordSet {
    /// Lowercase and de-duplicate both sets, keeping first-seen order,
    /// and reject a keyword that belongs to both.
    pub fn normalized(&self) -> Result<Self> {
        let normalized = self.deduped();

        if let Some(shared) = normalized
            .alarm
            .iter()
            .find(|k| normalized.opportunity.contains(*k))
        {
            return Err(NewsError::OverlappingKeywords(shared.clone()).into());
        }

        Ok(normalized)
    }

    fn deduped(&self) -> Self {
        Self {
            alarm: normalize_keywords(&self.alarm),
            opportunity: normalize_keywords(&self.opportunity),
        }
    }

    /// Rules in evaluation order: alarm first, then opportunity
    fn into_rules(self) -> Vec<Rule> {
        vec![
            Rule::new(Sentiment::Alarm, self.alarm),
            Rule::new(Sentiment::Opportunity, self.opportunity),
        ]
    }
}

fn normalize_keywords(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for keyword in raw {
        let lowered = keyword.trim().to_lowercase();
        if lowered.is_empty() || out.contains(&lowered) {
            continue;
        }
        out.push(lowered);
    }
    out
}

/// One (label, keywords) rule. Matches when any keyword is a substring of
/// the already-lowercased headline; there is no word-boundary check.
#[derive(Debug, Clone)]
pub struct Rule {
    label: Sentiment,
    keywords: Vec<String>,
}

impl Rule {
    pub fn new(label: Sentiment, keywords: Vec<String>) -> Self {
        Self { label, keywords }
    }

    pub fn label(&self) -> Sentiment {
        self.label
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw.as_str()))
    }
}

/// Ordered first-match-wins classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<Rule>,
}

impl KeywordClassifier {
    /// Build the alarm/opportunity classifier from a keyword set
    pub fn new(keywords: &KeywordSet) -> Result<Self> {
        Ok(Self::from_rules(keywords.normalized()?.into_rules()))
    }

    /// Build from an explicit rule list; rules are tried in the given order
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Label a headline. Total: any input, including sentinels and the
    /// empty string, yields exactly one label.
    pub fn classify(&self, headline: &str) -> Sentiment {
        let lowered = headline.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(Rule::label)
            .unwrap_or(Sentiment::Neutral)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::from_rules(KeywordSet::default().deduped().into_rules())
    }
}
