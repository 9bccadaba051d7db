//! Lexicon-based sentiment scoring.
//!
//! Each known word carries a polarity in [-1, 1] and a subjectivity in [0, 1].
//! A text scores as the mean over the words it contains, after applying any
//! intensifier ("very good") or negation ("not good") directly preceding a word.

use crate::domain::model::Sentiment;
use crate::domain::ports::SentimentAnalyzer;
use crate::utils::error::{EtlError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("valid token regex"));

// (word, polarity, subjectivity)
const BUILTIN_LEXICON: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.667),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("boring", -1.0, 1.0),
    ("bright", 0.7, 0.9),
    ("broken", -0.4, 0.4),
    ("calm", 0.3, 0.75),
    ("cheap", 0.4, 0.7),
    ("clear", 0.1, 0.383),
    ("collapse", -0.4, 0.6),
    ("crazy", -0.6, 0.9),
    ("crisis", -0.5, 0.6),
    ("dangerous", -0.6, 0.9),
    ("dead", -0.2, 0.4),
    ("decline", -0.3, 0.4),
    ("difficult", -0.5, 1.0),
    ("dirty", -0.6, 0.8),
    ("disappointed", -0.75, 0.75),
    ("disaster", -0.8, 0.8),
    ("easy", 0.433, 0.833),
    ("economic", 0.2, 0.2),
    ("excellent", 1.0, 1.0),
    ("excited", 0.375, 0.75),
    ("expensive", -0.5, 0.7),
    ("fail", -0.5, 0.3),
    ("failed", -0.5, 0.3),
    ("fair", 0.7, 0.9),
    ("fake", -0.5, 1.0),
    ("false", -0.4, 0.6),
    ("fantastic", 0.4, 0.9),
    ("fine", 0.417, 0.5),
    ("free", 0.4, 0.8),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 0.75),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("growth", 0.3, 0.3),
    ("happy", 0.8, 1.0),
    ("hard", -0.292, 0.542),
    ("hate", -0.8, 0.9),
    ("healthy", 0.5, 0.5),
    ("high", 0.16, 0.54),
    ("hope", 0.4, 0.6),
    ("horrible", -1.0, 1.0),
    ("important", 0.4, 1.0),
    ("impressive", 1.0, 1.0),
    ("inflation", -0.2, 0.3),
    ("interesting", 0.5, 0.5),
    ("kind", 0.6, 0.9),
    ("lazy", -0.25, 1.0),
    ("loss", -0.4, 0.4),
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("low", 0.0, 0.3),
    ("lucky", 0.333, 1.0),
    ("mad", -0.625, 1.0),
    ("negative", -0.3, 0.4),
    ("new", 0.136, 0.455),
    ("nice", 0.6, 1.0),
    ("pathetic", -1.0, 1.0),
    ("perfect", 1.0, 1.0),
    ("pleased", 0.5, 0.9),
    ("poor", -0.4, 0.6),
    ("positive", 0.227, 0.545),
    ("pretty", 0.25, 1.0),
    ("proud", 0.8, 1.0),
    ("recession", -0.4, 0.5),
    ("rich", 0.375, 0.625),
    ("risky", -0.4, 0.8),
    ("sad", -0.5, 1.0),
    ("safe", 0.5, 0.5),
    ("scary", -0.5, 1.0),
    ("serious", -0.333, 0.667),
    ("sick", -0.714, 0.857),
    ("slow", -0.3, 0.4),
    ("smart", 0.214, 0.643),
    ("stable", 0.3, 0.4),
    ("strong", 0.433, 0.733),
    ("stupid", -0.8, 1.0),
    ("success", 0.3, 0.3),
    ("successful", 0.75, 0.95),
    ("sure", 0.5, 0.889),
    ("terrible", -1.0, 1.0),
    ("thank", 0.2, 0.2),
    ("thanks", 0.2, 0.2),
    ("tough", -0.389, 0.833),
    ("true", 0.35, 0.65),
    ("ugly", -0.7, 1.0),
    ("unfair", -0.5, 0.75),
    ("unhappy", -0.6, 0.9),
    ("unstable", -0.2, 0.4),
    ("useful", 0.3, 0.0),
    ("useless", -0.5, 0.2),
    ("weak", -0.375, 0.625),
    ("welcome", 0.8, 0.9),
    ("wonderful", 1.0, 1.0),
    ("worried", -0.4, 0.6),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const BUILTIN_INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("pretty", 1.1),
    ("quite", 1.1),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.4),
    ("too", 1.2),
    ("totally", 1.4),
    ("very", 1.3),
];

const NEGATIONS: &[&str] = &["no", "not", "never", "without", "hardly", "nothing", "cannot"];

/// 否定詞翻轉並減半 polarity
const NEGATION_FACTOR: f64 = -0.5;

/// 連續強化詞累乘的上限
const MAX_INTENSITY: f64 = 4.0;

static BUILTIN: Lazy<LexiconAnalyzer> = Lazy::new(LexiconAnalyzer::builtin);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Polarity {
    polarity: f64,
    subjectivity: f64,
}

#[derive(Debug, Deserialize)]
struct LexiconEntry {
    word: String,
    polarity: f64,
    subjectivity: f64,
}

#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    words: HashMap<String, Polarity>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl LexiconAnalyzer {
    fn builtin() -> Self {
        let words = BUILTIN_LEXICON
            .iter()
            .map(|(word, polarity, subjectivity)| {
                (
                    word.to_string(),
                    Polarity {
                        polarity: *polarity,
                        subjectivity: *subjectivity,
                    },
                )
            })
            .collect();

        let intensifiers = BUILTIN_INTENSIFIERS
            .iter()
            .map(|(word, factor)| (word.to_string(), *factor))
            .collect();

        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();

        Self {
            words,
            intensifiers,
            negations,
        }
    }

    /// 讀取 `word,polarity,subjectivity` CSV 並覆寫內建詞庫
    pub fn with_overrides<R: Read>(mut self, reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut count = 0usize;

        for entry in csv_reader.deserialize::<LexiconEntry>() {
            let entry = entry?;
            for (name, value) in [
                ("polarity", entry.polarity),
                ("subjectivity", entry.subjectivity),
            ] {
                if !value.is_finite() {
                    return Err(EtlError::InvalidConfigValueError {
                        field: format!("lexicon.{}.{}", entry.word, name),
                        value: value.to_string(),
                        reason: "Lexicon scores must be finite numbers".to_string(),
                    });
                }
            }
            self.words.insert(
                entry.word.to_lowercase(),
                Polarity {
                    polarity: entry.polarity.clamp(-1.0, 1.0),
                    subjectivity: entry.subjectivity.clamp(0.0, 1.0),
                },
            );
            count += 1;
        }

        tracing::debug!("Loaded {} lexicon overrides", count);
        Ok(self)
    }

    pub fn from_csv_path(path: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::default().with_overrides(file)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.ends_with("n't")
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let mut assessments: Vec<Polarity> = Vec::new();
        let mut intensity = 1.0;
        let mut negated = false;

        for token in TOKEN.find_iter(&lowered) {
            let word = token.as_str();

            if self.is_negation(word) {
                negated = true;
                continue;
            }

            if let Some(entry) = self.words.get(word) {
                let mut polarity = entry.polarity * intensity;
                if negated {
                    polarity *= NEGATION_FACTOR;
                }
                assessments.push(Polarity {
                    polarity: polarity.clamp(-1.0, 1.0),
                    subjectivity: (entry.subjectivity * intensity).clamp(0.0, 1.0),
                });
            } else if let Some(factor) = self.intensifiers.get(word) {
                intensity = (intensity * factor).min(MAX_INTENSITY);
                continue;
            }

            intensity = 1.0;
            negated = false;
        }

        if assessments.is_empty() {
            return Sentiment::NEUTRAL;
        }

        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|a| a.polarity).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|a| a.subjectivity).sum::<f64>() / n;

        Sentiment {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        }
    }
}
