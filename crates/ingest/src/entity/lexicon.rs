//! Lexicon-feature person recognizer.
//!
//! Candidate spans are runs of capitalized tokens. Each span is scored by a
//! linear model over lexical features whose weights and threshold ship in a
//! JSON model file. Features: known given name, known surname, preceding
//! honorific, token count, sentence position and known non-person word.
//!
//! With the bundled weights a known surname alone is a person mid-sentence
//! but not at a sentence start, where capitalization carries no signal. An
//! unknown run of two or more capitalized words is a person mid-sentence.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::traits::{EntityError, EntityLabel, EntitySpan, PersonRecognizer};

const BUNDLED_MODEL: &str = include_str!("../../models/person_lexicon.json");

// ── Model ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FeatureWeights {
    #[serde(default)]
    pub bias: f32,
    pub given_name: f32,
    pub surname: f32,
    pub honorific: f32,
    pub multi_token: f32,
    /// Span does not open a sentence.
    #[serde(default)]
    pub mid_sentence: f32,
    pub sentence_initial_single: f32,
    pub non_person: f32,
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    name: String,
    version: String,
    threshold: f32,
    weights: FeatureWeights,
    given_names: Vec<String>,
    surnames: Vec<String>,
    #[serde(default)]
    honorifics: Vec<String>,
    #[serde(default)]
    particles: Vec<String>,
    #[serde(default)]
    stopwords: Vec<String>,
    #[serde(default)]
    non_person: Vec<String>,
}

/// A loaded, immutable person-name model.
#[derive(Debug, Clone)]
pub struct LexiconModel {
    name: String,
    version: String,
    threshold: f32,
    weights: FeatureWeights,
    given_names: HashSet<String>,
    surnames: HashSet<String>,
    honorifics: HashSet<String>,
    particles: HashSet<String>,
    stopwords: HashSet<String>,
    non_person: HashSet<String>,
}

fn lower_set(words: Vec<String>) -> HashSet<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

impl LexiconModel {
    /// The model compiled into the crate.
    pub fn bundled() -> Result<Self, EntityError> {
        Self::from_json(BUNDLED_MODEL)
    }

    pub fn load(path: &Path) -> Result<Self, EntityError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| EntityError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, EntityError> {
        let file: ModelFile = serde_json::from_str(raw)
            .map_err(|e| EntityError::ModelUnavailable(format!("invalid model file: {e}")))?;

        if file.given_names.is_empty() && file.surnames.is_empty() {
            return Err(EntityError::ModelUnavailable(format!(
                "model {} has no name lexicon",
                file.name
            )));
        }
        if !file.threshold.is_finite() {
            return Err(EntityError::ModelUnavailable(format!(
                "model {} has a non-finite threshold",
                file.name
            )));
        }

        Ok(Self {
            name: file.name,
            version: file.version,
            threshold: file.threshold,
            weights: file.weights,
            given_names: lower_set(file.given_names),
            surnames: lower_set(file.surnames),
            honorifics: lower_set(file.honorifics),
            particles: lower_set(file.particles),
            stopwords: lower_set(file.stopwords),
            non_person: lower_set(file.non_person),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Label every capitalized span in `text`.
    pub fn spans(&self, text: &str) -> Vec<EntitySpan> {
        let tokens = tokenize(text);
        let mut spans = Vec::new();
        let mut open = OpenSpan::default();
        let mut sentence_start = true;
        let mut after_honorific = false;

        for (i, tok) in tokens.iter().enumerate() {
            let lower = tok.core.to_lowercase();
            let at_sentence_start = sentence_start;

            if tok.leading_punct {
                self.close(&mut open, &tokens, text, &mut spans);
            }

            if is_capitalized(tok.core) && self.honorifics.contains(&lower) {
                self.close(&mut open, &tokens, text, &mut spans);
                after_honorific = true;
                // "Dr." and friends do not end a sentence.
                sentence_start = false;
                continue;
            }

            let initial = is_initial(tok) && !self.stopwords.contains(&lower);
            let candidate = initial || (is_capitalized(tok.core) && !self.stopwords.contains(&lower));

            if candidate {
                if open.tokens.is_empty() {
                    open.sentence_initial = at_sentence_start;
                    open.after_honorific = after_honorific;
                } else {
                    open.tokens.append(&mut open.particles);
                }
                open.tokens.push(i);
                after_honorific = false;
                sentence_start = !initial && ends_sentence(tok);
                if !initial && breaks_after(tok) {
                    self.close(&mut open, &tokens, text, &mut spans);
                }
                continue;
            }

            if !open.tokens.is_empty() && tok.trailing.is_empty() && self.particles.contains(&lower) {
                open.particles.push(i);
                sentence_start = false;
                continue;
            }

            self.close(&mut open, &tokens, text, &mut spans);
            after_honorific = false;
            sentence_start = ends_sentence(tok);
        }
        self.close(&mut open, &tokens, text, &mut spans);

        spans
    }

    /// Score and emit the open span, if any, then reset it.
    fn close(&self, open: &mut OpenSpan, tokens: &[Token<'_>], text: &str, spans: &mut Vec<EntitySpan>) {
        let span = std::mem::take(open);
        let (Some(&first), Some(&last)) = (span.tokens.first(), span.tokens.last()) else {
            return;
        };

        let words: Vec<String> = span
            .tokens
            .iter()
            .map(|&i| &tokens[i])
            .filter(|t| !is_initial(t))
            .map(|t| t.core.to_lowercase())
            .filter(|w| !self.particles.contains(w))
            .collect();
        let (Some(first_word), Some(last_word)) = (words.first(), words.last()) else {
            // Initials alone are not a name.
            return;
        };

        let w = &self.weights;
        let multi = span.tokens.len() >= 2;
        let mut score = w.bias;
        if self.given_names.contains(first_word) {
            score += w.given_name;
        }
        if self.surnames.contains(last_word) {
            score += w.surname;
        }
        if span.after_honorific {
            score += w.honorific;
        }
        if multi {
            score += w.multi_token;
        } else if span.sentence_initial {
            score += w.sentence_initial_single;
        }
        if !span.sentence_initial {
            score += w.mid_sentence;
        }
        if words.iter().any(|w| self.non_person.contains(w)) {
            score += w.non_person;
        }

        let (start, end) = (tokens[first].start, tokens[last].end);
        spans.push(EntitySpan {
            text: text[start..end].to_string(),
            label: if score >= self.threshold {
                EntityLabel::Person
            } else {
                EntityLabel::Other
            },
            start,
            end,
            score,
        });
    }
}

impl PersonRecognizer for LexiconModel {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        Ok(self.spans(text))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Tokens ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct OpenSpan {
    tokens: Vec<usize>,
    /// Lowercase particles ("van", "de") waiting for a following name token.
    particles: Vec<usize>,
    sentence_initial: bool,
    after_honorific: bool,
}

/// A whitespace-delimited token with surrounding punctuation split off.
/// `start..end` is the byte range of `core` in the source text.
#[derive(Debug)]
struct Token<'a> {
    core: &'a str,
    start: usize,
    end: usize,
    leading_punct: bool,
    trailing: &'a str,
    possessive: bool,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    for (i, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        if c.is_whitespace() {
            if let Some(s) = word_start.take() {
                tokens.push(split_token(text, s, i));
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    tokens
}

fn split_token(text: &str, start: usize, end: usize) -> Token<'_> {
    let raw = &text[start..end];
    let lead_trimmed = raw.trim_start_matches(|c: char| !c.is_alphanumeric());
    let core_start = start + (raw.len() - lead_trimmed.len());

    let mut core = lead_trimmed.trim_end_matches(|c: char| !c.is_alphanumeric());
    let mut possessive = false;
    for suffix in ["'s", "\u{2019}s"] {
        if let Some(stripped) = core.strip_suffix(suffix) {
            if !stripped.is_empty() {
                core = stripped;
                possessive = true;
                break;
            }
        }
    }
    let core_end = core_start + core.len();

    Token {
        core,
        start: core_start,
        end: core_end,
        leading_punct: core_start > start,
        trailing: &text[core_end..end],
        possessive,
    }
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

/// "J." in "J. K. Rowling".
fn is_initial(tok: &Token<'_>) -> bool {
    tok.core.chars().count() == 1 && is_capitalized(tok.core) && tok.trailing.starts_with('.')
}

fn ends_sentence(tok: &Token<'_>) -> bool {
    tok.trailing.contains(&['.', '!', '?'][..])
}

fn breaks_after(tok: &Token<'_>) -> bool {
    tok.possessive
        || ends_sentence(tok)
        || tok
            .trailing
            .contains(&[',', ';', ':', ')', ']', '"', '\u{201D}'][..])
}
