// src/generator.rs

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::AppError;
use crate::models::question::{CHOICE_LETTERS, PoolQuestion};
use crate::models::variant::{DisplayChoice, TestVersion, VariantQuestion};
use crate::utils::rng::{SplitMix64, seeded_shuffle};

/// Number of fixed exam versions.
pub const VERSION_COUNT: u32 = 4;

/// Questions per exam version.
pub const QUESTIONS_PER_VERSION: usize = 40;

/// Seed for one version's question shuffle: 11000, 12000, 13000, 14000.
fn version_seed(version: u32) -> u64 {
    10_000 + 1_000 * version as u64
}

/// Read-only source of the question pool.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the entire pool, sorted by prompt text ascending, so the input
    /// order never depends on store iteration order.
    async fn fetch_all(&self) -> Result<Vec<PoolQuestion>, AppError>;
}

/// Builds and caches the four fixed exam versions.
///
/// All four versions are derived from the pool on the first
/// `test_version` call and cached for the lifetime of the generator;
/// concurrent first calls await the same in-flight build, and a failed
/// build is not cached. The cache is process-local and rebuilt from
/// scratch after a restart.
pub struct ExamGenerator {
    source: Arc<dyn QuestionSource>,
    shuffle_choices: bool,
    cache: OnceCell<Vec<Arc<TestVersion>>>,
}

impl ExamGenerator {
    pub fn new(source: Arc<dyn QuestionSource>, shuffle_choices: bool) -> Self {
        Self {
            source,
            shuffle_choices,
            cache: OnceCell::new(),
        }
    }

    /// Returns the n-th exam version (1-indexed, n in 1..=4), building all
    /// four from the pool on first use.
    pub async fn test_version(&self, version: u32) -> Result<Arc<TestVersion>, AppError> {
        if !(1..=VERSION_COUNT).contains(&version) {
            return Err(AppError::InvalidVariant(version));
        }

        let versions = self.cache.get_or_try_init(|| self.build_all()).await?;
        Ok(Arc::clone(&versions[(version - 1) as usize]))
    }

    /// Drop the cached versions so the next call rebuilds from the pool.
    /// Intended for tests and cache invalidation by an owner holding
    /// exclusive access.
    pub fn reset(&mut self) {
        self.cache = OnceCell::new();
    }

    async fn build_all(&self) -> Result<Vec<Arc<TestVersion>>, AppError> {
        let pool = self.source.fetch_all().await?;

        if pool.is_empty() {
            return Err(AppError::PoolUnavailable(
                "no questions found in the question bank".to_string(),
            ));
        }
        if pool.len() < QUESTIONS_PER_VERSION {
            return Err(AppError::PoolExhausted {
                needed: QUESTIONS_PER_VERSION,
                available: pool.len(),
            });
        }

        let decoded: Vec<PoolQuestion> = pool.into_iter().map(PoolQuestion::decoded).collect();

        let versions: Vec<Arc<TestVersion>> = (1..=VERSION_COUNT)
            .map(|v| Arc::new(build_version(&decoded, v, self.shuffle_choices)))
            .collect();

        tracing::info!(
            pool_size = decoded.len(),
            shuffle_choices = self.shuffle_choices,
            "built {} exam versions",
            versions.len()
        );

        Ok(versions)
    }
}

/// Build one version: seeded shuffle of the full pool, first 40 questions,
/// display numbers 1..=40. Versions reshuffle the same pool independently,
/// so two versions may share questions.
fn build_version(pool: &[PoolQuestion], version: u32, shuffle_choices: bool) -> TestVersion {
    let seed = version_seed(version);

    let mut shuffled: Vec<&PoolQuestion> = pool.iter().collect();
    seeded_shuffle(&mut shuffled, &mut SplitMix64::new(seed));

    let questions = shuffled
        .into_iter()
        .take(QUESTIONS_PER_VERSION)
        .enumerate()
        .map(|(idx, q)| derive_question(q, (idx + 1) as u8, seed, shuffle_choices))
        .collect();

    TestVersion { version, questions }
}

/// Derive the displayed form of one question. With shuffling on, the four
/// choice texts are permuted with a seed unique to (version, display
/// number) and the correct letter is recomputed by matching the originally
/// correct text; with shuffling off, slots and letter stay as imported.
fn derive_question(
    q: &PoolQuestion,
    number: u8,
    version_seed: u64,
    shuffle_choices: bool,
) -> VariantQuestion {
    let mut texts: Vec<String> = q.choices().iter().map(|s| s.to_string()).collect();

    if shuffle_choices {
        seeded_shuffle(&mut texts, &mut SplitMix64::new(version_seed + number as u64));
    }

    let choices: Vec<DisplayChoice> = CHOICE_LETTERS
        .iter()
        .zip(texts)
        .map(|(letter, text)| DisplayChoice {
            letter: (*letter).to_string(),
            text,
        })
        .collect();

    let correct = if shuffle_choices {
        shuffled_correct_letter(q, &choices, number)
    } else {
        q.correct.clone()
    };

    VariantQuestion {
        number,
        prompt: q.prompt.clone(),
        choices,
        original_correct: q.correct.clone(),
        correct,
    }
}

/// The slot letter whose text equals the originally correct option's text.
/// A missing match means the bank row is inconsistent; the original letter
/// is kept and the inconsistency is logged instead of silently trusted.
fn shuffled_correct_letter(q: &PoolQuestion, choices: &[DisplayChoice], number: u8) -> String {
    let Some(correct_text) = q.choice_text(&q.correct) else {
        tracing::warn!(
            question = number,
            letter = %q.correct,
            "marked correct letter is not a valid slot, keeping it unchanged"
        );
        return q.correct.clone();
    };

    match choices.iter().find(|c| c.text == correct_text) {
        Some(choice) => choice.letter.clone(),
        None => {
            tracing::warn!(
                question = number,
                "no shuffled choice matches the marked correct text, keeping original letter"
            );
            q.correct.clone()
        }
    }
}
