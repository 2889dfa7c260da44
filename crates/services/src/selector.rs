use rand::Rng;
use rand::rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::{HashSet, VecDeque};

use sight_core::model::{ProgressBook, Tier, WordBank};

/// Default number of words in a practice session.
pub const DEFAULT_SESSION_LENGTH: usize = 12;

//
// ─── SELECTION PLAN ────────────────────────────────────────────────────────────
//

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    pub words: Vec<String>,
    pub weak_selected: usize,
    pub medium_selected: usize,
    pub strong_selected: usize,
}

impl SelectionPlan {
    /// Total number of words in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.words.len()
    }

    /// Returns true when no words were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

//
// ─── WORD LIST BUILDER ─────────────────────────────────────────────────────────
//

/// Builds an adaptive practice list biased toward the learner's weak words.
///
/// The bank is stratified into weak/medium/strong tiers from current
/// statistics, each tier contributes a proportional share of the list
/// (roughly 50/30/20), and the result is shuffled so tier structure never
/// leaks into presentation order. Quotas are recomputed fresh on every
/// build; nothing is persisted between calls.
pub struct WordListBuilder<'a> {
    bank: &'a WordBank,
    length: usize,
}

impl<'a> WordListBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a WordBank) -> Self {
        Self {
            bank,
            length: DEFAULT_SESSION_LENGTH,
        }
    }

    /// Override the session length.
    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Build a plan using the thread RNG.
    #[must_use]
    pub fn build(self, book: &ProgressBook) -> SelectionPlan {
        let mut rng = rng();
        self.build_with_rng(book, &mut rng)
    }

    /// Build a plan with a caller-supplied RNG for reproducible selection.
    ///
    /// Never returns an empty list while the bank is non-empty and the
    /// requested length is positive: underflow is resolved by drawing with
    /// repetition rather than erroring.
    #[must_use]
    pub fn build_with_rng<R: Rng + ?Sized>(
        self,
        book: &ProgressBook,
        rng: &mut R,
    ) -> SelectionPlan {
        let length = self.length;
        if self.bank.is_empty() || length == 0 {
            return SelectionPlan {
                words: Vec::new(),
                weak_selected: 0,
                medium_selected: 0,
                strong_selected: 0,
            };
        }

        // Cold start: nothing recorded yet, so a balanced random mix.
        if !book.has_any_attempts() {
            return SelectionPlan {
                words: cycled_shuffle(self.bank, length, rng),
                weak_selected: 0,
                medium_selected: 0,
                strong_selected: 0,
            };
        }

        // Classify in bank order; stable sorts below keep that order for ties.
        let mut weak: Vec<(String, f64)> = Vec::new();
        let mut medium: Vec<(String, f64)> = Vec::new();
        let mut strong: Vec<(String, f64)> = Vec::new();
        for word in self.bank.iter() {
            let stat = book.stat(word);
            let entry = (word.to_owned(), stat.accuracy());
            match stat.tier() {
                Tier::Weak => weak.push(entry),
                Tier::Medium => medium.push(entry),
                Tier::Strong => strong.push(entry),
            }
        }

        // Worst first for weak, best first for strong.
        weak.sort_by(|a, b| a.1.total_cmp(&b.1));
        strong.sort_by(|a, b| b.1.total_cmp(&a.1));

        // 50% weak, 30% medium, remainder strong, each capped at tier size.
        let weak_share = length.div_ceil(2);
        let medium_share = (length * 3).div_ceil(10);
        let weak_quota = weak_share.min(weak.len());
        let medium_quota = medium_share.min(medium.len());
        let strong_quota = length
            .saturating_sub(weak_share + medium_share)
            .min(strong.len());

        let mut words = Vec::with_capacity(length);
        draw_tier(&weak, weak_quota, &mut words, rng);
        draw_tier(&medium, medium_quota, &mut words, rng);
        draw_tier(&strong, strong_quota, &mut words, rng);

        // Tiers collectively too small: top up from the whole bank, distinct
        // words first, repeats only once the bank is exhausted.
        if words.len() < length {
            let mut available: Vec<&str> = {
                let chosen: HashSet<&str> = words.iter().map(String::as_str).collect();
                self.bank
                    .iter()
                    .filter(|word| !chosen.contains(word))
                    .collect()
            };
            while words.len() < length {
                if available.is_empty() {
                    match self.bank.words().choose(rng) {
                        Some(word) => words.push(word.clone()),
                        None => break,
                    }
                } else {
                    let index = rng.random_range(0..available.len());
                    words.push(available.swap_remove(index).to_owned());
                }
            }
        }

        // Uniform Fisher-Yates; tier structure must not leak into order.
        words.shuffle(rng);

        words.retain(|word| !word.is_empty());
        if words.is_empty() {
            // Ultimate fallback: the full bank, shuffled.
            words = cycled_shuffle(self.bank, length, rng);
        }
        words.truncate(length);

        log::debug!(
            "built session list: {} words ({weak_quota} weak, {medium_quota} medium, {strong_quota} strong)",
            words.len()
        );

        SelectionPlan {
            words,
            weak_selected: weak_quota,
            medium_selected: medium_quota,
            strong_selected: strong_quota,
        }
    }
}

/// Draw `quota` words from one tier: distinct words in tier order first,
/// then uniform random repeats only if the quota exceeds the tier size.
fn draw_tier<R: Rng + ?Sized>(
    tier: &[(String, f64)],
    quota: usize,
    into: &mut Vec<String>,
    rng: &mut R,
) {
    let distinct = quota.min(tier.len());
    into.extend(tier.iter().take(distinct).map(|(word, _)| word.clone()));
    for _ in distinct..quota {
        if let Some((word, _)) = tier.choose(rng) {
            into.push(word.clone());
        }
    }
}

/// Random permutation of the bank, cycled out to `length` entries.
fn cycled_shuffle<R: Rng + ?Sized>(bank: &WordBank, length: usize, rng: &mut R) -> Vec<String> {
    let mut pool: Vec<String> = bank.words().to_vec();
    pool.shuffle(rng);
    (0..length).map(|i| pool[i % pool.len()].clone()).collect()
}

//
// ─── RECENT WORDS ──────────────────────────────────────────────────────────────
//

/// Bounded window of recently shown words, used by game modes to avoid
/// presenting the same word twice in quick succession.
#[derive(Debug, Clone)]
pub struct RecentWords {
    window: VecDeque<String>,
    capacity: usize,
}

impl RecentWords {
    pub const DEFAULT_CAPACITY: usize = 6;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Note that a word was just shown, evicting the oldest past capacity.
    pub fn track(&mut self, word: &str) {
        self.window.push_back(word.to_owned());
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
    }

    #[must_use]
    pub fn was_recent(&self, word: &str) -> bool {
        self.window.iter().any(|w| w == word)
    }
}

impl Default for RecentWords {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sight_core::model::WordBank;
    use sight_core::time::fixed_now;
    use std::collections::HashSet;

    fn bank_of(n: usize) -> WordBank {
        WordBank::new((0..n).map(|i| format!("word{i}"))).unwrap()
    }

    /// Record `correct` right and `attempts - correct` wrong answers.
    fn load_stat(book: &mut ProgressBook, word: &str, attempts: u32, correct: u32) {
        for i in 0..attempts {
            book.record(word, i < correct, fixed_now());
        }
    }

    #[test]
    fn cold_start_draws_only_from_bank() {
        let bank = bank_of(20);
        let book = ProgressBook::for_bank(&bank);
        let mut rng = StdRng::seed_from_u64(7);

        let first = WordListBuilder::new(&bank).build_with_rng(&book, &mut rng);
        let second = WordListBuilder::new(&bank).build_with_rng(&book, &mut rng);

        assert_eq!(first.total(), DEFAULT_SESSION_LENGTH);
        assert_eq!(second.total(), DEFAULT_SESSION_LENGTH);
        for word in first.words.iter().chain(second.words.iter()) {
            assert!(bank.contains(word));
        }
    }

    #[test]
    fn always_returns_exact_length() {
        let mut rng = StdRng::seed_from_u64(11);

        // all-zero store
        let bank = bank_of(20);
        let book = ProgressBook::for_bank(&bank);
        let plan = WordListBuilder::new(&bank).build_with_rng(&book, &mut rng);
        assert_eq!(plan.total(), 12);

        // all-mastered store
        let mut mastered = ProgressBook::for_bank(&bank);
        for i in 0..20 {
            load_stat(&mut mastered, &format!("word{i}"), 10, 10);
        }
        let plan = WordListBuilder::new(&bank).build_with_rng(&mastered, &mut rng);
        assert_eq!(plan.total(), 12);
        assert!(plan.words.iter().all(|w| !w.is_empty()));

        // bank smaller than the session: cycles rather than shortening
        let tiny = bank_of(3);
        let mut tiny_book = ProgressBook::for_bank(&tiny);
        load_stat(&mut tiny_book, "word0", 4, 1);
        let plan = WordListBuilder::new(&tiny).build_with_rng(&tiny_book, &mut rng);
        assert_eq!(plan.total(), 12);

        // single-word bank
        let one = bank_of(1);
        let plan = WordListBuilder::new(&one).build_with_rng(&ProgressBook::for_bank(&one), &mut rng);
        assert_eq!(plan.total(), 12);
        assert!(plan.words.iter().all(|w| w == "word0"));
    }

    #[test]
    fn empty_bank_or_zero_length_yields_empty_plan() {
        let bank = bank_of(5);
        let book = ProgressBook::for_bank(&bank);
        let mut rng = StdRng::seed_from_u64(3);
        let plan = WordListBuilder::new(&bank)
            .with_length(0)
            .build_with_rng(&book, &mut rng);
        assert!(plan.is_empty());
    }

    #[test]
    fn quotas_favor_weak_words() {
        let bank = bank_of(24);
        let mut book = ProgressBook::for_bank(&bank);
        // eight clearly weak, eight medium, eight strong
        for i in 0..8 {
            load_stat(&mut book, &format!("word{i}"), 10, 2);
        }
        for i in 8..16 {
            load_stat(&mut book, &format!("word{i}"), 8, 6);
        }
        for i in 16..24 {
            load_stat(&mut book, &format!("word{i}"), 10, 9);
        }

        let mut rng = StdRng::seed_from_u64(5);
        let plan = WordListBuilder::new(&bank).build_with_rng(&book, &mut rng);

        assert_eq!(plan.weak_selected, 6);
        assert_eq!(plan.medium_selected, 4);
        assert_eq!(plan.strong_selected, 2);
        assert_eq!(plan.total(), 12);

        // no repeats needed with this many distinct words
        let distinct: HashSet<&String> = plan.words.iter().collect();
        assert_eq!(distinct.len(), 12);
    }

    #[test]
    fn weak_draw_takes_worst_words_first() {
        let bank = bank_of(10);
        let mut book = ProgressBook::for_bank(&bank);
        // word9 is the single worst; everything else is solid
        load_stat(&mut book, "word9", 10, 1);
        for i in 0..9 {
            load_stat(&mut book, &format!("word{i}"), 10, 9);
        }

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = WordListBuilder::new(&bank).build_with_rng(&book, &mut rng);
            assert!(plan.words.iter().any(|w| w == "word9"));
        }
    }

    #[test]
    fn weak_words_selected_more_often_than_strong() {
        // word0: 1/10 correct (weak). word19: 19/20 but sorted after two
        // perfect words, so it only enters through the random top-up.
        let bank = bank_of(20);
        let mut book = ProgressBook::for_bank(&bank);
        load_stat(&mut book, "word0", 10, 1);
        for i in 1..16 {
            load_stat(&mut book, &format!("word{i}"), 8, 6);
        }
        load_stat(&mut book, "word16", 20, 20);
        load_stat(&mut book, "word17", 20, 20);
        load_stat(&mut book, "word18", 20, 19);
        load_stat(&mut book, "word19", 20, 19);

        let mut rng = StdRng::seed_from_u64(42);
        let trials = 200;
        let mut weak_hits = 0;
        let mut strong_hits = 0;
        for _ in 0..trials {
            let plan = WordListBuilder::new(&bank).build_with_rng(&book, &mut rng);
            if plan.words.iter().any(|w| w == "word0") {
                weak_hits += 1;
            }
            if plan.words.iter().any(|w| w == "word19") {
                strong_hits += 1;
            }
        }

        assert_eq!(weak_hits, trials);
        assert!(strong_hits < trials);
        assert!(weak_hits > strong_hits);
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let bank = bank_of(20);
        let mut book = ProgressBook::for_bank(&bank);
        for i in 0..20 {
            load_stat(&mut book, &format!("word{i}"), 6, u32::try_from(i % 7).unwrap());
        }

        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let plan_a = WordListBuilder::new(&bank).build_with_rng(&book, &mut a);
        let plan_b = WordListBuilder::new(&bank).build_with_rng(&book, &mut b);
        assert_eq!(plan_a, plan_b);
    }

    #[test]
    fn recent_words_window_evicts_oldest() {
        let mut recent = RecentWords::new();
        for word in ["a", "b", "c", "d", "e", "f", "g"] {
            recent.track(word);
        }
        assert!(!recent.was_recent("a"));
        assert!(recent.was_recent("b"));
        assert!(recent.was_recent("g"));
    }
}
