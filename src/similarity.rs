//! Text similarity scoring.
//!
//! The score is the classic matching-blocks ratio: find the longest common
//! block, recurse on the pieces to its left and right, and report
//! `2 * matched / (len(a) + len(b))` over characters.
//!
//! Contract:
//! - the result lies in `[0.0, 1.0]` and is symmetric in its inputs
//! - `1.0` is returned only for identical strings (two empty strings included)
//! - `0.0` when exactly one side is empty or nothing is shared
//! - only the first `max_chars` characters of each side are compared; two
//!   different texts that share that prefix score just below `1.0`

/// Default number of characters compared per side.
pub const DEFAULT_MAX_CHARS: usize = 20_000;

/// Largest score a non-identical pair can receive.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// Similarity scorer with an input size cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityScorer {
    max_chars: usize,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl SimilarityScorer {
    /// Create a scorer comparing at most `max_chars` characters per side.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Similarity of two texts in `[0.0, 1.0]`.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }

        let a: Vec<char> = a.chars().take(self.max_chars).collect();
        let b: Vec<char> = b.chars().take(self.max_chars).collect();
        let total = a.len() + b.len();
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        // Longest-first matching breaks ties by position, so always feed the
        // pair in a canonical order to keep the score symmetric.
        let (first, second) = if (a.len(), &a) <= (b.len(), &b) {
            (&a, &b)
        } else {
            (&b, &a)
        };

        let matched = Matcher::new(first, second).matched_chars();
        let ratio = 2.0 * matched as f64 / total as f64;
        ratio.min(BELOW_ONE)
    }
}

/// Similarity using the default size cap.
pub fn similarity(a: &str, b: &str) -> f64 {
    SimilarityScorer::default().score(a, b)
}

/// Longest-matching-block search over two char sequences.
struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        Self { a, b }
    }

    /// Total length of the non-overlapping matching blocks.
    fn matched_chars(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given ranges.
    ///
    /// Among equally long blocks the one starting earliest in `a`, then
    /// earliest in `b`, wins. Runs in time linear in the two ranges.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        if alo >= ahi || blo >= bhi {
            return (best_i, best_j, best_k);
        }

        let automaton = SuffixAutomaton::build(&self.b[blo..bhi]);
        let mut state = SuffixAutomaton::ROOT;
        let mut len = 0;

        for i in alo..ahi {
            let c = self.a[i];
            loop {
                if let Some(next) = automaton.transition(state, c) {
                    state = next;
                    len += 1;
                    break;
                }
                match automaton.states[state].link {
                    Some(link) => {
                        state = link;
                        len = automaton.states[state].len;
                    }
                    None => {
                        len = 0;
                        break;
                    }
                }
            }

            if len > best_k {
                best_k = len;
                best_i = i + 1 - len;
                best_j = blo + automaton.states[state].first_end + 1 - len;
            }
        }

        (best_i, best_j, best_k)
    }
}

/// Suffix automaton state.
struct State {
    /// Length of the longest string in this state.
    len: usize,
    /// Suffix link; `None` only for the root.
    link: Option<usize>,
    /// End position of the first occurrence of this state's strings.
    first_end: usize,
    /// Outgoing transitions. Small per state for natural text.
    next: Vec<(char, usize)>,
}

/// Suffix automaton over a char sequence, used to find the longest
/// substring of another sequence that occurs in it.
struct SuffixAutomaton {
    states: Vec<State>,
    last: usize,
}

impl SuffixAutomaton {
    const ROOT: usize = 0;

    fn build(text: &[char]) -> Self {
        let mut automaton = Self {
            states: Vec::with_capacity(text.len() * 2 + 1),
            last: Self::ROOT,
        };
        automaton.states.push(State {
            len: 0,
            link: None,
            first_end: 0,
            next: Vec::new(),
        });
        for (pos, &c) in text.iter().enumerate() {
            automaton.extend(c, pos);
        }
        automaton
    }

    fn transition(&self, state: usize, c: char) -> Option<usize> {
        self.states[state]
            .next
            .iter()
            .find(|(key, _)| *key == c)
            .map(|(_, target)| *target)
    }

    fn set_transition(&mut self, state: usize, c: char, target: usize) {
        let next = &mut self.states[state].next;
        match next.iter_mut().find(|(key, _)| *key == c) {
            Some(edge) => edge.1 = target,
            None => next.push((c, target)),
        }
    }

    fn extend(&mut self, c: char, pos: usize) {
        let cur = self.states.len();
        self.states.push(State {
            len: self.states[self.last].len + 1,
            link: None,
            first_end: pos,
            next: Vec::new(),
        });

        let mut p = Some(self.last);
        let mut existing = None;
        while let Some(state) = p {
            if let Some(q) = self.transition(state, c) {
                existing = Some((state, q));
                break;
            }
            self.set_transition(state, c, cur);
            p = self.states[state].link;
        }

        match existing {
            None => self.states[cur].link = Some(Self::ROOT),
            Some((p, q)) if self.states[p].len + 1 == self.states[q].len => {
                self.states[cur].link = Some(q);
            }
            Some((p, q)) => {
                let clone = self.states.len();
                let cloned = State {
                    len: self.states[p].len + 1,
                    link: self.states[q].link,
                    first_end: self.states[q].first_end,
                    next: self.states[q].next.clone(),
                };
                self.states.push(cloned);

                let mut walk = Some(p);
                while let Some(state) = walk {
                    if self.transition(state, c) != Some(q) {
                        break;
                    }
                    self.set_transition(state, c, clone);
                    walk = self.states[state].link;
                }
                self.states[q].link = Some(clone);
                self.states[cur].link = Some(clone);
            }
        }

        self.last = cur;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_identical_strings_score_one() {
        for s in ["", "a", "hello world", "ünïcödé ✓", "aaaaaaaaaaaaaaaa"] {
            assert_eq!(similarity(s, s), 1.0);
        }
    }

    #[test]
    fn test_empty_conventions() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        // "bcd" matches: 2 * 3 / 8.
        assert_close(similarity("abcd", "bcde"), 0.75);
        // "the quick brown " plus "o": 2 * 17 / 38.
        assert_close(
            similarity("the quick brown fox", "the quick brown dog"),
            34.0 / 38.0,
        );
        // One of "a"/"b" matches either way round.
        assert_close(similarity("ab", "ba"), 0.5);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("abcd", "bcde"),
            ("ab", "ba"),
            ("abab", "baba"),
            ("private sale today", "today private sale"),
            ("xaxbxcx", "abcxxxx"),
            ("the quick brown fox", "the quick brown dog"),
            ("aaab", "abbb"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn test_bounds() {
        let pairs = [
            ("a", "aaaa"),
            ("hello", "world"),
            ("12345", "54321"),
            ("mississippi", "missouri"),
        ];
        for (a, b) in pairs {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{} out of range", score);
            assert!(score < 1.0);
        }
    }

    #[test]
    fn test_more_shared_text_scores_higher() {
        let live = "welcome to the market";
        let low = similarity(live, "welcome home");
        let high = similarity(live, "welcome to the bazaar");
        assert!(high > low);
    }

    #[test]
    fn test_cap_truncates_inputs() {
        let scorer = SimilarityScorer::new(4);
        // Only "abcd" vs "abcd" is compared, but the texts differ.
        let score = scorer.score("abcdXXXX", "abcdYYYY");
        assert!(score < 1.0);
        assert!(score > 0.99);

        assert_eq!(scorer.score("abcdXXXX", "abcdXXXX"), 1.0);
        assert_eq!(scorer.max_chars(), 4);
    }

    #[test]
    fn test_zero_cap_is_clamped() {
        assert_eq!(SimilarityScorer::new(0).max_chars(), 1);
    }

    #[test]
    fn test_longest_block_wins_over_earlier_shorter_one() {
        let a: Vec<char> = "ab xyzw".chars().collect();
        let b: Vec<char> = "xyzw ab".chars().collect();
        let matcher = Matcher::new(&a, &b);
        assert_eq!(matcher.longest_match(0, a.len(), 0, b.len()), (3, 0, 4));
    }

    #[test]
    fn test_ties_pick_earliest_positions() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "xabxab".chars().collect();
        let matcher = Matcher::new(&a, &b);
        assert_eq!(matcher.longest_match(0, a.len(), 0, b.len()), (0, 1, 2));
    }

    #[test]
    fn test_large_inputs_finish() {
        let a = "lorem ipsum dolor sit amet ".repeat(400);
        let b = "lorem ipsum dolor sit amat ".repeat(400);
        let score = similarity(&a, &b);
        assert!(score > 0.5 && score < 1.0);
    }
}
