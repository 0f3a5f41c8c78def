use crate::caption::Caption;

use rand::Rng;

pub const CLOZE_MASK: &str = "___";
pub const CLOZE_RATE: f64 = 0.3;

// Short words carry little listening value; captions this short are shown as-is.
const CLOZE_MIN_WORD_CHARS: usize = 4;
const CLOZE_MIN_WORDS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ClozeExercise {
    pub prompt: String,
    pub blanks: Vec<Blank>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blank {
    pub position: usize,
    pub answer: String,
}

impl ClozeExercise {
    pub fn has_blanks(&self) -> bool {
        !self.blanks.is_empty()
    }
}

// Masks each sufficiently long word with probability CLOZE_RATE. The blanks
// carry their word position and answer, so grading needs no re-derivation.
pub fn cloze<R: Rng>(caption: &Caption, rng: &mut R) -> ClozeExercise {
    let words = caption.words();
    if words.len() < CLOZE_MIN_WORDS {
        return ClozeExercise {
            prompt: words.join(" "),
            blanks: Vec::new(),
        };
    }

    let mut shown = Vec::with_capacity(words.len());
    let mut blanks = Vec::new();
    for (position, &word) in words.iter().enumerate() {
        if word.chars().count() >= CLOZE_MIN_WORD_CHARS && rng.gen::<f64>() < CLOZE_RATE {
            shown.push(CLOZE_MASK);
            blanks.push(Blank {
                position,
                answer: word.to_string(),
            });
        } else {
            shown.push(word);
        }
    }

    ClozeExercise {
        prompt: shown.join(" "),
        blanks,
    }
}

pub fn pick_caption<'a, R: Rng>(captions: &'a [Caption], rng: &mut R) -> Option<&'a Caption> {
    if captions.is_empty() {
        return None;
    }
    captions.get(rng.gen_range(0..captions.len()))
}

// Dictation attempts are graded on trimmed, case-insensitive equality.
// Anything smarter than that is the learner's own ear.
pub fn check_dictation(expected: &str, attempt: &str) -> bool {
    attempt.trim().to_lowercase() == expected.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn caption(text: &str) -> Caption {
        Caption {
            id: "1".to_string(),
            start: 0.0,
            end: 1.0,
            text: text.to_string(),
        }
    }

    #[test]
    fn short_captions_are_never_masked() {
        let caption = caption("just three words");
        let mut rng = StdRng::seed_from_u64(0);

        let exercise = cloze(&caption, &mut rng);

        assert_eq!(exercise.prompt, "just three words");
        assert!(!exercise.has_blanks());
    }

    #[test]
    fn seeded_cloze_is_reproducible() {
        let caption = caption("the quick brown fox jumps over the lazy dog");

        let first = cloze(&caption, &mut StdRng::seed_from_u64(7));
        let second = cloze(&caption, &mut StdRng::seed_from_u64(7));

        assert_eq!(first, second);
    }

    #[test]
    fn blanks_reconstruct_the_original_text() {
        let caption = caption("listening practice takes patient daily repetition");
        let mut rng = StdRng::seed_from_u64(42);

        let exercise = cloze(&caption, &mut rng);

        let mut restored: Vec<&str> = exercise.prompt.split_whitespace().collect();
        for blank in &exercise.blanks {
            assert_eq!(restored[blank.position], CLOZE_MASK);
            restored[blank.position] = blank.answer.as_str();
        }
        assert_eq!(restored.join(" "), caption.text);
    }

    #[test]
    fn short_words_are_left_visible() {
        let caption = caption("it is an odd day for us to be up");

        for seed in 0..20 {
            let exercise = cloze(&caption, &mut StdRng::seed_from_u64(seed));
            for blank in &exercise.blanks {
                assert!(blank.answer.chars().count() >= CLOZE_MIN_WORD_CHARS);
            }
        }
    }

    #[test]
    fn masking_eventually_happens() {
        let caption = caption("the quick brown fox jumps over the lazy dog");

        let masked_any = (0..20)
            .any(|seed| cloze(&caption, &mut StdRng::seed_from_u64(seed)).has_blanks());

        assert!(masked_any);
    }

    #[test]
    fn pick_caption_from_empty_slice_is_none() {
        let mut rng = StdRng::seed_from_u64(0);

        assert!(pick_caption(&[], &mut rng).is_none());
    }

    #[test]
    fn pick_caption_stays_in_bounds() {
        let captions: Vec<Caption> = (0..5)
            .map(|i| Caption {
                id: format!("{}", i),
                start: i as f64,
                end: i as f64 + 1.0,
                text: "text".to_string(),
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(pick_caption(&captions, &mut rng).is_some());
        }
    }

    #[test]
    fn dictation_ignores_case_and_outer_whitespace() {
        assert!(check_dictation("Hello world", "  hello WORLD \n"));
    }

    #[test]
    fn dictation_rejects_wrong_words() {
        assert!(!check_dictation("Hello world", "hello word"));
    }

    #[test]
    fn dictation_does_not_ignore_punctuation() {
        assert!(!check_dictation("Hello, world", "hello world"));
    }
}
