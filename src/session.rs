use crate::caption::{Caption, Transcript};
use crate::error::PracticeError;
use crate::vocab::Vocabulary;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const RECENT_NOTES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub index: usize,
    pub time: f64,
}

// One learner's working state: the loaded transcript, the playback cursor,
// collected vocabulary and the note log. Constructed fresh per session;
// independent sessions share nothing.
#[derive(Debug, Default)]
pub struct Session {
    transcript: Transcript,
    vocabulary: Vocabulary,
    notes: Vec<String>,
    cursor: Option<Cursor>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // Replaces the transcript wholesale. An empty transcript leaves the
    // session without a cursor ("zero captions loaded"), which is a valid
    // state, not an error.
    pub fn load(&mut self, transcript: Transcript) {
        self.cursor = transcript.get(0).map(|first| Cursor {
            index: 0,
            time: first.start,
        });
        self.transcript = transcript;
    }

    pub fn is_loaded(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Caption> {
        self.cursor.and_then(|c| self.transcript.get(c.index))
    }

    pub fn seek(&mut self, index: usize) -> Result<&Caption, PracticeError> {
        if self.cursor.is_none() {
            return Err(PracticeError::NoTranscript);
        }
        let len = self.transcript.len();
        let caption = self
            .transcript
            .get(index)
            .ok_or(PracticeError::IndexOutOfRange { index, len })?;
        self.cursor = Some(Cursor {
            index,
            time: caption.start,
        });
        Ok(caption)
    }

    pub fn locate(&self, time: f64) -> Result<usize, PracticeError> {
        if self.cursor.is_none() {
            return Err(PracticeError::NoTranscript);
        }
        Ok(self.transcript.locate(time))
    }

    // Feed of the audio collaborator's elapsed-seconds position.
    pub fn sync(&mut self, time: f64) -> Result<usize, PracticeError> {
        let index = self.locate(time)?;
        self.cursor = Some(Cursor { index, time });
        Ok(index)
    }

    pub fn page(&self, page: usize, page_size: usize) -> Result<(usize, usize), PracticeError> {
        if self.cursor.is_none() {
            return Err(PracticeError::NoTranscript);
        }
        Ok(self.transcript.page(page, page_size))
    }

    pub fn add_word(&mut self, word: &str) -> bool {
        self.vocabulary.add(word)
    }

    pub fn remove_word(&mut self, word: &str) -> bool {
        self.vocabulary.remove(word)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn add_note(&mut self, note: String) {
        self.notes.push(note);
    }

    pub fn recent_notes(&self) -> &[String] {
        let skip = self.notes.len().saturating_sub(RECENT_NOTES);
        &self.notes[skip..]
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(starts: &[f64]) -> Transcript {
        Transcript::new(
            starts
                .iter()
                .enumerate()
                .map(|(i, s)| Caption {
                    id: format!("{}", i + 1),
                    start: *s,
                    end: s + 1.0,
                    text: format!("caption {}", i + 1),
                })
                .collect(),
        )
    }

    fn loaded(starts: &[f64]) -> Session {
        let mut session = Session::new();
        session.load(transcript(starts));
        session
    }

    #[test]
    fn fresh_session_is_idle() {
        let session = Session::new();

        assert!(!session.is_loaded());
        assert_eq!(session.cursor(), None);
        assert!(session.current().is_none());
    }

    #[test]
    fn idle_session_rejects_every_operation() {
        let mut session = Session::new();

        assert_eq!(session.seek(0), Err(PracticeError::NoTranscript));
        assert_eq!(session.locate(1.0), Err(PracticeError::NoTranscript));
        assert_eq!(session.sync(1.0), Err(PracticeError::NoTranscript));
        assert_eq!(session.page(1, 20), Err(PracticeError::NoTranscript));
    }

    #[test]
    fn load_places_cursor_on_first_caption() {
        let session = loaded(&[2.0, 5.0]);

        assert!(session.is_loaded());
        assert_eq!(session.cursor(), Some(Cursor { index: 0, time: 2.0 }));
    }

    #[test]
    fn loading_empty_transcript_stays_idle() {
        let mut session = loaded(&[2.0, 5.0]);
        session.load(Transcript::default());

        assert!(!session.is_loaded());
        assert_eq!(session.seek(0), Err(PracticeError::NoTranscript));
    }

    #[test]
    fn reload_replaces_transcript_wholesale() {
        let mut session = loaded(&[2.0, 5.0]);
        session.seek(1).unwrap();

        session.load(transcript(&[10.0]));

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(
            session.cursor(),
            Some(Cursor {
                index: 0,
                time: 10.0
            })
        );
    }

    #[test]
    fn reload_keeps_vocabulary_and_notes() {
        let mut session = loaded(&[2.0]);
        session.add_word("echo");
        session.add_note("tricky liaison".to_string());

        session.load(transcript(&[10.0]));

        assert_eq!(session.vocabulary().len(), 1);
        assert_eq!(session.note_count(), 1);
    }

    #[test]
    fn seek_moves_cursor_to_caption_start() {
        let mut session = loaded(&[2.0, 5.0, 9.0]);

        let caption = session.seek(2).unwrap();

        assert_eq!(caption.id, "3");
        assert_eq!(session.cursor(), Some(Cursor { index: 2, time: 9.0 }));
    }

    #[test]
    fn seek_out_of_range_is_an_error() {
        let mut session = loaded(&[2.0, 5.0]);

        assert_eq!(
            session.seek(2),
            Err(PracticeError::IndexOutOfRange { index: 2, len: 2 })
        );
        // Cursor untouched by the failed seek.
        assert_eq!(session.cursor(), Some(Cursor { index: 0, time: 2.0 }));
    }

    #[test]
    fn sync_tracks_playback_position() {
        let mut session = loaded(&[2.0, 5.0, 9.0]);

        assert_eq!(session.sync(6.5).unwrap(), 1);
        assert_eq!(session.cursor(), Some(Cursor { index: 1, time: 6.5 }));
    }

    #[test]
    fn sync_after_seek_agrees_with_locate() {
        let mut session = loaded(&[2.0, 5.0, 9.0]);

        let caption_start = session.seek(1).unwrap().start;

        assert_eq!(session.sync(caption_start).unwrap(), 1);
    }

    #[test]
    fn current_follows_cursor() {
        let mut session = loaded(&[2.0, 5.0]);
        session.seek(1).unwrap();

        assert_eq!(session.current().unwrap().id, "2");
    }

    #[test]
    fn page_is_delegated_with_state_check() {
        let starts: Vec<f64> = (0..45).map(|i| i as f64).collect();
        let session = loaded(&starts);

        assert_eq!(session.page(3, 20).unwrap(), (40, 44));
    }

    #[test]
    fn duplicate_words_are_not_collected_twice() {
        let mut session = loaded(&[2.0]);

        assert!(session.add_word("echo"));
        assert!(!session.add_word("echo"));
        assert_eq!(session.vocabulary().len(), 1);
    }

    #[test]
    fn recent_notes_shows_at_most_five_newest() {
        let mut session = Session::new();
        for i in 1..=7 {
            session.add_note(format!("note {}", i));
        }

        assert_eq!(
            session.recent_notes(),
            ["note 3", "note 4", "note 5", "note 6", "note 7"]
        );
        assert_eq!(session.note_count(), 7);
    }
}
