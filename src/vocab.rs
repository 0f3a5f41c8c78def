use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub const EXPORT_FILE_NAME: &str = "my_vocabulary.txt";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    // Insertion order is kept; re-adding an existing word is a no-op.
    pub fn add(&mut self, word: &str) -> bool {
        if self.contains(word) {
            return false;
        }
        self.words.push(word.to_string());
        true
    }

    pub fn remove(&mut self, word: &str) -> bool {
        match self.words.iter().position(|w| w == word) {
            Some(index) => {
                self.words.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

pub fn export<P: AsRef<Path>>(vocab: &Vocabulary, output: P) -> Result<()> {
    let file = std::fs::File::create(output).context("Failed to create vocabulary file.")?;
    let mut writer = BufWriter::new(file);
    write_words(&mut writer, vocab).context("Failed to write vocabulary.")?;
    writer.flush().context("Failed to write vocabulary.")?;
    Ok(())
}

pub fn write_words<W: Write>(buf: &mut W, vocab: &Vocabulary) -> Result<()> {
    buf.write_all(vocab.words().join("\n").as_bytes())?;
    Ok(())
}
