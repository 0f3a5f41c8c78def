use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Caption {
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    captions: Vec<Caption>,
}

impl Transcript {
    pub fn new(captions: Vec<Caption>) -> Self {
        Self { captions }
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Caption> {
        self.captions.get(index)
    }

    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Caption> {
        self.captions.iter()
    }

    // Index of the last caption whose start does not exceed the given time.
    // Captions are kept in file order, which is assumed chronological.
    pub fn locate(&self, time: f64) -> usize {
        let after = self.captions.partition_point(|c| c.start <= time);
        after.saturating_sub(1)
    }

    // Inclusive index range of a 1-based page. Page numbers outside
    // [1, total_pages] are clamped. Call only on a non-empty transcript.
    pub fn page(&self, page: usize, page_size: usize) -> (usize, usize) {
        let size = page_size.max(1);
        let total_pages = (self.len() + size - 1) / size;
        let page = page.clamp(1, total_pages.max(1));
        let start = (page - 1) * size;
        let end = (start + size).min(self.len()).saturating_sub(1);
        (start, end)
    }
}

pub struct Timestamp(pub f64);

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let total_millis = (self.0.max(0.0) * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let millis = total_millis % 1000;
        write!(
            fmt,
            "{:02}:{:02}:{:02},{:03}",
            hours, minutes, seconds, millis
        )
    }
}
