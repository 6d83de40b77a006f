//! Packed 1-bit pixel plane

const WORD_BITS: u32 = u64::BITS;

/// One bit per pixel, row-major, each row padded to whole 64-bit words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    words: Vec<u64>,
}

impl BitMask {
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = width.div_ceil(WORD_BITS) as usize;
        Self {
            width,
            height,
            words_per_row,
            words: vec![0; words_per_row * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn locate(&self, x: u32, y: u32) -> (usize, u64) {
        let word = y as usize * self.words_per_row + (x / WORD_BITS) as usize;
        (word, 1u64 << (x % WORD_BITS))
    }

    /// Read a bit; `None` outside the plane
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (word, bit) = self.locate(x, y);
        Some(self.words[word] & bit != 0)
    }

    /// Write a bit; writes outside the plane are dropped
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.locate(x, y);
        if value {
            self.words[word] |= bit;
        } else {
            self.words[word] &= !bit;
        }
    }

    pub fn fill(&mut self, value: bool) {
        self.words.fill(if value { u64::MAX } else { 0 });
        if value {
            self.clear_padding();
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate one row as booleans
    pub fn row(&self, y: u32) -> impl Iterator<Item = bool> + '_ {
        (0..self.width).map(move |x| self.get(x, y).unwrap_or(false))
    }

    fn clear_padding(&mut self) {
        let tail = self.width % WORD_BITS;
        if tail == 0 {
            return;
        }
        let keep = (1u64 << tail) - 1;
        for row in self.words.chunks_mut(self.words_per_row) {
            if let Some(last) = row.last_mut() {
                *last &= keep;
            }
        }
    }
}
