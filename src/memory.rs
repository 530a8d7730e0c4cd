use std::collections::BTreeMap;

use crate::error::{Error, Result};

// NB. addresses are usize; values, including raw parameters that get turned
//     into addresses, are i64 to stop endless casting in the handlers

/// Represents the addressable memory of a computer. Every address reads as 0
/// until something writes to it.
pub trait MemoryMap {
    /// read one word
    fn get(&self, addr: usize) -> i64;

    /// write one word
    fn set(&mut self, addr: usize, value: i64);

    /// comma-separated dump of every stored word, in address order
    fn render(&self) -> String;

    /// write a chunk of words starting at `addr`
    fn write(&mut self, data: &[i64], addr: usize) {
        for (offset, value) in data.iter().enumerate() {
            self.set(addr.saturating_add(offset), *value);
        }
    }

    /// read `len` words starting at `addr`, stopping at the top of the
    /// address space
    fn read(&self, addr: usize, len: usize) -> Vec<i64> {
        (addr..addr.saturating_add(len)).map(|a| self.get(a)).collect()
    }
}

/// turn a computed value into an address, refusing anything negative
pub fn address(raw: i64) -> Result<usize> {
    usize::try_from(raw).map_err(|_| Error::InvalidAddress { address: raw })
}

pub(crate) fn render<'a>(values: impl IntoIterator<Item = &'a i64>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Program words live in a flat vector that grows while writes stay
/// contiguous with it; anything further out goes into an overflow map, so far
/// away addresses cost one entry.
#[derive(Debug, Clone, Default)]
pub struct SparseMemory {
    words: Vec<i64>,
    overflow: BTreeMap<usize, i64>,
}

impl SparseMemory {
    pub fn new(program: &[i64]) -> Self {
        SparseMemory {
            words: program.to_vec(),
            overflow: BTreeMap::new(),
        }
    }

    /// replace everything with a fresh copy of `program`
    pub fn load(&mut self, program: &[i64]) {
        self.words.clear();
        self.words.extend_from_slice(program);
        self.overflow.clear();
    }
}

impl MemoryMap for SparseMemory {
    fn get(&self, addr: usize) -> i64 {
        match self.words.get(addr) {
            Some(v) => *v,
            None => self.overflow.get(&addr).copied().unwrap_or(0),
        }
    }

    fn set(&mut self, addr: usize, value: i64) {
        if let Some(v) = self.words.get_mut(addr) {
            *v = value;
        } else if addr == self.words.len() {
            self.words.push(value);
            // pull in overflow entries that are now contiguous
            while let Some(next) = self.overflow.remove(&self.words.len()) {
                self.words.push(next);
            }
        } else {
            self.overflow.insert(addr, value);
        }
    }

    /// gaps between the words and the overflow entries are skipped, so the
    /// dump never grows with the distance of a write
    fn render(&self) -> String {
        render(self.words.iter().chain(self.overflow.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_seeded_from_program() {
        let m = SparseMemory::new(&[1, 9, 10, 3]);
        assert_eq!(m.read(0, 4), vec![1, 9, 10, 3]);
        assert_eq!(m.render(), "1,9,10,3");
    }

    #[test]
    fn test_unwritten_reads_zero() {
        let m = SparseMemory::new(&[99]);
        assert_eq!(m.get(1), 0);
        assert_eq!(m.get(1 << 40), 0);
        // reading does not grow anything
        assert_eq!(m.words.len(), 1);
        assert!(m.overflow.is_empty());
    }

    #[test]
    fn test_write_far_past_end() {
        let mut m = SparseMemory::new(&[1, 2, 3]);
        m.set(1_000_000, 42);
        assert_eq!(m.get(1_000_000), 42);
        assert_eq!(m.overflow.len(), 1);
        assert_eq!(m.words.len(), 3);
    }

    #[test]
    fn test_render_after_far_write() {
        let mut m = SparseMemory::new(&[1101, 0, 1, 5, 99]);
        m.set(1 << 40, 1);
        m.set(1 << 20, 7);
        assert_eq!(m.render(), "1101,0,1,5,99,7,1");
    }

    #[test]
    fn test_contiguous_writes_extend_words() {
        let mut m = SparseMemory::new(&[0; 4]);
        m.set(6, 9);
        m.set(5, 8);
        assert_eq!(m.overflow.len(), 2);
        m.set(4, 7);
        assert_eq!(m.words, vec![0, 0, 0, 0, 7, 8, 9]);
        assert!(m.overflow.is_empty());
    }

    #[test]
    fn test_write_slice_ok() {
        let mut m = SparseMemory::new(&[0; 4]);
        m.write(&[5, 6, 7], 2);
        assert_eq!(m.read(0, 6), vec![0, 0, 5, 6, 7, 0]);
        assert_eq!(m.render(), "0,0,5,6,7");
    }

    #[test]
    fn test_read_stops_at_top_of_address_space() {
        let m = SparseMemory::new(&[1]);
        assert_eq!(m.read(usize::MAX - 1, 5), vec![0]);
    }

    #[test]
    fn test_render() {
        let mut m = SparseMemory::new(&[2, 4, 4, 5, 99, 0]);
        assert_eq!(m.render(), "2,4,4,5,99,0");
        // gaps are skipped, stored words keep address order
        m.set(9, -3);
        m.set(7, 4);
        assert_eq!(m.render(), "2,4,4,5,99,0,4,-3");
    }

    #[test]
    fn test_load_resets() {
        let mut m = SparseMemory::new(&[1, 2, 3]);
        m.set(100, 9);
        m.load(&[7]);
        assert_eq!(m.get(0), 7);
        assert_eq!(m.get(100), 0);
        assert_eq!(m.render(), "7");
    }

    #[test]
    fn test_negative_address_rejected() {
        assert!(matches!(
            address(-1),
            Err(Error::InvalidAddress { address: -1 })
        ));
        assert_eq!(address(12).unwrap(), 12);
    }
}
