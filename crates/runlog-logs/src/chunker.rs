use std::num::NonZeroUsize;

use runlog_types::{Chunk, ClassifiedLine};

use crate::config::ConfigError;

/// Splits a log into fixed-size chunks of lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogChunker {
    chunk_size: NonZeroUsize,
}

impl LogChunker {
    pub fn new(chunk_size: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(chunk_size)
            .map(|chunk_size| Self { chunk_size })
            .ok_or(ConfigError::ZeroChunkSize)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Index of the chunk holding `line`
    pub fn chunk_index_of(&self, line: usize) -> usize {
        line / self.chunk_size
    }

    /// Number of chunks needed for `line_count` lines
    pub fn chunk_count(&self, line_count: usize) -> usize {
        line_count.div_ceil(self.chunk_size.get())
    }

    /// Partition lines into contiguous chunks. No lines, no chunks.
    pub fn chunk(&self, lines: &[ClassifiedLine]) -> Vec<Chunk> {
        lines
            .chunks(self.chunk_size.get())
            .enumerate()
            .map(|(index, slice)| {
                let start_line = index * self.chunk_size.get();
                Chunk {
                    index,
                    start_line,
                    end_line: start_line + slice.len() - 1,
                    text: slice
                        .iter()
                        .map(|l| l.text.as_str())
                        .collect::<Vec<_>>()
                        .join("\n"),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineClassifier, MarkerConfig};

    fn lines(n: usize) -> Vec<ClassifiedLine> {
        let raw: Vec<String> = (0..n).map(|i| format!("line {i}")).collect();
        LineClassifier::new(&MarkerConfig::default())
            .unwrap()
            .classify(&raw.join("\n"))
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(LogChunker::new(0), Err(ConfigError::ZeroChunkSize)));
    }

    #[test]
    fn test_sample_partition() {
        let chunker = LogChunker::new(20).unwrap();
        let chunks = chunker.chunk(&lines(45));

        let bounds: Vec<(usize, usize)> =
            chunks.iter().map(|c| (c.start_line, c.end_line)).collect();
        assert_eq!(bounds, vec![(0, 19), (20, 39), (40, 44)]);
        assert_eq!(chunks[2].line_count(), 5);
        assert_eq!(chunker.chunk_count(45), 3);
    }

    #[test]
    fn test_partition_covers_every_line() {
        for n in [1, 2, 19, 20, 21, 40, 57] {
            for k in [1, 3, 20, 100] {
                let chunker = LogChunker::new(k).unwrap();
                let chunks = chunker.chunk(&lines(n));

                assert_eq!(chunks.len(), chunker.chunk_count(n));
                assert_eq!(chunks[0].start_line, 0);
                assert_eq!(chunks.last().unwrap().end_line, n - 1);
                for pair in chunks.windows(2) {
                    assert_eq!(pair[0].end_line + 1, pair[1].start_line);
                    assert_eq!(pair[0].line_count(), k);
                }
                for line in 0..n {
                    let idx = chunker.chunk_index_of(line);
                    assert!(chunks[idx].contains(line), "n={n} k={k} line={line}");
                }
            }
        }
    }

    #[test]
    fn test_text_concatenation_matches_lines() {
        let classified = LineClassifier::new(&MarkerConfig::default())
            .unwrap()
            .classify("a\n<span class=\"log-error\">ERROR: b</span>\nc\nd\ne");
        let chunker = LogChunker::new(2).unwrap();
        let joined = chunker
            .chunk(&classified)
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let expected = classified
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(joined, expected);
        assert_eq!(joined, "a\nERROR: b\nc\nd\ne");
    }

    #[test]
    fn test_empty_lines_no_chunks() {
        let chunker = LogChunker::new(20).unwrap();
        assert!(chunker.chunk(&[]).is_empty());
        assert_eq!(chunker.chunk_count(0), 0);
    }
}
