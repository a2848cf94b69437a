use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Context;

use crate::external_sort::line::Line;

#[derive(Debug)]
pub(crate) struct UnmergedChunkFile {
    path: PathBuf,
    reader: BufReader<File>,
    head: Option<Line>,
}

impl UnmergedChunkFile {
    pub(crate) fn new(path: PathBuf) -> Result<UnmergedChunkFile, anyhow::Error> {
        let file = File::open(path.clone()).with_context(|| format!("path: {}", path.to_string_lossy()))?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let bytes = reader.read_line(&mut line)?;
        let head = if bytes > 0 {
            Some(Line::new(line))
        } else {
            None
        };

        Ok(
            UnmergedChunkFile {
                path,
                reader,
                head,
            }
        )
    }

    pub(crate) fn line(&mut self) -> Option<Line> {
        let mut line = String::new();
        let bytes = self.reader.read_line(&mut line).ok()?;
        let next = if bytes > 0 {
            Some(Line::new(line))
        } else {
            None
        };
        std::mem::replace(&mut self.head, next)
    }

    pub(crate) fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl Eq for UnmergedChunkFile {}

impl PartialEq<Self> for UnmergedChunkFile {
    fn eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (None, None) => true,
            (None, _) | (_, None) => false,
            (Some(a), Some(b)) => a.eq(b),
        }
    }
}

impl PartialOrd<Self> for UnmergedChunkFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnmergedChunkFile {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.head, &other.head) {
            (None, None) => Ordering::Equal,
            // none > some so empty files pop from the BinaryHeap first
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => b.cmp(a),
        }
    }
}
