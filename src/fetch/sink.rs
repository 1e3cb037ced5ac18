//! Row consumers

use serde::Serialize;
use std::io::{self, Write};

/// Consumer of streamed rows that also reports how many more it wants.
pub trait RowSink<T> {
    fn stream_list_item(&mut self, item: T);

    /// Remaining capacity; `None` means unbounded
    fn rows_remaining(&self) -> Option<u64>;
}

impl<T, S: RowSink<T> + ?Sized> RowSink<T> for &mut S {
    fn stream_list_item(&mut self, item: T) {
        (**self).stream_list_item(item)
    }

    fn rows_remaining(&self) -> Option<u64> {
        (**self).rows_remaining()
    }
}

/// Collects rows in memory, up to an optional limit
#[derive(Debug, Clone)]
pub struct VecSink<T> {
    limit: Option<u64>,
    items: Vec<T>,
}

impl<T> VecSink<T> {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            items: Vec::new(),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            limit: None,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> RowSink<T> for VecSink<T> {
    fn stream_list_item(&mut self, item: T) {
        self.items.push(item);
    }

    fn rows_remaining(&self) -> Option<u64> {
        self.limit
            .map(|limit| limit.saturating_sub(self.items.len() as u64))
    }
}

/// Writes each row as one JSON object per line.
///
/// Write failures cannot be returned from `stream_list_item`; the first one is
/// kept, the sink reports zero remaining rows so listing stops, and
/// [`finish`](Self::finish) surfaces it.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    limit: Option<u64>,
    written: u64,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, limit: Option<u64>) -> Self {
        Self {
            writer,
            limit,
            written: 0,
            error: None,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_row<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, item)?;
        self.writer.write_all(b"\n")
    }
}

impl<T: Serialize, W: Write> RowSink<T> for JsonLinesSink<W> {
    fn stream_list_item(&mut self, item: T) {
        if self.error.is_some() {
            return;
        }
        match self.write_row(&item) {
            Ok(()) => self.written += 1,
            Err(err) => {
                tracing::error!("failed to write row: {}", err);
                self.error = Some(err);
            }
        }
    }

    fn rows_remaining(&self) -> Option<u64> {
        if self.error.is_some() {
            return Some(0);
        }
        self.limit
            .map(|limit| limit.saturating_sub(self.written))
    }
}
