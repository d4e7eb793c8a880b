use std::cell::RefCell;
use std::rc::Rc;

use crate::widget::capabilities::{AudioChunk, Microphone, Page};

/// Where the record/stop cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderPhase {
    #[default]
    Idle,
    /// Waiting for the microphone permission prompt
    Requesting,
    Recording,
    /// Capture halted, waiting for the last chunk
    Finalizing,
    /// A finished take is loaded in the preview
    Stopped,
}

impl RecorderPhase {
    pub fn can_start(&self) -> bool {
        matches!(self, RecorderPhase::Idle | RecorderPhase::Stopped)
    }

    pub fn can_stop(&self) -> bool {
        *self == RecorderPhase::Recording
    }
}

/// Append-only chunk sequence shared between a session and the recorder
/// callback that fills it. Empty fragments are dropped on push.
pub struct ChunkBuffer<C> {
    chunks: Rc<RefCell<Vec<C>>>,
}

impl<C> Clone for ChunkBuffer<C> {
    fn clone(&self) -> Self {
        Self {
            chunks: Rc::clone(&self.chunks),
        }
    }
}

impl<C> Default for ChunkBuffer<C> {
    fn default() -> Self {
        Self {
            chunks: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<C: AudioChunk> ChunkBuffer<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the chunk was empty and got dropped.
    pub fn push(&self, chunk: C) -> bool {
        if chunk.byte_len() == 0 {
            return false;
        }
        self.chunks.borrow_mut().push(chunk);
        true
    }

    pub fn len(&self) -> usize {
        self.chunks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.borrow().is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.chunks.borrow().iter().map(AudioChunk::byte_len).sum()
    }

    /// Moves every collected chunk out, in arrival order.
    pub fn drain(&self) -> Vec<C> {
        std::mem::take(&mut *self.chunks.borrow_mut())
    }
}

/// Elapsed seconds plus the handle of the tick that advances them.
pub struct TimerState<T> {
    elapsed_seconds: u32,
    ticker: Option<T>,
}

impl<T> TimerState<T> {
    pub fn started(ticker: T) -> Self {
        Self {
            elapsed_seconds: 0,
            ticker: Some(ticker),
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Advances by one second. A cancelled timer stays put.
    pub fn advance(&mut self) -> Option<u32> {
        self.ticker.as_ref()?;
        self.elapsed_seconds += 1;
        Some(self.elapsed_seconds)
    }

    pub fn cancel(&mut self) {
        self.ticker = None;
    }
}

/// State of one record-then-stop cycle. Replaced wholesale on the next start.
pub struct RecordingSession<M: Microphone, P: Page> {
    pub chunks: ChunkBuffer<M::Chunk>,
    pub capture: Option<M::Capture>,
    pub timer: TimerState<P::Ticker>,
    pub final_blob: Option<M::Recording>,
    pub preview_url: Option<String>,
}

impl<M: Microphone, P: Page> RecordingSession<M, P> {
    pub fn new(chunks: ChunkBuffer<M::Chunk>, capture: M::Capture, ticker: P::Ticker) -> Self {
        Self {
            chunks,
            capture: Some(capture),
            timer: TimerState::started(ticker),
            final_blob: None,
            preview_url: None,
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.timer.elapsed_seconds()
    }
}
