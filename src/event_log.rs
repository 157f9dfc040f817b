mod in_memory;

pub use self::in_memory::*;

use crate::event::Event;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

pub type Offset = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct LogEvent {
    pub offset: Offset,
    pub details: Event,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WithOffset<T> {
    pub offset: Offset,
    pub data: T,
}

pub trait Reader {
    /// Read up to `limit` events starting at `offset`
    ///
    /// Blocks until at least one event is available, or `timeout` passes.
    fn read(
        &self,
        offset: Offset,
        limit: usize,
        timeout: Option<Duration>,
    ) -> Result<WithOffset<Vec<LogEvent>>>;

    fn get_start_offset(&self) -> Result<Offset>;
}

pub trait Writer {
    fn write(&self, events: &[Event]) -> Result<Offset>;
}

pub type SharedReader = Arc<dyn Reader + Sync + Send + 'static>;
pub type SharedWriter = Arc<dyn Writer + Sync + Send + 'static>;
