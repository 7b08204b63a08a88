//! Data cache maintenance
//!
//! The MicroBlaze D-cache is write-back. A DMA engine reads RAM, not cache,
//! so CPU writes must be flushed before a memory→device transfer, and lines
//! covering a device→memory destination must be flushed again after the
//! transfer so the CPU re-reads what the engine wrote.

/// Cache maintenance around a DMA-visible buffer.
pub trait DataCache {
    /// Write back and invalidate every cache line covering `region`.
    fn flush_range(&mut self, region: &[u8]);
}

/// Cache maintenance for targets without a data cache (or with DMA buffers in
/// uncached memory).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl DataCache for NoCache {
    fn flush_range(&mut self, _region: &[u8]) {}
}
