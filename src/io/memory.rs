use super::ReadAt;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;

/// Random access reader over an archive that is already in memory.
///
/// Reads are exact: a request that runs past the end of the buffer fails
/// instead of returning a short read, so a truncated archive surfaces as an
/// error at the structure that points outside of it.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    data: Arc<[u8]>,
}

impl MemoryReader {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl ReadAt for MemoryReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let size = self.size();
        let end = offset.checked_add(buf.len() as u64);
        match end {
            Some(end) if end <= size => {
                let start = offset as usize;
                buf.copy_from_slice(&self.data[start..start + buf.len()]);
                Ok(buf.len())
            }
            _ => bail!(
                "Read of {} bytes at offset {} is past the end of the archive ({} bytes)",
                buf.len(),
                offset,
                size
            ),
        }
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
