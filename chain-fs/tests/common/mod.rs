#![allow(dead_code)]

use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use chain_fs::BackingStore;

/// 临时分区文件的路径，离开作用域时删掉残留的文件
#[derive(Debug)]
pub struct TempPartition(PathBuf);

impl Deref for TempPartition {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for TempPartition {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempPartition {
    fn drop(&mut self) {
        // 正常结束时分区已被删除
        let _ = std::fs::remove_file(&self.0);
    }
}

/// 每个测试独占一个分区文件
pub fn partition_path(name: &str) -> TempPartition {
    let file = format!("chain-fs-{}-{name}.img", std::process::id());
    TempPartition(std::env::temp_dir().join(file))
}

/// 内存中的后备存储，可以按需注入故障
#[derive(Debug, Default)]
pub struct MemStore {
    pub data: Vec<u8>,
    /// 允许成功的写入次数，用尽后每次写入都失败
    pub writes_left: Option<usize>,
    pub fail_reads: bool,
    pub fail_sync: bool,
    pub fail_remove: bool,
}

impl MemStore {
    pub fn failing_after(writes: usize) -> Self {
        Self {
            writes_left: Some(writes),
            ..Self::default()
        }
    }
}

fn injected() -> io::Error {
    io::Error::other("injected failure")
}

impl BackingStore for MemStore {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_reads {
            return Err(injected());
        }

        let start = (offset as usize).min(self.data.len());
        let end = (start + buf.len()).min(self.data.len());
        buf[..end - start].copy_from_slice(&self.data[start..end]);

        Ok(end - start)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
        if let Some(left) = &mut self.writes_left {
            if *left == 0 {
                return Err(injected());
            }
            *left -= 1;
        }

        let start = offset as usize;
        let end = start + buf.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(buf);

        Ok(())
    }

    fn truncate(&mut self) -> io::Result<()> {
        self.data.clear();
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        if self.fail_sync {
            return Err(injected());
        }
        Ok(())
    }

    fn remove(self) -> io::Result<()> {
        if self.fail_remove {
            return Err(injected());
        }
        Ok(())
    }
}
