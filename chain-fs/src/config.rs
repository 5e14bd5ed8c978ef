use crate::{Error, Result};

/// 分区的可调参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 数据块的字节数
    pub block_size: usize,
    /// 块池容量
    pub max_blocks: usize,
    /// inode 表容量，即文件数的上限
    pub inode_count: usize,
    /// 分区大小，仅作记录
    pub partition_size: u64,
}

impl Config {
    pub const BLOCK_SIZE: usize = 512;
    pub const MAX_BLOCKS: usize = 100;
    pub const INODE_COUNT: usize = 16;
    pub const PARTITION_SIZE: u64 = 32768;

    /// 块池在后备存储上覆盖的字节数
    #[inline]
    pub fn pool_bytes(&self) -> u64 {
        self.checked_pool_bytes().unwrap_or(u64::MAX)
    }

    fn checked_pool_bytes(&self) -> Option<u64> {
        self.block_size
            .checked_mul(self.max_blocks)
            .and_then(|bytes| u64::try_from(bytes).ok())
    }

    /// 块大小不能为 0，块池覆盖的字节数也得能用`usize`和`u64`表示
    pub(crate) fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.checked_pool_bytes().is_none() {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: Self::BLOCK_SIZE,
            max_blocks: Self::MAX_BLOCKS,
            inode_count: Self::INODE_COUNT,
            partition_size: Self::PARTITION_SIZE,
        }
    }
}
