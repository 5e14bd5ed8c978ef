use std::path::PathBuf;

use chain_fs::Config;
use clap::Parser;

#[derive(Parser)]
pub struct Cli {
    /// Host file acting as the partition
    #[arg(long, short, default_value = "partition.img")]
    pub partition: PathBuf,

    /// Bytes per data block
    #[arg(long, default_value_t = Config::BLOCK_SIZE)]
    pub block_size: usize,

    /// Number of data blocks in the pool
    #[arg(long, short, default_value_t = Config::MAX_BLOCKS)]
    pub blocks: usize,

    /// Number of inodes, i.e. the maximum file count
    #[arg(long, short, default_value_t = Config::INODE_COUNT)]
    pub inodes: usize,

    /// Recorded partition size in bytes
    #[arg(long, default_value_t = Config::PARTITION_SIZE)]
    pub partition_size: u64,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            block_size: self.block_size,
            max_blocks: self.blocks,
            inode_count: self.inodes,
            partition_size: self.partition_size,
        }
    }
}
