//! # chain-fs
//!
//! 在单个宿主文件（分区）中模拟的极简文件系统：
//! 固定容量的 inode 表、固定容量的数据块池，文件内容以块链的形式组织。
//!
//! ## 分层（自下而上）
//!
//! 1. 后备存储层：按块地址读写宿主文件
//! 2. 块池层：记录每个数据块的占用情况，首次适配分配
//! 3. 索引节点层：文件名与块链、打开会话的绑定
//! 4. 文件系统层：open/read/write/seek/delete 等操作
//!
//! 分区的元数据只存在于内存中，每次格式化都会重建为空。

mod block;
mod config;
mod error;
mod file;
mod fs;
mod inode;
mod store;

#[cfg(test)]
mod tests;

pub use self::{
    block::{BlockId, BlockState},
    config::Config,
    error::{Error, Result},
    file::{FileHandle, Stat, Whence},
    fs::ChainFileSystem,
    inode::InodeId,
    store::{BackingStore, PartitionFile},
};
