use crate::{Error, InodeId};

/// 打开文件得到的句柄。
///
/// 句柄只携带文件名，每次操作都通过文件名找回拥有它的 inode；
/// 文件被删除或关闭后，句柄随之失效。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    name: String,
    inode: InodeId,
}

impl FileHandle {
    pub(crate) fn new(name: &str, inode: InodeId) -> Self {
        Self {
            name: name.to_owned(),
            inode,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 打开时所在的 inode
    #[inline]
    pub fn inode(&self) -> InodeId {
        self.inode
    }
}

/// 定位的基准
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Whence {
    /// 文件开头
    Start = 0,
    /// 当前游标
    Current = 1,
    /// 文件末尾
    End = 2,
}

impl TryFrom<i32> for Whence {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            raw => Err(Error::InvalidSeekBase(raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    /// File size
    pub size: usize,
    /// Cursor of the open session
    pub position: usize,
    /// Occupying blocks
    pub blocks: usize,
    pub block_size: usize,
}
