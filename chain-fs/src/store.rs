//! # 后备存储层
//!
//! 分区的全部字节都落在一个宿主文件里，块`i`位于
//! `[i * block_size, (i + 1) * block_size)`。
//! 所有读写都按地址定位，不依赖存储自身的游标。

use std::fmt::Debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub trait BackingStore: Debug {
    /// 从`offset`处读取至多`buf.len()`字节，返回实际读到的字节数。
    /// 越过存储末尾时读到的字节数会少于`buf.len()`。
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// 在`offset`处写入整个`buf`
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()>;

    /// 清空存储
    fn truncate(&mut self) -> io::Result<()>;

    /// 把缓冲的数据刷写到宿主
    fn sync(&mut self) -> io::Result<()>;

    /// 关闭并删除存储
    fn remove(self) -> io::Result<()>
    where
        Self: Sized;
}

/// 作为分区的宿主文件
#[derive(Debug)]
pub struct PartitionFile {
    path: PathBuf,
    file: File,
}

impl PartitionFile {
    /// 创建分区文件，若已存在则清空
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self { path, file })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackingStore for PartitionFile {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;

        let mut read = 0;
        while read < buf.len() {
            match self.file.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(read)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)
    }

    fn truncate(&mut self) -> io::Result<()> {
        self.file.set_len(0)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn remove(self) -> io::Result<()> {
        let Self { path, file } = self;
        drop(file);
        fs::remove_file(path)
    }
}
