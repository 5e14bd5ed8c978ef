//! # 文件系统层
//!
//! 组合后备存储、块池与 inode 表，对外提供按名字打开、按句柄读写的接口。
//! 所有操作都在调用内同步完成，修改状态的操作均需要`&mut self`。

use std::path::Path;

use crate::block::{BlockId, BlockPool, BlockState};
use crate::inode::InodeTable;
use crate::{BackingStore, Config, Error, FileHandle, InodeId, PartitionFile, Result, Stat, Whence};

#[derive(Debug)]
pub struct ChainFileSystem<S: BackingStore = PartitionFile> {
    config: Config,
    store: S,
    pool: BlockPool,
    inodes: InodeTable,
}

impl ChainFileSystem<PartitionFile> {
    /// 在宿主上创建（或清空）分区文件，并初始化空的 inode 表与块池。
    pub fn format(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate()?;

        let path = path.as_ref();
        let store = PartitionFile::create(path).map_err(|e| {
            log::error!("cannot create partition {path:?}: {e}");
            Error::StoreCreate(e)
        })?;
        log::info!(
            "partition={path:?} formatted: block_size={} blocks={} inodes={}",
            config.block_size,
            config.max_blocks,
            config.inode_count
        );

        Self::with_store(store, config)
    }
}

impl<S: BackingStore> ChainFileSystem<S> {
    /// 在给定的后备存储上建立文件系统，存储原有内容会被清空。
    pub fn with_store(mut store: S, config: Config) -> Result<Self> {
        config.validate()?;
        store.truncate().map_err(Error::StoreCreate)?;

        Ok(Self {
            config,
            store,
            pool: BlockPool::new(config.max_blocks),
            inodes: InodeTable::new(config.inode_count),
        })
    }

    /// 重新格式化：丢弃全部文件，之前的句柄一律失效。
    pub fn reformat(&mut self) -> Result<()> {
        self.inodes.reset();
        self.pool.reset();
        self.store.truncate()?;
        log::info!("partition reformatted");

        Ok(())
    }

    /// 打开文件，不存在则创建。
    ///
    /// 已打开的文件直接返回现有会话的句柄；
    /// 创建时先占用 inode 与链头块，任一不足都不会留下半绑定的 inode。
    pub fn open(&mut self, name: &str) -> Result<FileHandle> {
        if name.is_empty() {
            return Err(Error::InvalidArgument);
        }

        if let Some(id) = self.inodes.find(name) {
            let inode = self.inodes.get_mut(id);
            if !inode.is_open() {
                log::debug!("rebind session: name={name:?} inode={id} size={}", inode.size());
                inode.open();
            }
            return Ok(FileHandle::new(name, id));
        }

        let Some(id) = self.inodes.find_free() else {
            log::debug!("no free inode for {name:?}");
            return Err(Error::NoFreeInode);
        };
        let head = self.alloc_block()?;
        self.inodes.bind(id, name, head);
        log::debug!("create: name={name:?} inode={id} head={head}");

        Ok(FileHandle::new(name, id))
    }

    /// 从游标处写入`buf`，必要时在链尾追加块。
    ///
    /// 中途失败时返回已写入的字节数；一个字节都没写成才报错。
    pub fn write(&mut self, handle: &FileHandle, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        let id = self.bound_inode(handle)?;
        let block_size = self.config.block_size;

        let mut position = self.inodes.get(id).position();
        let mut written = 0;
        let mut failure = None;

        while written < buf.len() {
            let block = match self.block_at(id, position / block_size) {
                Ok(block) => block,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };

            let inner = position % block_size;
            let len = (block_size - inner).min(buf.len() - written);
            let offset = block.offset(block_size) + inner as u64;
            if let Err(e) = self.store.write_at(offset, &buf[written..written + len]) {
                failure = Some(Error::Io(e));
                break;
            }

            position += len;
            written += len;
        }

        let inode = self.inodes.get_mut(id);
        inode.set_position(position);
        inode.grow_to(position);

        match failure {
            Some(e) if written == 0 => Err(e),
            Some(e) => {
                log::warn!(
                    "partial write to {:?}: {written}/{} bytes, {e}",
                    handle.name(),
                    buf.len()
                );
                Ok(written)
            }
            None => Ok(written),
        }
    }

    /// 从文件开头读取，至多读满`buf`或读到文件末尾。
    ///
    /// 游标先回到开头，读完后停在已读字节之后。
    pub fn read(&mut self, handle: &FileHandle, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        let id = self.inodes.find(handle.name()).ok_or(Error::FileNotFound)?;
        let inode = self.inodes.get(id);
        if inode.chain().head().is_none() {
            return Err(Error::FileNotFound);
        }
        if id != handle.inode() || !inode.is_open() {
            return Err(Error::FileNotBound);
        }

        let block_size = self.config.block_size;
        let want = buf.len().min(inode.size());

        let mut read = 0;
        let mut failure = None;
        for block in inode.chain().iter() {
            if read == want {
                break;
            }

            let len = block_size.min(want - read);
            match self.store.read_at(block.offset(block_size), &mut buf[read..read + len]) {
                Ok(n) => {
                    read += n;
                    if n < len {
                        log::warn!("short read on block {block}: {n}/{len} bytes");
                        break;
                    }
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        self.inodes.get_mut(id).set_position(read);

        match failure {
            Some(e) if read == 0 => Err(Error::Io(e)),
            Some(e) => {
                log::warn!("partial read from {:?}: {read}/{want} bytes, {e}", handle.name());
                Ok(read)
            }
            None => Ok(read),
        }
    }

    /// 移动游标，目标必须落在`[0, size]`内，否则不做任何改动。
    pub fn seek(&mut self, handle: &FileHandle, offset: i64, whence: Whence) -> Result<usize> {
        let id = self.bound_inode(handle)?;
        let inode = self.inodes.get_mut(id);

        let base = match whence {
            Whence::Start => 0,
            Whence::Current => inode.position(),
            Whence::End => inode.size(),
        };
        let target = i64::try_from(base)
            .ok()
            .and_then(|base| base.checked_add(offset))
            .and_then(|target| usize::try_from(target).ok())
            .filter(|&target| target <= inode.size());

        let Some(target) = target else {
            log::debug!(
                "seek out of range: name={:?} base={base} offset={offset} size={}",
                handle.name(),
                inode.size()
            );
            return Err(Error::OutOfRange);
        };
        inode.set_position(target);

        Ok(target)
    }

    /// 解除句柄与文件的绑定，文件内容与大小保留。
    pub fn close(&mut self, handle: &FileHandle) -> Result<()> {
        let id = self.bound_inode(handle)?;
        self.inodes.get_mut(id).close();
        log::debug!("close: name={:?} inode={id}", handle.name());

        Ok(())
    }

    pub fn stat(&self, handle: &FileHandle) -> Result<Stat> {
        let inode = self.inodes.get(self.bound_inode(handle)?);

        Ok(Stat {
            size: inode.size(),
            position: inode.position(),
            blocks: inode.chain().len(),
            block_size: self.config.block_size,
        })
    }

    /// 删除文件：整条块链回到空闲状态，inode 槽位腾空。
    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        let Some(id) = self.inodes.find(name) else {
            log::debug!("delete: no such file {name:?}");
            return Err(Error::FileNotFound);
        };

        let blocks = self.inodes.get(id).chain().len();
        self.inodes.release(id, &mut self.pool);
        log::info!("deleted {name:?}: inode={id} blocks={blocks}");

        Ok(())
    }

    /// 按 inode 表的顺序列出所有文件名
    pub fn list_files(&self) -> impl Iterator<Item = &str> + '_ {
        self.inodes.names()
    }

    #[inline]
    pub fn file_count(&self) -> usize {
        self.list_files().count()
    }

    /// 关闭并删除分区文件。
    ///
    /// 关闭或删除失败只会被记录并返回，内存中的状态无论如何都会释放。
    pub fn delete_partition(self) -> Result<()> {
        let Self {
            mut store,
            pool,
            inodes,
            ..
        } = self;

        let closed = store.sync();
        if let Err(e) = &closed {
            log::error!("failed to close partition: {e}");
        }

        drop(inodes);
        drop(pool);

        let removed = store.remove();
        if let Err(e) = &removed {
            log::error!("failed to remove partition: {e}");
        }

        closed.and(removed).map_err(Error::Io)?;
        log::info!("partition deleted");

        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn partition_size(&self) -> u64 {
        self.config.partition_size
    }

    #[inline]
    pub fn free_blocks(&self) -> usize {
        self.pool.free_count()
    }

    #[inline]
    pub fn block_state(&self, id: BlockId) -> Option<BlockState> {
        self.pool.state(id)
    }

    #[inline]
    pub fn free_inodes(&self) -> usize {
        self.inodes.free_count()
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: BackingStore> ChainFileSystem<S> {
    /// 找到句柄所绑定的、处于打开状态的 inode。
    /// 名字须仍由句柄记录的那个 inode 持有，文件删除后重建的同名文件不算。
    fn bound_inode(&self, handle: &FileHandle) -> Result<InodeId> {
        match self.inodes.find(handle.name()) {
            Some(id) if id == handle.inode() && self.inodes.get(id).is_open() => Ok(id),
            _ => Err(Error::FileNotBound),
        }
    }

    /// 分配一个块，并在后备存储上将其清零
    fn alloc_block(&mut self) -> Result<BlockId> {
        let Some(id) = self.pool.alloc() else {
            log::debug!("block pool exhausted");
            return Err(Error::NoFreeBlock);
        };

        let block_size = self.config.block_size;
        if let Err(e) = self.store.write_at(id.offset(block_size), &vec![0; block_size]) {
            self.pool.dealloc(id);
            return Err(Error::Io(e));
        }
        log::trace!("alloc block={id}");

        Ok(id)
    }

    /// 链上第`index`个块，链不够长时逐块向后扩展
    fn block_at(&mut self, id: InodeId, index: usize) -> Result<BlockId> {
        loop {
            if let Some(block) = self.inodes.get(id).chain().get(index) {
                return Ok(block);
            }
            let block = self.alloc_block()?;
            self.inodes.get_mut(id).chain_mut().push(block);
        }
    }
}

