//! # 索引节点层
//!
//! inode 表容量固定，按名字线性查找。
//! 被占用的 inode 一定拥有名字和非空的块链，并至多绑定一个打开会话。

use derive_more::{Display, From, Into};

use crate::block::{BlockId, BlockPool, Chain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[repr(transparent)]
pub struct InodeId(usize);

/// 打开会话：记录读写游标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Session {
    position: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Inode {
    name: Option<String>,
    chain: Chain,
    /// 文件大小，会话关闭后依然保留
    size: usize,
    session: Option<Session>,
}

impl Inode {
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.name.is_some()
    }

    #[inline]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    #[inline]
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 只增不减
    #[inline]
    pub fn grow_to(&mut self, size: usize) {
        self.size = self.size.max(size);
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// 未打开时为 0
    #[inline]
    pub fn position(&self) -> usize {
        self.session.map_or(0, |session| session.position)
    }

    #[inline]
    pub fn set_position(&mut self, position: usize) {
        if let Some(session) = &mut self.session {
            session.position = position;
        }
    }

    /// 绑定新会话，游标归零；已打开时什么也不做
    pub fn open(&mut self) {
        self.session.get_or_insert_with(Session::default);
    }

    pub fn close(&mut self) {
        self.session = None;
    }
}

#[derive(Debug)]
pub(crate) struct InodeTable {
    inodes: Vec<Inode>,
}

impl InodeTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            inodes: (0..capacity).map(|_| Inode::default()).collect(),
        }
    }

    #[inline]
    pub fn get(&self, id: InodeId) -> &Inode {
        &self.inodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: InodeId) -> &mut Inode {
        &mut self.inodes[id.0]
    }

    /// 根据文件名查找被占用的 inode
    pub fn find(&self, name: &str) -> Option<InodeId> {
        self.inodes
            .iter()
            .position(|inode| inode.name() == Some(name))
            .map(InodeId)
    }

    /// 第一个空闲的 inode
    pub fn find_free(&self) -> Option<InodeId> {
        self.inodes
            .iter()
            .position(|inode| !inode.is_occupied())
            .map(InodeId)
    }

    /// 在空闲 inode 上创建文件：绑定名字、链头以及一个新会话
    pub fn bind(&mut self, id: InodeId, name: &str, head: BlockId) {
        let inode = self.get_mut(id);
        debug_assert!(!inode.is_occupied() && inode.chain.is_empty());

        *inode = Inode {
            name: Some(name.to_owned()),
            chain: Chain::new(head),
            size: 0,
            session: Some(Session::default()),
        };
    }

    /// 回收 inode 及其整条块链
    pub fn release(&mut self, id: InodeId, pool: &mut BlockPool) {
        let inode = self.get_mut(id);
        inode.chain.release(pool);
        *inode = Inode::default();
    }

    /// 按表内顺序给出所有文件名
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inodes.iter().filter_map(Inode::name)
    }

    pub fn free_count(&self) -> usize {
        self.inodes
            .iter()
            .filter(|inode| !inode.is_occupied())
            .count()
    }

    /// 丢弃全部绑定，不触碰块池
    pub fn reset(&mut self) {
        self.inodes.fill_with(Inode::default);
    }
}
