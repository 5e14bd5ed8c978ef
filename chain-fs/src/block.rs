//! # 块池层
//!
//! 块池是一块以 [`BlockId`] 寻址的定长区域，只记录每个块的占用情况，
//! 块的内容存放在后备存储中。
//! 文件占用的块由 [`Chain`] 按文件内顺序串起来，链上前一个块的后继即下一个元素。

use derive_more::{Display, From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[repr(transparent)]
pub struct BlockId(usize);

impl BlockId {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// 块在后备存储上的起始字节
    #[inline]
    pub fn offset(self, block_size: usize) -> u64 {
        (self.0 * block_size) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Free,
    Occupied,
}

#[derive(Debug)]
pub struct BlockPool {
    states: Vec<BlockState>,
}

impl BlockPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            states: vec![BlockState::Free; capacity],
        }
    }

    pub fn free_count(&self) -> usize {
        self.states
            .iter()
            .filter(|&&state| state == BlockState::Free)
            .count()
    }

    #[inline]
    pub fn state(&self, id: BlockId) -> Option<BlockState> {
        self.states.get(usize::from(id)).copied()
    }

    /// 首次适配：占用第一个空闲块并返回其编号。
    /// 若块池用尽，则返回空。
    pub fn alloc(&mut self) -> Option<BlockId> {
        let index = self
            .states
            .iter()
            .position(|&state| state == BlockState::Free)?;
        self.states[index] = BlockState::Occupied;

        Some(BlockId(index))
    }

    pub fn dealloc(&mut self, id: BlockId) {
        let state = &mut self.states[usize::from(id)];

        // 编号一定得指向已占用的块
        assert_eq!(*state, BlockState::Occupied, "block {id} is already free");

        *state = BlockState::Free;
    }

    /// 全部置为空闲
    pub fn reset(&mut self) {
        self.states.fill(BlockState::Free);
    }
}

/// 一个文件占用的块，按文件内顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain(Vec<BlockId>);

impl Chain {
    #[inline]
    pub fn new(head: BlockId) -> Self {
        Self(vec![head])
    }

    #[inline]
    pub fn head(&self) -> Option<BlockId> {
        self.0.first().copied()
    }

    /// 链上第`index`个块
    #[inline]
    pub fn get(&self, index: usize) -> Option<BlockId> {
        self.0.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 在链尾追加一个块
    #[inline]
    pub fn push(&mut self, id: BlockId) {
        self.0.push(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.0.iter().copied()
    }

    /// 把整条链交还给块池
    pub fn release(&mut self, pool: &mut BlockPool) {
        for id in self.0.drain(..) {
            pool.dealloc(id);
        }
    }
}
