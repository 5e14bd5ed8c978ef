use crate::block::{BlockId, BlockPool, BlockState, Chain};
use crate::inode::{InodeId, InodeTable};
use crate::{Config, Error, Whence};

#[test]
fn pool_first_fit() {
    let mut pool = BlockPool::new(3);
    assert_eq!(Some(BlockId::new(0)), pool.alloc());
    assert_eq!(Some(BlockId::new(1)), pool.alloc());

    pool.dealloc(BlockId::new(0));
    assert_eq!(Some(BlockState::Free), pool.state(BlockId::new(0)));
    assert_eq!(Some(BlockId::new(0)), pool.alloc());
    assert_eq!(Some(BlockId::new(2)), pool.alloc());
    assert_eq!(None, pool.alloc());
    assert_eq!(0, pool.free_count());

    pool.reset();
    assert_eq!(3, pool.free_count());
}

#[test]
#[should_panic]
fn pool_double_free() {
    let mut pool = BlockPool::new(1);
    let id = pool.alloc().unwrap();
    pool.dealloc(id);
    pool.dealloc(id);
}

#[test]
fn chain_release() {
    let mut pool = BlockPool::new(4);
    let mut chain = Chain::new(pool.alloc().unwrap());
    chain.push(pool.alloc().unwrap());
    chain.push(pool.alloc().unwrap());

    assert_eq!(Some(BlockId::new(0)), chain.head());
    assert_eq!(Some(BlockId::new(2)), chain.get(2));
    assert_eq!(None, chain.get(3));
    assert_eq!(1, pool.free_count());

    chain.release(&mut pool);
    assert!(chain.is_empty());
    assert_eq!(4, pool.free_count());
}

#[test]
fn block_offset() {
    assert_eq!(0, BlockId::new(0).offset(512));
    assert_eq!(1536, BlockId::new(3).offset(512));
}

#[test]
fn inode_bind_and_release() {
    let mut pool = BlockPool::new(2);
    let mut table = InodeTable::new(2);

    let id = table.find_free().unwrap();
    table.bind(id, "a.txt", pool.alloc().unwrap());
    assert_eq!(Some(id), table.find("a.txt"));
    assert_eq!(None, table.find("b.txt"));
    assert!(table.get(id).is_open());
    assert_eq!(1, table.free_count());

    table.release(id, &mut pool);
    assert_eq!(None, table.find("a.txt"));
    assert_eq!(2, pool.free_count());
    assert_eq!(2, table.free_count());
}

#[test]
fn inode_names_in_table_order() {
    let mut pool = BlockPool::new(3);
    let mut table = InodeTable::new(3);
    for name in ["x", "y", "z"] {
        let id = table.find_free().unwrap();
        table.bind(id, name, pool.alloc().unwrap());
    }
    table.release(InodeId::from(1), &mut pool);

    assert_eq!(vec!["x", "z"], table.names().collect::<Vec<_>>());

    // 空出的槽位优先复用
    let id = table.find_free().unwrap();
    table.bind(id, "w", pool.alloc().unwrap());
    assert_eq!(vec!["x", "w", "z"], table.names().collect::<Vec<_>>());
}

#[test]
fn session_position() {
    let mut pool = BlockPool::new(1);
    let mut table = InodeTable::new(1);
    let id = table.find_free().unwrap();
    table.bind(id, "f", pool.alloc().unwrap());

    let inode = table.get_mut(id);
    inode.grow_to(10);
    inode.set_position(7);
    assert_eq!(7, inode.position());

    inode.close();
    assert!(!inode.is_open());
    assert_eq!(0, inode.position());
    assert_eq!(10, inode.size());

    inode.open();
    assert_eq!(0, inode.position());
}

#[test]
fn whence_from_raw() {
    assert_eq!(Whence::Start, Whence::try_from(0).unwrap());
    assert_eq!(Whence::Current, Whence::try_from(1).unwrap());
    assert_eq!(Whence::End, Whence::try_from(2).unwrap());
    assert!(matches!(Whence::try_from(3), Err(Error::InvalidSeekBase(3))));
    assert!(matches!(Whence::try_from(-1), Err(Error::InvalidSeekBase(-1))));
}

#[test]
fn config_defaults() {
    let config = Config::default();
    assert_eq!(512, config.block_size);
    assert_eq!(100, config.max_blocks);
    assert_eq!(16, config.inode_count);
    assert_eq!(51200, config.pool_bytes());

    let zero = Config {
        block_size: 0,
        ..Config::default()
    };
    assert!(matches!(zero.validate(), Err(Error::InvalidArgument)));

    let overflow = Config {
        block_size: usize::MAX / 2 + 1,
        max_blocks: 4,
        ..Config::default()
    };
    assert!(matches!(overflow.validate(), Err(Error::InvalidArgument)));
    assert_eq!(u64::MAX, overflow.pool_bytes());
}
