use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create backing store: {0}")]
    StoreCreate(#[source] io::Error),
    #[error("no free inode left")]
    NoFreeInode,
    #[error("no free block left")]
    NoFreeBlock,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("file not found")]
    FileNotFound,
    #[error("handle isn't bound to an open file")]
    FileNotBound,
    #[error("invalid seek base: {0}")]
    InvalidSeekBase(i32),
    #[error("seek target out of range")]
    OutOfRange,
    #[error("backing store I/O failure: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
