// src/constants.rs

pub const SERVER_NAME: &str = "sandftpd";
pub const DEFAULT_LISTEN_PORT: u16 = 21;
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 100;
pub const DEFAULT_TRANSFER_BUFFER_SIZE: usize = 64 * 1024;

/// Longest control line accepted, terminator included.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;
pub const LISTING_CHUNK_SIZE: usize = 1024;
pub const LISTING_PROGRAM: &str = "ls";
