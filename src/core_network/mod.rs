pub mod codec;
pub mod connection;
pub mod network;
pub mod pasv;
