pub mod ci;
pub mod freeze;
pub mod init;
pub mod preview;
pub mod serve;
