pub mod adapt;
pub mod init;
pub mod serve;
