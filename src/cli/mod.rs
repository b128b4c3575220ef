pub mod emit;
pub mod init;
pub mod opts;
pub mod validate;
