pub mod init;
pub mod keygen;
pub mod pay;
pub mod verify;
