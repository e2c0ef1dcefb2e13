pub mod classifier;
pub mod contact;
pub mod file_service;
pub mod naming;
pub mod records;
pub mod storage;
