pub mod blockchain_info;
