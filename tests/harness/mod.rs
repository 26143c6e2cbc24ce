#![allow(dead_code)]

pub mod temp_db;
pub mod wait;
