#![no_std]

pub mod bridge;
pub mod math;
