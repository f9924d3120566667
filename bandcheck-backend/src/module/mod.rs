pub mod bands;
pub mod catalog;
pub mod device;
pub mod operator;
pub mod report;
