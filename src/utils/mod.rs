// 工具模块
pub mod error;
pub mod shell;

pub use error::BottleError;
