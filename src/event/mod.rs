/// 更新金銀報價看板
pub mod refresh;
