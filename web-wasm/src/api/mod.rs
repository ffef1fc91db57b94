//! 推論サーバー連携

pub mod predict;
