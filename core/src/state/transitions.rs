//! 会话状态转换规则和验证

use super::types::SessionPhase;
use thiserror::Error;

/// 状态转换错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: SessionPhase,
        to: SessionPhase,
    },
}

/// 状态转换
pub struct SessionTransition;

impl SessionTransition {
    /// 验证状态转换是否合法
    pub fn validate(from: SessionPhase, to: SessionPhase) -> Result<(), TransitionError> {
        let is_valid = match (from, to) {
            // 初始化结束后进入两种终态之一
            (SessionPhase::Initializing, SessionPhase::Authenticated) => true,
            (SessionPhase::Initializing, SessionPhase::Unauthenticated) => true,

            // 登录 / 登出
            (SessionPhase::Unauthenticated, SessionPhase::Authenticated) => true,
            (SessionPhase::Authenticated, SessionPhase::Unauthenticated) => true,

            // 以另一个用户记录重新登录
            (SessionPhase::Authenticated, SessionPhase::Authenticated) => true,

            // 重复登出是无害的
            (SessionPhase::Unauthenticated, SessionPhase::Unauthenticated) => true,

            // 不能回到 Initializing
            (_, SessionPhase::Initializing) => false,
        };

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }
}
