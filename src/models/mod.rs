//! 数据模型模块

pub mod article;
pub mod auth;
pub mod response;
pub mod user;

use validator::ValidationError;

/// 按字符数校验长度，过短与过长使用不同的提示
pub(crate) fn check_length(
    value: &str,
    min: usize,
    max: usize,
    too_short: &'static str,
    too_long: &'static str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new("length").with_message(too_short.into()));
    }
    if len > max {
        return Err(ValidationError::new("length").with_message(too_long.into()));
    }
    Ok(())
}
