//! 联系号码结构校验模块
//!
//! # 设计思路
//!
//! 剪贴板里的候选文本必须是固定形状的"号码+分机号"标识：
//! 11 位数字 + 1 个分隔符 + 4 位数字，共 16 个字符。
//! 分隔符本身是什么字符无所谓，只要求它首次出现的位置恰好在
//! 下标 11；两侧的数字窗口分别独立校验。
//!
//! # 实现思路
//!
//! - 以 `char` 为单位计算下标与长度，全角分隔符（如 `，`）按 1 个字符处理。
//! - 对每个分隔符 token 求"首次出现位置"，命中下标 11 即为匹配，
//!   按列表顺序取第一个命中者。
//! - 多字符分隔符不做特判：它的尾部会落进 12–15 的数字窗口，
//!   数字校验自然拒绝。空 token 的首次出现位置是 0，同样永不命中。
//! - 纯函数、无副作用，永远返回布尔结果。

/// 标识总长度（字符数）
pub const IDENTIFIER_LEN: usize = 16;

/// 号码部分长度，同时也是分隔符应出现的下标
pub const CONTACT_DIGITS: usize = 11;

/// 分机号部分长度
pub const EXTENSION_DIGITS: usize = 4;

/// 校验候选文本是否为合法的联系号码标识
///
/// # 参数
/// * `candidate` - 剪贴板候选文本（首尾空白会被忽略）
/// * `separators` - 分隔符列表，按顺序尝试
///
/// # 示例
/// ```rust
/// use clipboard_converter::validator::validate;
///
/// let separators = vec![",".to_string()];
/// assert!(validate("12345678901,6789", &separators));
/// assert!(!validate("1234567890,16789", &separators));
/// ```
pub fn validate(candidate: &str, separators: &[String]) -> bool {
    matching_separator(candidate, separators).is_some()
}

/// 返回第一个命中的分隔符（按列表顺序），未命中返回 `None`
///
/// `validate` 即 `matching_separator(..).is_some()`；单独暴露命中者
/// 便于上层打印"以哪个分隔符匹配"的调试日志。
pub fn matching_separator<'a>(candidate: &str, separators: &'a [String]) -> Option<&'a str> {
    let chars: Vec<char> = candidate.trim().chars().collect();

    if chars.len() != IDENTIFIER_LEN {
        return None;
    }
    if !digit_windows_valid(&chars) {
        return None;
    }

    separators
        .iter()
        .find(|sep| {
            let token: Vec<char> = sep.chars().collect();
            first_occurrence(&chars, &token) == Some(CONTACT_DIGITS)
        })
        .map(String::as_str)
}

/// 校验两侧数字窗口：0–10 与 12–15 必须全为 ASCII 数字
///
/// 下标 11 是分隔符槽位，不做数字检查。
fn digit_windows_valid(chars: &[char]) -> bool {
    chars[..CONTACT_DIGITS].iter().all(|c| c.is_ascii_digit())
        && chars[CONTACT_DIGITS + 1..IDENTIFIER_LEN]
            .iter()
            .all(|c| c.is_ascii_digit())
}

/// token 在 chars 中的首次出现位置（字符下标）
///
/// 空 token 约定出现在下标 0。
fn first_occurrence(chars: &[char], token: &[char]) -> Option<usize> {
    if token.is_empty() {
        return Some(0);
    }
    if token.len() > chars.len() {
        return None;
    }
    chars.windows(token.len()).position(|window| window == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seps(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_comma_identifier_accepted() {
        assert!(validate("12345678901,6789", &seps(&[","])));
    }

    #[test]
    fn test_separator_at_wrong_index_rejected() {
        // 逗号出现在下标 10 而非 11
        assert!(!validate("1234567890,16789", &seps(&[","])));
    }

    #[test]
    fn test_length_other_than_16_rejected() {
        assert!(!validate("", &seps(&[","])));
        assert!(!validate("12345678901,678", &seps(&[","])));
        assert!(!validate("12345678901,67890", &seps(&[","])));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert!(validate("  12345678901,6789\n", &seps(&[","])));
    }

    #[test]
    fn test_fullwidth_separator_counts_as_one_char() {
        assert!(validate("12345678901，6789", &seps(&["，"])));
    }

    #[test]
    fn test_separator_char_value_is_irrelevant() {
        assert!(validate("12345678901#6789", &seps(&["#"])));
        assert!(validate("12345678901 6789", &seps(&[" "])));
    }

    #[test]
    fn test_non_digit_in_contact_window_rejected() {
        assert!(!validate("1234567890a,6789", &seps(&[","])));
    }

    #[test]
    fn test_non_digit_in_extension_window_rejected() {
        assert!(!validate("12345678901,67a9", &seps(&[","])));
    }

    #[test]
    fn test_multichar_separator_tail_breaks_digit_window() {
        // "ab" 首次出现位置确实是 11，但 'b' 落进数字窗口
        assert!(!validate("12345678901ab345", &seps(&["ab"])));
    }

    #[test]
    fn test_empty_separator_token_never_matches() {
        assert!(!validate("12345678901,6789", &seps(&[""])));
    }

    #[test]
    fn test_empty_separator_set_never_matches() {
        assert!(!validate("12345678901,6789", &[]));
    }

    #[test]
    fn test_first_listed_separator_wins() {
        let both = seps(&[",", "-"]);
        assert_eq!(matching_separator("12345678901,6789", &both), Some(","));
        assert_eq!(matching_separator("12345678901-6789", &both), Some("-"));

        // 列表顺序只决定命中者，不影响结果
        let reversed = seps(&["-", ","]);
        assert!(validate("12345678901,6789", &reversed));
    }

    #[test]
    fn test_digit_separator_shadowed_by_earlier_occurrence() {
        // 分隔符 "5" 在号码里更早出现，首次出现位置不是 11
        assert!(!validate("1234567890159999", &seps(&["5"])));
        // 号码部分不含 "9"，下标 11 恰好是它本身
        assert!(validate("1234567810093456", &seps(&["9"])));
    }
}
