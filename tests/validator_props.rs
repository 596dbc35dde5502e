// Property tests for the contact identifier validator

use clipboard_converter::validator::validate;
use proptest::prelude::*;

fn seps(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

proptest! {
    /// 修剪后字符数不是 16 的输入永远不合法
    #[test]
    fn length_other_than_16_never_validates(s in "\\PC{0,32}") {
        prop_assume!(s.trim().chars().count() != 16);
        prop_assert!(!validate(&s, &seps(&[",", "-", "#", "，"])));
    }

    /// 11 位数字 + 单字符非数字分隔符 + 4 位数字恒为合法
    #[test]
    fn well_formed_identifier_always_validates(
        contact in "[0-9]{11}",
        extension in "[0-9]{4}",
        sep in prop::sample::select(vec![',', '-', '#', ' ', '，', '＃']),
    ) {
        let candidate = format!("{}{}{}", contact, sep, extension);
        prop_assert!(validate(&candidate, &[sep.to_string()]));
    }

    /// 同一骨架下，只有单字符分隔符 token 能命中
    ///
    /// 候选串的下标 11 放 token 的首字符：token 长度为 1 时命中，
    /// 更长时它的完整串在候选里根本不出现。
    #[test]
    fn only_single_char_tokens_match_the_frame(
        contact in "[0-9]{11}",
        extension in "[0-9]{4}",
        sep in "[a-z]{1,3}",
    ) {
        let first = sep.chars().next().unwrap();
        let candidate = format!("{}{}{}", contact, first, extension);
        let expected = sep.chars().count() == 1;
        prop_assert_eq!(validate(&candidate, &[sep.clone()]), expected);
    }

    /// 分隔符表的顺序不影响合法性结论
    #[test]
    fn separator_order_does_not_change_outcome(
        contact in "[0-9]{11}",
        extension in "[0-9]{4}",
    ) {
        let candidate = format!("{},{}", contact, extension);
        let forward = seps(&[",", "-", "#"]);
        let mut reversed = forward.clone();
        reversed.reverse();
        prop_assert_eq!(validate(&candidate, &forward), validate(&candidate, &reversed));
    }

    /// 首尾空白不影响合法性
    #[test]
    fn surrounding_whitespace_is_ignored(
        contact in "[0-9]{11}",
        extension in "[0-9]{4}",
        left in "[ \\t]{0,3}",
        right in "[ \\t\\n]{0,3}",
    ) {
        let candidate = format!("{}{},{}{}", left, contact, extension, right);
        prop_assert!(validate(&candidate, &seps(&[","])));
    }

    /// 任何一个数字槽位被污染都会使校验失败
    #[test]
    fn corrupted_digit_slot_never_validates(
        contact in "[0-9]{11}",
        extension in "[0-9]{4}",
        pos in 0usize..16,
        bad in prop::sample::select(vec!['a', 'x', '!', '字']),
    ) {
        prop_assume!(pos != 11);
        let mut chars: Vec<char> = format!("{},{}", contact, extension).chars().collect();
        chars[pos] = bad;
        let candidate: String = chars.into_iter().collect();
        prop_assert!(!validate(&candidate, &seps(&[","])));
    }

    /// 空白串永远不合法
    #[test]
    fn whitespace_only_never_validates(s in "[ \\t\\n]{0,20}") {
        prop_assert!(!validate(&s, &seps(&[","])));
    }
}
