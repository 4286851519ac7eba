#![allow(dead_code)]

// Token-level assertions for built command lines

fn position(args: &[String], token: &str) -> Option<usize> {
    args.iter().position(|a| a == token)
}

/// Check the command contains `token` as a whole argument
pub fn assert_has_token(args: &[String], token: &str) {
    assert!(
        position(args, token).is_some(),
        "Expected command to contain '{}' but it didn't.\nCommand: {:?}",
        token,
        args
    );
}

pub fn assert_no_token(args: &[String], token: &str) {
    assert!(
        position(args, token).is_none(),
        "Expected command to NOT contain '{}' but it did.\nCommand: {:?}",
        token,
        args
    );
}

/// Check `flag` is immediately followed by `value`
pub fn assert_flag_value(args: &[String], flag: &str, value: &str) {
    let found = args.windows(2).any(|w| w[0] == flag && w[1] == value);
    assert!(
        found,
        "Expected command to contain '{} {}' but it didn't.\nCommand: {:?}",
        flag,
        value,
        args
    );
}

/// Check the first occurrence of `first` comes before the first `second`
pub fn assert_token_before(args: &[String], first: &str, second: &str) {
    let a = position(args, first)
        .unwrap_or_else(|| panic!("'{}' missing from {:?}", first, args));
    let b = position(args, second)
        .unwrap_or_else(|| panic!("'{}' missing from {:?}", second, args));
    assert!(
        a < b,
        "Expected '{}' before '{}'.\nCommand: {:?}",
        first,
        second,
        args
    );
}

/// Get the value following the first occurrence of `flag`
pub fn get_flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    position(args, flag).and_then(|i| args.get(i + 1)).map(String::as_str)
}
