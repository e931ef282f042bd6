//! Attribute string conversions.
//!
//! Attribute values are strings; these helpers convert the common shapes
//! (booleans, integers, `"WxH"` sizes, `A=1, B=2` lists).

use crate::types::Size;

/// `YES`, `ON`, `TRUE` and `1` (any case) are true, everything else false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_uppercase().as_str(),
        "YES" | "ON" | "TRUE" | "1"
    )
}

/// The whole value as an integer, ignoring surrounding whitespace.
pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// Parse `"WxH"`. Either side may be empty or missing, in which case it is 0.
///
/// ```
/// use trellis::{parse_size, Size};
/// assert_eq!(parse_size("100x20"), Size::new(100, 20));
/// assert_eq!(parse_size("x20"), Size::new(0, 20));
/// assert_eq!(parse_size("100"), Size::new(100, 0));
/// ```
pub fn parse_size(value: &str) -> Size {
    let value = value.trim();
    let (w, h) = match value.find(['x', 'X']) {
        Some(split) => (&value[..split], &value[split + 1..]),
        None => (value, ""),
    };
    Size::new(
        parse_int(w).unwrap_or(0).max(0),
        parse_int(h).unwrap_or(0).max(0),
    )
}

pub fn format_size(size: Size) -> String {
    format!("{}x{}", size.width, size.height)
}

/// Parse `"x,y"` coordinates.
pub fn parse_point(value: &str) -> (i32, i32) {
    let mut parts = value.split(',');
    let x = parts.next().and_then(parse_int).unwrap_or(0);
    let y = parts.next().and_then(parse_int).unwrap_or(0);
    (x, y)
}

/// Parse an attribute list such as `TITLE="Hello, world", EXPAND=YES, ACTIVE`.
///
/// Names without `=` get `None` as value. Values may be quoted to contain
/// commas; quotes are stripped.
pub fn parse_list(list: &str) -> Vec<(String, Option<String>)> {
    let mut result = Vec::new();
    let mut chars = list.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut name = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && *c != ',') {
            name.push(c);
        }
        let name = name.trim().to_owned();

        let value = if chars.next_if_eq(&'=').is_some() {
            while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}
            let mut value = String::new();
            if chars.next_if_eq(&'"').is_some() {
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    value.push(c);
                }
                // Skip anything up to the separator.
                while chars.next_if(|c| *c != ',').is_some() {}
                Some(value)
            } else {
                while let Some(c) = chars.next_if(|c| *c != ',') {
                    value.push(c);
                }
                Some(value.trim_end().to_owned())
            }
        } else {
            None
        };

        if !name.is_empty() {
            result.push((name, value));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("YES"));
        assert!(parse_bool("on"));
        assert!(parse_bool(" 1 "));
        assert!(!parse_bool("NO"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_parse_int_takes_whole_value() {
        assert_eq!(parse_int(" 42 "), Some(42));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("12px"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100x20"), Size::new(100, 20));
        assert_eq!(parse_size("100X20"), Size::new(100, 20));
        assert_eq!(parse_size("x20"), Size::new(0, 20));
        assert_eq!(parse_size("-5x3"), Size::new(0, 3));
        assert_eq!(parse_size(""), Size::ZERO);
        assert_eq!(format_size(Size::new(3, 4)), "3x4");
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10,20"), (10, 20));
        assert_eq!(parse_point("7"), (7, 0));
    }

    #[test]
    fn test_parse_list() {
        let list = parse_list(r#"TITLE="Hello, world", EXPAND=YES,ACTIVE , GAP = 5"#);
        assert_eq!(
            list,
            vec![
                ("TITLE".to_string(), Some("Hello, world".to_string())),
                ("EXPAND".to_string(), Some("YES".to_string())),
                ("ACTIVE".to_string(), None),
                ("GAP".to_string(), Some("5".to_string())),
            ]
        );
        assert!(parse_list("  ,, ").is_empty());
    }
}
