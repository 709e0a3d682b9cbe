pub fn check_control_leading_trailing<G>(
    given: G,
    max_chars: Option<usize>
) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();
    let mut iter = given_ref.chars();
    let mut char_count = 0;

    if let Some(ch) = iter.next() {
        char_count += 1;

        if ch.is_control() || ch.is_whitespace() {
            return false
        }
    }

    if let Some(ch) = iter.next_back() {
        char_count += 1;

        if ch.is_control() || ch.is_whitespace() {
            return false
        }
    }

    if let Some(max_chars) = max_chars {
        while let Some(ch) = iter.next() {
            if ch.is_control() {
                return false;
            }

            char_count += 1;

            if char_count > max_chars {
                return false;
            }
        }

        if char_count > max_chars {
            return false;
        }
    } else {
        for ch in iter {
            if ch.is_control() {
                return false;
            }
        }
    }

    true
}

/// maximum characters allowed for a file or folder name
pub const ENTRY_NAME_MAX: usize = 255;

/// checks that the given string is usable as the name of a file or folder.
///
/// separators are rejected since entry names are always a single path
/// segment, as are the "." and ".." segments.
pub fn entry_name_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if given_ref.is_empty() || given_ref == "." || given_ref == ".." {
        return false;
    }

    if given_ref.contains('/') || given_ref.contains('\\') {
        return false;
    }

    check_control_leading_trailing(given_ref, Some(ENTRY_NAME_MAX))
}

pub const USERNAME_MAX: usize = 100;

pub fn username_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if given_ref.is_empty() {
        return false;
    }

    for ch in given_ref.chars() {
        if ch.is_control() || ch.is_whitespace() {
            return false;
        }
    }

    given_ref.chars().count() <= USERNAME_MAX
}

pub const TITLE_MAX: usize = 512;

pub fn title_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if given_ref.is_empty() {
        return false;
    }

    check_control_leading_trailing(given_ref, Some(TITLE_MAX))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn check_control_leading_trailing_whitespace_chars() {
        let leading = String::from(" test");
        let trailing = String::from("test ");

        assert!(!check_control_leading_trailing(leading, None), "leading whitespace characters");
        assert!(!check_control_leading_trailing(trailing, None), "trailing whitespace characters");
    }

    #[test]
    fn check_control_leading_trailing_control_chars() {
        let trailing = String::from("test\u{0000}");
        let leading = String::from("\u{0000}test");
        let contains = String::from("test\u{0000}test");

        assert!(!check_control_leading_trailing(trailing, None), "trailing control characters");
        assert!(!check_control_leading_trailing(leading, None), "leading control characters");
        assert!(!check_control_leading_trailing(contains, None), "contains control characters");
    }

    #[test]
    fn entry_name_valid_rejects_separators() {
        assert!(!entry_name_valid("a/b"));
        assert!(!entry_name_valid("a\\b"));
        assert!(!entry_name_valid("."));
        assert!(!entry_name_valid(".."));
        assert!(!entry_name_valid(""));
    }

    #[test]
    fn entry_name_valid_accepts_plain_names() {
        assert!(entry_name_valid("report.pdf"));
        assert!(entry_name_valid("Quarterly Notes"));
    }

    #[test]
    fn username_valid_rejects_whitespace() {
        assert!(!username_valid("jane smith"));
        assert!(username_valid("jane.smith"));
    }
}
