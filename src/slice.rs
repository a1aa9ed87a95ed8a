/// Return the text strictly between the first `start` and the next `end` after it.
///
/// The two markers are searched independently: `end` is only looked for after
/// the first `start`. Returns an empty string when either marker is missing.
pub fn substring_between<'a>(input: &'a str, start: &str, end: &str) -> &'a str {
    let Some(start_index) = input.find(start) else {
        return "";
    };
    let body_start = start_index + start.len();
    let Some(end_offset) = input[body_start..].find(end) else {
        return "";
    };
    &input[body_start..body_start + end_offset]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("a[b]c", "[", "]", "b")]
    #[case("no markers", "[", "]", "")]
    #[case("start only [abc", "[", "]", "")]
    #[case("end only abc]", "[", "]", "")]
    #[case("]x[y]", "[", "]", "y")] // end before start is skipped
    #[case("|one|two|", "|", "|", "one")] // identical markers
    #[case("[first][second]", "[", "]", "first")]
    #[case("[]", "[", "]", "")]
    #[case("<<a>>b>>", "<<", ">>", "a")]
    #[case("héllo«wörld»", "«", "»", "wörld")]
    fn test_substring_between(
        #[case] input: &str,
        #[case] start: &str,
        #[case] end: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(substring_between(input, start, end), expected);
    }

    #[test]
    fn test_empty_markers() {
        assert_eq!(substring_between("abc", "", "c"), "ab");
        assert_eq!(substring_between("abc", "a", ""), "");
    }

    #[test]
    fn test_template_block_extraction() {
        let text = "pub struct T;\n/*<code>\nfn main() {}\n</code>*/\n";
        assert_eq!(
            substring_between(text, "/*<code>\n", "</code>*/"),
            "fn main() {}\n"
        );
    }

    proptest! {
        #[test]
        fn prop_round_trip(x in "[a-z ]{0,40}") {
            let wrapped = format!("<<{x}>>");
            let inner = substring_between(&wrapped, "<<", ">>");
            prop_assert_eq!(format!("<<{inner}>>"), wrapped);
        }

        #[test]
        fn prop_exact_between_first_markers(
            prefix in "[a-z]{0,10}",
            body in "[a-z]{0,10}",
            suffix in "[a-z#]{0,10}",
        ) {
            let input = format!("{prefix}@{body}#{suffix}");
            prop_assert_eq!(substring_between(&input, "@", "#"), body.as_str());
        }

        #[test]
        fn prop_missing_marker_is_empty(s in "[a-z]{0,30}") {
            prop_assert_eq!(substring_between(&s, "@", "z"), "");
            prop_assert_eq!(substring_between(&s, "a", "#"), "");
        }
    }
}
