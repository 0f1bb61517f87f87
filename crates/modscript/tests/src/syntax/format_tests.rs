    use super::*;

    fn canonical(input: &str) -> String {
        format_code(input).expect("input should parse")
    }

    #[test]
    fn inline_object_is_expanded() {
        assert_eq!(canonical("a = { b = 1 }"), "a = {\n    b = 1\n}");
    }

    #[test]
    fn inline_and_multiline_forms_are_equivalent() {
        let inline = canonical("a = { b = { c = 1 } d = yes }");
        let multiline = canonical("a = {\n\tb = {\n\t\tc = 1\n\t}\n\n\td = yes\n}\n");
        assert_eq!(inline, multiline);
        assert_eq!(inline, "a = {\n    b = {\n        c = 1\n    }\n    d = yes\n}");
    }

    #[test]
    fn key_and_brace_on_separate_lines_form_one_block() {
        let inline = canonical("a { b = 1 }");
        assert_eq!(canonical("a\n{\n    b = 1\n}"), inline);
        assert_eq!(inline, "a {\n    b = 1\n}");
    }

    #[test]
    fn stacked_closing_braces_recover_depth() {
        let text = canonical("a = {\n  b = {\n    c = 1 } }\nd = 2");
        assert_eq!(text, "a = {\n    b = {\n        c = 1\n    }\n}\nd = 2");
    }

    #[test]
    fn numeric_literals_are_normalized() {
        assert_eq!(canonical("x = 0.20"), "x = 0.2");
        assert_eq!(canonical("x = 10.0"), "x = 10");
        assert_eq!(canonical("x = -1.500"), "x = -1.5");
        assert_eq!(canonical("x = { 0.50 1.0 }"), "x = {\n    0.5\n    1\n}");
    }

    #[test]
    fn non_decimal_tokens_are_untouched() {
        assert_eq!(canonical("start_date = 2200.01.01"), "start_date = 2200.01.01");
        assert_eq!(canonical("name = \"0.50\""), "name = \"0.50\"");
        assert_eq!(canonical("x = 100"), "x = 100");
        assert_eq!(normalize_number("0.25"), "0.25");
    }

    #[test]
    fn comments_are_removed() {
        let text = canonical("# header\na = { # open\n    b = 1 # value\n}\n# footer");
        assert_eq!(text, "a = {\n    b = 1\n}");
    }

    #[test]
    fn empty_object_spans_two_lines() {
        assert_eq!(canonical("a = { }"), "a = {\n}");
        assert_eq!(canonical("a = {\n\t}"), "a = {\n}");
    }

    #[test]
    fn operators_and_prefixes_are_preserved() {
        let text = canonical("t = { num>=5 NOT { x = y } } c = rgb { 1 2 3 }");
        assert_eq!(
            text,
            "t = {\n    num >= 5\n    NOT {\n        x = y\n    }\n}\nc = rgb {\n    1\n    2\n    3\n}"
        );
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let source = "@var = 1.50\nobj = {\n\tlist = { a b \"c d\" }\n\tnested = { x = { y = 0.10 } } }\n{ anon = yes }\n";
        let once = canonical(source);
        let twice = canonical(&once);
        assert_eq!(once, twice);
        assert!(!once.contains('\t'));
    }

    #[test]
    fn format_lines_joins_physical_lines() {
        let lines = vec!["a = {".to_string(), "    b = 1".to_string(), "}".to_string()];
        assert_eq!(format_lines(&lines).expect("parses"), "a = {\n    b = 1\n}");
    }

    #[test]
    fn unparseable_input_is_an_error() {
        assert!(format_code("a = { b = 1").is_err());
    }

    #[test]
    fn normalize_text_handles_free_text() {
        let lines = ["", "\tfloat4 x;\r", "  ", "return x;   ", ""];
        assert_eq!(normalize_text(&lines), "    float4 x;\n\nreturn x;");
    }
