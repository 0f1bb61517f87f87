    use super::*;
    use crate::{rules::GameRuleset, syntax::format_code};

    const AUTH_CORPORATE: &str = r#"
auth_corporate = {
	possible = {
		ethics = { NOT = { value = ethic_gestalt_consciousness } }
	}
	playable = yes
	advanced_authority_swap = {
		name = auth_corporate_ceo
		weight = { base = 1.0 }
	}
	advanced_authority_swap = { name = auth_corporate_board }
	tags = { AUTHORITY_HAS_CEO }
}
"#;

    const NEW_SWAP: &str = "advanced_authority_swap = {
	name = auth_corporate_merged
	weight = { base = 2.50 }
}";

    const OBJECT: &str = "auth_corporate";
    const SWAP: &str = "advanced_authority_swap";

    /// Child keys of the merged object, with swap blocks labelled by name.
    fn layout(text: &str) -> Vec<String> {
        let document = parse_text(text).expect("merged text parses");
        let object = document.find_node("auth_corporate").expect("object kept");
        object
            .children
            .iter()
            .map(|child| match child {
                ScriptElement::Node(node) if node.key == "advanced_authority_swap" => {
                    format!("swap:{}", node.value_of("name").unwrap_or_default())
                },
                other => other.key().unwrap_or_default().to_string(),
            })
            .collect()
    }

    #[test]
    fn prepend_goes_before_the_first_sibling() {
        let merged = CodeMerger::merge_top_level(AUTH_CORPORATE, OBJECT, SWAP, NEW_SWAP, false);
        assert_eq!(
            layout(&merged),
            vec![
                "possible",
                "playable",
                "swap:auth_corporate_merged",
                "swap:auth_corporate_ceo",
                "swap:auth_corporate_board",
                "tags"
            ]
        );
        assert!(merged.contains("    advanced_authority_swap = {\n        name = auth_corporate_merged\n"));
        assert!(merged.contains("base = 2.5\n"));
        assert!(merged.contains("base = 1\n"));
    }

    #[test]
    fn append_goes_after_the_last_statement() {
        let prepended = CodeMerger::merge_top_level(AUTH_CORPORATE, OBJECT, SWAP, NEW_SWAP, false);
        let appended = CodeMerger::merge_top_level(
            &prepended,
            OBJECT,
            SWAP,
            "advanced_authority_swap = { name = auth_corporate_last }",
            true,
        );
        let layout = layout(&appended);
        assert_eq!(layout.len(), 7);
        assert_eq!(layout[5], "tags");
        assert_eq!(layout[6], "swap:auth_corporate_last");
        assert!(appended.ends_with("    advanced_authority_swap = {\n        name = auth_corporate_last\n    }\n}"));
    }

    #[test]
    fn merged_output_is_canonical() {
        let merged = CodeMerger::merge_top_level(AUTH_CORPORATE, OBJECT, SWAP, NEW_SWAP, true);
        assert_eq!(format_code(&merged).expect("canonical text parses"), merged);
        assert!(!merged.contains('\t'));
    }

    #[test]
    fn prepend_without_siblings_appends() {
        let base = "auth_democratic = {\n\tplayable = yes\n}";
        let merged = CodeMerger::merge_top_level(base, "auth_democratic", SWAP, NEW_SWAP, false);
        let expected = "auth_democratic = {
    playable = yes
    advanced_authority_swap = {
        name = auth_corporate_merged
        weight = {
            base = 2.5
        }
    }
}";
        assert_eq!(merged, expected);
    }

    #[test]
    fn wrapped_merge_text_is_unwrapped() {
        let wrapped = format!("auth_corporate = {{\n{NEW_SWAP}\n}}");
        let merged = CodeMerger::merge_top_level(AUTH_CORPORATE, OBJECT, SWAP, &wrapped, false);
        assert_eq!(layout(&merged)[2], "swap:auth_corporate_merged");
    }

    #[test]
    fn mismatched_input_is_a_no_op() {
        let missing_object = CodeMerger::merge_top_level(AUTH_CORPORATE, "auth_dictatorial", SWAP, NEW_SWAP, false);
        assert_eq!(missing_object, AUTH_CORPORATE);

        let missing_key = CodeMerger::merge_top_level(AUTH_CORPORATE, OBJECT, SWAP, "tags = { X }", false);
        assert_eq!(missing_key, AUTH_CORPORATE);

        let broken_base = "auth_corporate = {\n\tplayable = yes\n";
        assert_eq!(
            CodeMerger::merge_top_level(broken_base, OBJECT, SWAP, NEW_SWAP, false),
            broken_base
        );
        assert_eq!(
            CodeMerger::merge_top_level(AUTH_CORPORATE, OBJECT, SWAP, "x = { } }", true),
            AUTH_CORPORATE
        );
    }

    #[test]
    fn never_claims_a_file() {
        let ruleset = GameRuleset::builtin("stellaris").expect("stellaris");
        let lines = vec!["auth_corporate = { }".to_string()];
        let args = CanParseArgs {
            file: "common\\governments\\authorities\\a.txt",
            lines: &lines,
            ruleset: &ruleset,
            rule: None,
        };
        assert!(!CodeMerger.can_parse(&args));
        assert_eq!(CodeMerger.name(), "code_merger");
    }

    #[test]
    fn parse_through_dispatch_is_an_error() {
        let ruleset = GameRuleset::builtin("stellaris").expect("stellaris");
        let lines = vec!["auth_corporate = { }".to_string()];
        let args = ParserArgs {
            file: "common\\governments\\authorities\\a.txt",
            lines: &lines,
            ruleset: &ruleset,
            rule: None,
            mod_name: "m",
            content_sha: "",
            dependencies: &[],
            is_from_game: false,
        };
        let error = CodeMerger.parse(&args).expect_err("code merger must not extract");
        assert_eq!(
            error,
            ParseError::NotExtractable {
                parser: "code_merger",
                file: "common\\governments\\authorities\\a.txt".to_string(),
            }
        );
        assert_eq!(error.line(), 0);
    }
