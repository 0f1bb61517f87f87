    use std::sync::Arc;

    use super::*;
    use crate::{
        dispatch::{DispatchRequest, Dispatcher},
        rules::GameRuleset,
    };

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(GameRuleset::builtin("stellaris").expect("stellaris ruleset")))
    }

    #[test]
    fn one_definition_per_top_level_statement() {
        let text = "building_a = { base_buildtime = 100.0 }\n@cost = 5\nbuilding_b = {}\n";
        let definitions = dispatcher().dispatch(&DispatchRequest::from_text("common\\buildings\\b.txt", text, "m"));

        let ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["building_a", "@cost", "building_b"]);
        assert_eq!(definitions[0].code, "building_a = {\n    base_buildtime = 100\n}");
        assert_eq!(definitions[1].value_type, ValueType::Variable);
        assert_eq!(definitions[2].code, "building_b = {\n}");
        assert!(definitions.iter().all(|d| d.type_key == "common\\buildings\\txt" && d.used_parser == "default"));
    }

    #[test]
    fn comment_only_file_is_empty_file() {
        let definitions =
            dispatcher().dispatch(&DispatchRequest::from_text("common/buildings/b.txt", "# only comment\n\n", "m"));
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].value_type, ValueType::EmptyFile);
        assert_eq!(definitions[0].id, "b.txt");
        assert_eq!(definitions[0].code, "");
    }

    #[test]
    fn provenance_is_copied_onto_definitions() {
        let request = DispatchRequest::from_text("common/buildings/b.txt", "a = { x = 1 }", "m")
            .with_content_sha("abc123")
            .with_dependencies(vec!["base".to_string()])
            .from_game();
        let definitions = dispatcher().dispatch(&request);
        let definition = &definitions[0];
        assert_eq!(definition.file, "common\\buildings\\b.txt");
        assert_eq!(definition.content_sha, "abc123");
        assert_eq!(definition.dependencies, vec!["base"]);
        assert!(definition.is_from_game);
        assert_eq!(definition.tags, vec!["a"]);
    }

    #[test]
    fn anonymous_blocks_and_bare_values_are_skipped() {
        let definitions =
            dispatcher().dispatch(&DispatchRequest::from_text("common/misc/m.txt", "{ a = 1 }\nloose\nb = 2", "m"));
        let ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }
