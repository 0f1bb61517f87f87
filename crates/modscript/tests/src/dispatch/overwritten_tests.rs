    use std::sync::Arc;

    use super::*;
    use crate::{
        dispatch::{DispatchRequest, Dispatcher},
        rules::GameRuleset,
    };

    fn dispatch(
        file: &str,
        text: &str,
    ) -> Vec<Definition> {
        let dispatcher = Dispatcher::new(Arc::new(GameRuleset::builtin("stellaris").expect("stellaris ruleset")));
        dispatcher.dispatch(&DispatchRequest::from_text(file, text, "terra"))
    }

    #[test]
    fn terraform_links_use_from_to_ids() {
        let text = "terraform_link = {\n\tfrom = \"pc_desert\"\n\tto = \"pc_arid\"\n\tenergy = 2000\n}\nterraform_link = { from = \"pc_arid\" to = \"pc_desert\" }";
        let definitions = dispatch("common\\terraform\\links.txt", text);
        let ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["pc_desert-pc_arid", "pc_arid-pc_desert"]);
        assert!(definitions.iter().all(|d| d.value_type == ValueType::OverwrittenObject));
        assert_eq!(definitions[0].type_key, "common\\terraform\\txt");
        assert_eq!(definitions[0].used_parser, "overwritten");
    }

    #[test]
    fn incomplete_composite_falls_back_to_key() {
        let definitions = dispatch("common\\terraform\\links.txt", "terraform_link = { from = \"pc_desert\" }");
        assert_eq!(definitions[0].id, "terraform_link");
    }

    #[test]
    fn single_file_variant_has_its_own_value_type() {
        let definitions = dispatch("common/on_actions/00_on_actions.txt", "on_game_start = { events = { a.1 } }");
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].id, "on_game_start");
        assert_eq!(definitions[0].value_type, ValueType::OverwrittenObjectSingleFile);
        assert_eq!(definitions[0].used_parser, "overwritten_single_file");
    }

    #[test]
    fn strategy_names_follow_variant() {
        assert_eq!(OverwrittenStrategy::multi_file().name(), "overwritten");
        assert_eq!(OverwrittenStrategy::single_file().name(), "overwritten_single_file");
    }
