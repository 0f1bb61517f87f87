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
        dispatcher.dispatch(&DispatchRequest::from_text(file, text, "ui_mod"))
    }

    const GUI: &str = r#"guiTypes = {
	containerWindowType = {
		name = "main_window"
		@size = 10
		size = { x = @size y = 20 }
	}
	containerWindowType = { name = "side" }
}
bitmapfonts = {
	bitmapfont = {
		name = "malgun"
		languages = { "l_korean" "l_english" }
	}
}
@global = 5
"#;

    #[test]
    fn gui_blocks_split_by_child_type() {
        let definitions = dispatch("interface\\main.gui", GUI);
        let ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["main_window", "@size", "side", "malgun-l_english-l_korean", "@global"]);
        assert!(definitions.iter().all(|d| d.type_key == "interface\\gui" && d.used_parser == "object"));

        let side = &definitions[2];
        assert_eq!(side.value_type, ValueType::Object);
        assert_eq!(side.code, "containerWindowType = {\n    name = \"side\"\n}");
        assert_eq!(side.code_tag.as_deref(), Some("guiTypes"));
        assert_eq!(side.code_separator.as_deref(), Some("= {"));
    }

    #[test]
    fn variables_are_tagged_with_enclosing_block() {
        let definitions = dispatch("interface\\main.gui", GUI);
        let size = definitions.iter().find(|d| d.id == "@size").expect("nested variable");
        assert_eq!(size.value_type, ValueType::Variable);
        assert_eq!(size.code, "@size = 10");
        assert_eq!(size.code_tag.as_deref(), Some("containerWindowType"));

        let global = definitions.iter().find(|d| d.id == "@global").expect("top-level variable");
        assert_eq!(global.code_tag, None);
    }

    #[test]
    fn variables_in_untyped_siblings_are_kept() {
        let text = "guiTypes = { positionType = { @inner = 4 } containerWindowType = { name = w } }";
        let definitions = dispatch("interface\\x.gui", text);
        let ids: Vec<(&str, Option<&str>)> =
            definitions.iter().map(|d| (d.id.as_str(), d.code_tag.as_deref())).collect();
        assert_eq!(ids, vec![("@inner", Some("positionType")), ("w", Some("guiTypes"))]);
        assert_eq!(definitions[0].value_type, ValueType::Variable);
        assert_eq!(definitions[0].code, "@inner = 4");
    }

    #[test]
    fn wrapper_without_typed_children_is_one_object() {
        let definitions = dispatch("interface\\misc.gui", "guiTypes = {\n    unknownType = { name = x }\n}");
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].id, "guiTypes");
        assert_eq!(definitions[0].code_tag, None);
    }

    #[test]
    fn bookmarks_emit_each_named_child() {
        let text = "bookmarks = {\n\tbookmark = { name = \"START\" date = 2200.01.01 }\n\tbookmark = { name = \"LATE\" }\n}\nsolo = { name = \"alone\" }";
        let definitions = dispatch("common\\bookmarks\\00_bookmarks.txt", text);
        let ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["START", "LATE", "alone"]);
        assert_eq!(definitions[0].code_tag.as_deref(), Some("bookmarks"));
        assert_eq!(definitions[0].code, "bookmark = {\n    name = \"START\"\n    date = 2200.01.01\n}");
        assert_eq!(definitions[0].used_parser, "child_object");
        assert_eq!(definitions[2].code_tag, None);
    }
