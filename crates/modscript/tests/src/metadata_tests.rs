    use super::*;

    #[test]
    fn native_dlc_takes_path_from_file() {
        let lines = [
            "name = \"Horizon Signal\"",
            "archive = \"dlc/dlc014_horizon_signal/dlc014.zip\"",
            "id = { steam = \"709820\" }",
            "category = \"content\"",
        ];
        let dlc = parse_dlc("dlc/dlc014_horizon_signal/dlc014.dlc", &lines).expect("native dlc");
        assert_eq!(dlc.name, "Horizon Signal");
        assert_eq!(dlc.path, "dlc\\dlc014_horizon_signal\\dlc014.dlc");
        assert_eq!(dlc.app_id.as_deref(), Some("709820"));
        assert!(dlc.is_visible);
        assert_eq!(dlc.format, DescriptorFormat::Native);
    }

    #[test]
    fn hidden_or_disabled_dlc_is_not_visible() {
        let hidden = parse_dlc("dlc/a.dlc", &["name = a", "hidden = yes"]).expect("hidden dlc");
        assert!(!hidden.is_visible);
        let disabled = parse_dlc("dlc/b.dlc", &["name = b", "enabled = no"]).expect("disabled dlc");
        assert!(!disabled.is_visible);
        let plain = parse_dlc("dlc/c.dlc", &["name = c", "steam_id = 42"]).expect("plain dlc");
        assert!(plain.is_visible);
        assert_eq!(plain.app_id.as_deref(), Some("42"));
    }

    #[test]
    fn json_v1_dlc_uses_its_own_path() {
        let lines = [r#"{ "displayName": "Old Style", "path": "dlc/dlc001/old.zip", "steamId": 1000 }"#];
        let dlc = parse_dlc("ignored/metadata.json", &lines).expect("json v1");
        assert_eq!(dlc.format, DescriptorFormat::JsonV1);
        assert_eq!(dlc.name, "Old Style");
        assert_eq!(dlc.path, "dlc\\dlc001\\old.zip");
        assert_eq!(dlc.app_id.as_deref(), Some("1000"));
    }

    #[test]
    fn json_v2_dlc_uses_the_file_path() {
        let lines = ["{", r#"  "name": "New Style", "id": { "steam": "1234" }, "hidden": true"#, "}"];
        let dlc = parse_dlc("dlc/dlc002/dlc002.json", &lines).expect("json v2");
        assert_eq!(dlc.format, DescriptorFormat::JsonV2);
        assert_eq!(dlc.path, "dlc\\dlc002\\dlc002.json");
        assert_eq!(dlc.app_id.as_deref(), Some("1234"));
        assert!(!dlc.is_visible);
    }

    #[test]
    fn dlc_without_name_is_an_error() {
        assert!(matches!(parse_dlc("dlc/x.dlc", &["archive = x"]), Err(MetadataError::MissingName)));
        assert!(matches!(parse_dlc("dlc/x.dlc", &["name = {"]), Err(MetadataError::Syntax(_))));
        assert!(matches!(parse_dlc("dlc/x.json", &["{ \"name\": "]), Err(MetadataError::Json(_))));
    }

    #[test]
    fn native_mod_descriptor() {
        let lines = [
            "version=\"2.1\"",
            "tags={",
            "\t\"Gameplay\"",
            "\t\"Balance\"",
            "}",
            "name=\"Gigastructural Engineering\"",
            "picture=\"thumbnail.png\"",
            "supported_version=\"3.*\"",
            "remote_file_id=\"1121692237\"",
            "dependencies = { \"Base Patch\" }",
            "replace_path = \"common/buildings\"",
            "replace_path = \"events\"",
        ];
        let descriptor = parse_mod_descriptor(&lines).expect("native descriptor");
        assert_eq!(descriptor.name, "Gigastructural Engineering");
        assert_eq!(descriptor.version.as_deref(), Some("2.1"));
        assert_eq!(descriptor.supported_version.as_deref(), Some("3.*"));
        assert_eq!(descriptor.tags, vec!["Gameplay", "Balance"]);
        assert_eq!(descriptor.dependencies, vec!["Base Patch"]);
        assert_eq!(descriptor.remote_id.as_deref(), Some("1121692237"));
        assert_eq!(descriptor.replace_paths, vec!["common/buildings", "events"]);
        assert_eq!(descriptor.path, None);
        assert_eq!(descriptor.format, DescriptorFormat::Native);
    }

    #[test]
    fn json_mod_descriptor() {
        let text = r#"{
  "name": "Json Mod",
  "id": "json.mod",
  "version": "1.0",
  "supported_game_version": "3.10",
  "tags": ["Utilities"],
  "relationships": [
    { "rel_type": "dependency", "id": "dep.one", "display_name": "Dep One" },
    { "rel_type": "partner", "id": "friend" },
    { "id": "dep.two" }
  ],
  "game_custom_data": { "replace_paths": ["gfx/fx"] }
}"#;
        let lines: Vec<&str> = text.lines().collect();
        let descriptor = parse_mod_descriptor(&lines).expect("json descriptor");
        assert_eq!(descriptor.format, DescriptorFormat::JsonV2);
        assert_eq!(descriptor.remote_id.as_deref(), Some("json.mod"));
        assert_eq!(descriptor.supported_version.as_deref(), Some("3.10"));
        assert_eq!(descriptor.tags, vec!["Utilities"]);
        assert_eq!(descriptor.dependencies, vec!["Dep One", "dep.two"]);
        assert_eq!(descriptor.replace_paths, vec!["gfx/fx"]);
    }
