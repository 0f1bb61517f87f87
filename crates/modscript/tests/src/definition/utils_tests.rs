    use super::*;

    #[test]
    fn normalize_path_uses_backslashes() {
        assert_eq!(normalize_path("common/buildings/x.txt"), "common\\buildings\\x.txt");
        assert_eq!(normalize_path("/events/a.txt/"), "events\\a.txt");
        assert_eq!(normalize_path("events\\a.txt"), "events\\a.txt");
    }

    #[test]
    fn path_parts() {
        assert_eq!(parent_directory("common\\buildings\\x.txt"), "common\\buildings");
        assert_eq!(parent_directory("descriptor.mod"), "");
        assert_eq!(file_name("common\\buildings\\x.txt"), "x.txt");
        assert_eq!(file_stem("events\\fake.txt"), "fake");
        assert_eq!(file_stem("events\\.hidden"), ".hidden");
        assert_eq!(extension("gfx\\FX\\Shader.FXH"), "fxh");
        assert_eq!(extension("events\\README"), "");
    }

    #[test]
    fn derive_type_lowercases_directory_and_extension() {
        assert_eq!(derive_type("events\\fake.txt"), "events\\txt");
        assert_eq!(derive_type("Common/Buildings/Foo.TXT"), "common\\buildings\\txt");
        assert_eq!(derive_type("interface\\README"), "interface");
        assert_eq!(derive_type("thumbnail.png"), "png");
    }

    #[test]
    fn type_and_id_joins_with_dash() {
        assert_eq!(type_and_id("events\\txt", "dmm_mod.1"), "events\\txt-dmm_mod.1");
    }
