use blog_service::build_exporter;

#[test]
fn discovers_every_handler_in_path_order() {
    let exporter = build_exporter().unwrap();
    let routes: Vec<(&str, &str)> = exporter
        .methods()
        .iter()
        .map(|m| (m.method.as_str(), m.path.as_str()))
        .collect();
    assert_eq!(
        routes,
        vec![
            ("GET", "/ping"),
            ("DELETE", "/post"),
            ("GET", "/post"),
            ("POST", "/post"),
            ("GET", "/posts"),
        ]
    );
}

#[test]
fn manifest_options_are_loaded() {
    let exporter = build_exporter().unwrap();
    assert_eq!(exporter.options().project, "blog");
    assert_eq!(exporter.options().envs.len(), 2);
}

#[test]
fn every_default_target_generates() {
    let exporter = build_exporter().unwrap();
    for target in ["go", "angular", "umi", "axios", "rust", "openapi"] {
        let files = exporter.generate(target, "").unwrap();
        assert!(!files.is_empty(), "{target} produced no files");
    }
}

#[test]
fn skipped_member_is_hidden_from_the_sdk() {
    let exporter = build_exporter().unwrap();
    let delete = exporter.methods().iter().find(|m| m.name == "delete_post").unwrap();
    let input = delete.input.as_ref().unwrap();
    let params: Vec<_> = input.children().iter().map(|f| f.param.as_str()).collect();
    assert_eq!(params, vec!["post_id"]);
}
