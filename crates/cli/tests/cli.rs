use assert_cmd::Command;

fn bookshelf() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env_remove("BOOKSHELF_ENV").env("RUST_LOG", "off");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn help_lists_subcommands() {
    let stdout = stdout_of(bookshelf().arg("--help"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("openapi"));
}

#[test]
fn openapi_prints_book_routes() {
    let stdout = stdout_of(bookshelf().arg("openapi"));
    let spec: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert!(spec["paths"]["/books"]["post"].is_object());
    assert!(spec["paths"]["/books/{id}"]["delete"].is_object());
}

#[test]
fn config_prints_settings() {
    let stdout = stdout_of(bookshelf().arg("config"));
    assert!(stdout.contains("compose_list_filters"));
}

#[test]
fn unknown_environment_fails() {
    bookshelf()
        .arg("config")
        .env("BOOKSHELF_ENV", "qa")
        .assert()
        .failure();
}
