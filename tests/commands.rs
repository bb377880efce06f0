// Command mode: selection, per-command scopes, terminal checks and executors.

use std::sync::{Arc, Mutex};

use vyakarana::{ArgumentSlot, BindingKind, Command, ErrorType, Grammar, OptionSlot, Value};

fn vcs(log: Arc<Mutex<Vec<String>>>) -> Grammar {
    let mut builder = Grammar::builder("vcs");
    builder.version("2.1");
    builder
        .register_global_option(OptionSlot::new("v", "Verbose").alternative("verbose"))
        .unwrap()
        .register_command(
            Command::new("commit", "Record changes")
                .alternative("ci")
                .option(
                    OptionSlot::new("m", "Message")
                        .required()
                        .argument(ArgumentSlot::string("MESSAGE", "Message text")),
                )
                .option(OptionSlot::new("amend", "Amend the previous commit"))
                .argument(ArgumentSlot::string("PATH", "Path to commit").default_value("."))
                .executor(move |invocation| {
                    let message = invocation
                        .command
                        .option_value("m")
                        .map(Value::to_string)
                        .unwrap_or_default();
                    let verbose = invocation.globals.has_option("verbose");
                    log.lock().unwrap().push(format!("commit {} verbose={}", message, verbose));
                    Ok(())
                }),
        )
        .unwrap()
        .register_command(
            Command::new("push", "Publish")
                .option(OptionSlot::new("f", "Force"))
                .argument(ArgumentSlot::string("REMOTE", "Remote").default_value("origin"))
                .argument(ArgumentSlot::string("BRANCH", "Branch").default_value("main")),
        )
        .unwrap()
        .register_command(
            Command::new("tag", "Create a tag")
                .argument(ArgumentSlot::string("NAME", "Tag name"))
                .executor(|_| Err("tag store is read-only".into())),
        )
        .unwrap();
    builder.build().unwrap()
}

fn grammar() -> Grammar {
    vcs(Arc::new(Mutex::new(Vec::new())))
}

#[test]
fn command_selected_by_name_or_alternative() {
    let grammar = grammar();
    for name in ["commit", "ci"] {
        let result = grammar.parse(&[name, "-m", "msg"]).unwrap();
        let command = result.command().unwrap();
        assert_eq!(command.name(), "commit");
        assert_eq!(command.option_value("m"), Some(&Value::from("msg")));
        assert_eq!(command.argument_value("PATH"), Some(&Value::from(".")));
    }
}

#[test]
fn global_options_precede_the_command() {
    let grammar = grammar();
    let result = grammar.parse(&["-v", "commit", "-m", "msg", "src"]).unwrap();
    assert!(result.has_option("v"));
    assert!(result.has_option("verbose"));
    assert_eq!(result.command().unwrap().argument_value("PATH"), Some(&Value::from("src")));

    let err = grammar.parse(&["commit", "-v", "-m", "msg"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert_eq!(err.message(), "-v is not a valid option for command 'commit'");
}

#[test]
fn unknown_and_missing_commands() {
    let grammar = grammar();
    let err = grammar.parse(&["frobnicate"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::CommandNotFound);
    assert_eq!(err.message(), "'frobnicate' is not a command of vcs");
    assert_eq!(err.help_text(), Some("available commands: commit, push, tag"));

    for tokens in [vec![], vec!["-v"]] {
        let err = grammar.parse(&tokens).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::CommandNotFound);
        assert_eq!(err.message(), "no command given");
    }
}

#[test]
fn terminal_checks_name_the_command() {
    let grammar = grammar();
    let err = grammar.parse(&["commit"]).unwrap_err();
    assert_eq!(err.message(), "mandatory option -m missing for command 'commit'");

    let err = grammar.parse(&["tag"]).unwrap_err();
    assert_eq!(err.message(), "mandatory argument NAME missing for command 'tag'");
}

#[test]
fn command_defaults_without_tokens() {
    let grammar = grammar();
    let result = grammar.parse(&["push"]).unwrap();
    let push = result.command().unwrap();
    assert_eq!(push.argument_value("REMOTE"), Some(&Value::from("origin")));
    assert_eq!(push.argument_value("BRANCH"), Some(&Value::from("main")));

    let result = grammar.parse(&["push", "-f", "upstream"]).unwrap();
    let push = result.command().unwrap();
    assert!(push.has_option("f"));
    assert_eq!(push.argument_value("REMOTE"), Some(&Value::from("upstream")));
    assert_eq!(push.argument_value("BRANCH"), Some(&Value::from("main")));
}

#[test]
fn positional_run_must_be_contiguous() {
    let grammar = grammar();
    let err = grammar.parse(&["push", "a", "b", "-f", "c"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert_eq!(
        err.message(),
        "'c' cannot be interpreted as a proper command line argument for command 'push'"
    );
}

#[test]
fn bindings_carry_the_owning_command() {
    let grammar = grammar();
    let result = grammar.parse(&["-v", "ci", "-m", "hi"]).unwrap();
    let bindings = result.bindings();
    let summary: Vec<(Option<&str>, BindingKind, &str)> =
        bindings.iter().map(|b| (b.command, b.kind, b.id)).collect();
    assert_eq!(
        summary,
        vec![
            (None, BindingKind::Option, "v"),
            (Some("commit"), BindingKind::Option, "m"),
            (Some("commit"), BindingKind::Argument, "PATH"),
        ]
    );
    assert_eq!(bindings[0].value, None);
}

#[test]
fn run_invokes_the_selected_executor() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let grammar = vcs(log.clone());

    grammar.run(&["--verbose", "commit", "-m", "first"]).unwrap();
    grammar.run(&["commit", "-m", "second"]).unwrap();
    // No executor registered: parse only.
    grammar.run(&["push"]).unwrap();
    // A parse failure never reaches an executor.
    assert!(grammar.run(&["commit"]).is_err());

    assert_eq!(
        *log.lock().unwrap(),
        vec!["commit first verbose=true", "commit second verbose=false"]
    );
}

#[test]
fn executor_failure_is_an_execution_error() {
    let grammar = grammar();
    let err = grammar.run(&["tag", "v1"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Execution);
    assert_eq!(err.message(), "command 'tag' failed: tag store is read-only");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn parse_does_not_run_executors() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let grammar = vcs(log.clone());
    grammar.parse(&["commit", "-m", "quiet"]).unwrap();
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn grammar_is_shared_across_threads() {
    let grammar = Arc::new(grammar());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let grammar = Arc::clone(&grammar);
            std::thread::spawn(move || {
                let message = format!("m{}", i);
                let result = grammar.parse(&["commit", "-m", message.as_str()]).unwrap();
                result.command().unwrap().option_value("m").cloned()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(Value::String(format!("m{}", i))));
    }
}
