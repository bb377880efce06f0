// Registration-time validation: every misdeclared grammar fails before it can parse.

use vyakarana::{
    ArgumentSlot, Command, EnumerationConstraint, ErrorType, Grammar, GrammarError,
    LengthConstraint, NumericRange, OptionSlot, RangeConstraint,
};

fn config_error(result: Result<&mut vyakarana::GrammarBuilder, GrammarError>) -> GrammarError {
    let err = result.map(|_| ()).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Configuration, "{}", err);
    err
}

#[test]
fn optional_then_mandatory_then_optional_is_rejected() {
    let mut builder = Grammar::builder("order");
    builder
        .register_global_argument(ArgumentSlot::string("A", "a"))
        .unwrap()
        .register_global_argument(ArgumentSlot::string("B", "b").default_value("b"))
        .unwrap()
        .register_global_argument(ArgumentSlot::string("C", "c"))
        .unwrap();
    let err = config_error(builder.register_global_argument(ArgumentSlot::string("D", "d").default_value("d")));
    assert!(err.message().contains("'D'"));
    assert!(err.message().contains("first optional is 'B'"));
}

#[test]
fn mandatory_after_two_optionals_is_rejected() {
    let mut builder = Grammar::builder("order");
    builder
        .register_global_argument(ArgumentSlot::string("A", "a").default_value("a"))
        .unwrap()
        .register_global_argument(ArgumentSlot::string("B", "b").default_value("b"))
        .unwrap();
    let err = config_error(builder.register_global_argument(ArgumentSlot::string("C", "c")));
    assert!(err.message().contains("first optional is 'A'"));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut builder = Grammar::builder("dup");
    builder
        .register_global_option(OptionSlot::new("level", "Level").alternative("l"))
        .unwrap();
    config_error(builder.register_global_option(OptionSlot::new("l", "Clashes with an alternative")));

    builder
        .register_global_argument(ArgumentSlot::string("FILE", "File"))
        .unwrap();
    config_error(builder.register_global_argument(ArgumentSlot::string("FILE", "Again")));
}

#[test]
fn options_and_arguments_have_separate_names() {
    let mut builder = Grammar::builder("names");
    builder
        .register_global_option(OptionSlot::new("file", "Option"))
        .unwrap()
        .register_global_argument(ArgumentSlot::string("file", "Argument"))
        .unwrap();
    assert!(builder.build().is_ok());
}

#[test]
fn malformed_names_and_descriptions() {
    let mut builder = Grammar::builder("names");
    config_error(builder.register_global_option(OptionSlot::new("1x", "Starts with a digit")));
    config_error(builder.register_global_option(OptionSlot::new("x", "  ")));
    config_error(builder.register_global_option(OptionSlot::new("x", "Bad alternative").alternative("-y")));
    config_error(builder.register_global_argument(ArgumentSlot::string("A B", "Space")));
}

#[test]
fn constraint_must_fit_the_type() {
    let mut builder = Grammar::builder("types");
    config_error(
        builder.register_global_argument(ArgumentSlot::string("NAME", "Name").constraint(RangeConstraint::inclusive(0, 3))),
    );
    config_error(
        builder.register_global_argument(ArgumentSlot::integer("N", "Number").constraint(LengthConstraint::new(1, 3))),
    );
    config_error(
        builder.register_global_argument(
            ArgumentSlot::string("S", "String").constraint(EnumerationConstraint::new().include(NumericRange::inclusive(0, 1))),
        ),
    );
    config_error(builder.register_global_argument(ArgumentSlot::integer("E", "Empty").constraint(EnumerationConstraint::new())));
}

#[test]
fn defaults_are_checked_at_registration() {
    let mut builder = Grammar::builder("defaults");
    let err = config_error(builder.register_global_argument(ArgumentSlot::integer("N", "Number").default_value("many")));
    assert!(err.message().contains("'many'"));

    config_error(builder.register_global_argument(
        ArgumentSlot::integer("P", "Percent")
            .constraint(RangeConstraint::inclusive(0, 100))
            .default_value("150"),
    ));

    config_error(builder.register_global_argument(ArgumentSlot::integer("O", "Optional").optional()));
}

#[test]
fn arguments_and_commands_are_exclusive() {
    let mut builder = Grammar::builder("tool");
    builder
        .register_global_argument(ArgumentSlot::string("FILE", "File"))
        .unwrap();
    let err = config_error(builder.register_command(Command::new("start", "Start")));
    assert!(err.message().contains("'start'"));

    let mut builder = Grammar::builder("tool");
    builder.register_command(Command::new("start", "Start")).unwrap();
    let err = config_error(builder.register_global_argument(ArgumentSlot::string("FILE", "File")));
    assert!(err.message().contains("'FILE'"));
}

#[test]
fn command_names_are_unique() {
    let mut builder = Grammar::builder("tool");
    builder
        .register_command(Command::new("start", "Start").alternative("go"))
        .unwrap();
    config_error(builder.register_command(Command::new("go", "Go")));
}

#[test]
fn command_scope_is_validated_on_registration() {
    let mut builder = Grammar::builder("tool");
    config_error(
        builder.register_command(
            Command::new("start", "Start")
                .option(OptionSlot::new("f", "Force"))
                .option(OptionSlot::new("f", "Force again")),
        ),
    );
}

#[test]
fn grammar_needs_a_name() {
    let err = Grammar::builder("").build().unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Configuration);
}

#[test]
fn bad_range_notation() {
    let err = "[5...1]".parse::<NumericRange>().unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Configuration);
    assert!("0..1".parse::<NumericRange>().is_err());
}
