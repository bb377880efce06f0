// End-to-end matching behaviour: reference scenarios and the reconciliation properties.

use vyakarana::{
    ArgumentSlot, EnumerationConstraint, ErrorType, Grammar, LengthConstraint, NumericRange,
    OptionSlot, Provenance, RangeConstraint, Value,
};

/// PID:int[-2,150], optional TYPE:int in {2,3,4} default 4, LEVEL:string,
/// options -a:string[3..6] and -b:int[-3,6].
fn signal_grammar() -> Grammar {
    let mut builder = Grammar::builder("signal");
    builder
        .register_global_option(
            OptionSlot::new("a", "Action label")
                .argument(ArgumentSlot::string("LABEL", "Label").constraint(LengthConstraint::new(3, 6))),
        )
        .unwrap()
        .register_global_option(
            OptionSlot::new("b", "Base priority")
                .alternative("base")
                .argument(ArgumentSlot::integer("BASE", "Base").constraint(RangeConstraint::inclusive(-3, 6))),
        )
        .unwrap()
        .register_global_argument(
            ArgumentSlot::integer("PID", "Process id").constraint(RangeConstraint::inclusive(-2, 150)),
        )
        .unwrap()
        .register_global_argument(
            ArgumentSlot::integer("TYPE", "Signal type")
                .alternative("kind")
                .constraint(EnumerationConstraint::of([2i64, 3, 4]))
                .default_value("4"),
        )
        .unwrap()
        .register_global_argument(ArgumentSlot::string("LEVEL", "Level"))
        .unwrap();
    builder.build().unwrap()
}

// ============================================================================
// REFERENCE SCENARIOS
// ============================================================================

#[test]
fn options_then_full_positional_run() {
    let grammar = signal_grammar();
    let result = grammar
        .parse(&["-a", "abc", "-b", "-2", "123", "2", "level"])
        .unwrap();
    assert_eq!(result.argument_value("PID"), Some(&Value::Integer(123)));
    assert_eq!(result.argument_value("TYPE"), Some(&Value::Integer(2)));
    assert_eq!(result.argument_value("LEVEL"), Some(&Value::from("level")));
    assert_eq!(result.option_value("a"), Some(&Value::from("abc")));
    assert_eq!(result.option_value("b"), Some(&Value::Integer(-2)));
}

#[test]
fn middle_optional_takes_its_default() {
    let grammar = signal_grammar();
    let result = grammar.parse(&["123", "level"]).unwrap();
    assert_eq!(result.argument_value("PID"), Some(&Value::Integer(123)));
    assert_eq!(result.argument_value("TYPE"), Some(&Value::Integer(4)));
    assert_eq!(result.argument_value("LEVEL"), Some(&Value::from("level")));
    let ty = result.globals().argument("TYPE").unwrap();
    assert_eq!(ty.value.provenance, Provenance::Default);
    let pid = result.globals().argument("PID").unwrap();
    assert_eq!(pid.value.provenance, Provenance::Token { position: 0 });
}

#[test]
fn options_inside_positional_run_are_rejected() {
    let grammar = signal_grammar();
    let err = grammar
        .parse(&["-a", "abc", "123", "-b", "-2", "2", "level"])
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert!(err.message().starts_with("too few arguments"));
    assert!(err
        .message()
        .contains("check that there are no options between arguments"));
}

#[test]
fn stray_token_after_the_positional_run() {
    let grammar = signal_grammar();
    let err = grammar.parse(&["1", "lvl", "-b", "2", "x"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert_eq!(
        err.message(),
        "'x' cannot be interpreted as a proper command line argument"
    );
    assert_eq!(err.help_text(), Some("arguments must form one contiguous run"));
}

#[test]
fn mandatory_option_value_missing_at_end() {
    let grammar = signal_grammar();
    let err = grammar.parse(&["1", "lvl", "-b"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert_eq!(err.message(), "option -b requires a value of type integer");

    let err = grammar.parse(&["1", "lvl", "--base"]).unwrap_err();
    assert_eq!(err.message(), "option --base requires a value of type integer");
}

#[test]
fn mandatory_option_value_of_wrong_type() {
    let grammar = signal_grammar();
    let err = grammar.parse(&["-b", "abc", "1", "lvl"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert_eq!(err.message(), "option -b expects a value of type integer, got 'abc'");
}

#[test]
fn only_options_leave_mandatory_argument_missing() {
    let grammar = signal_grammar();
    let err = grammar.parse(&["-b", "2"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert_eq!(err.message(), "mandatory argument PID missing");

    let err = grammar.parse(&[] as &[&str]).unwrap_err();
    assert_eq!(err.message(), "mandatory argument PID missing");
}

/// `-a` with an optional integer value defaulting to -11; PID, TYPE, optional ACTION.
fn greedy_grammar() -> Grammar {
    let mut builder = Grammar::builder("greedy");
    builder
        .register_global_option(
            OptionSlot::new("a", "Adjust").argument(ArgumentSlot::integer("AMOUNT", "Amount").default_value("-11")),
        )
        .unwrap()
        .register_global_option(OptionSlot::new("v", "Verbose"))
        .unwrap()
        .register_global_argument(ArgumentSlot::integer("PID", "Process id"))
        .unwrap()
        .register_global_argument(ArgumentSlot::integer("TYPE", "Type"))
        .unwrap()
        .register_global_argument(ArgumentSlot::string("ACTION", "Action").default_value("stop"))
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn optional_option_value_is_consumed_greedily() {
    let grammar = greedy_grammar();
    let result = grammar.parse(&["-a", "100", "200", "300"]).unwrap();
    assert_eq!(result.option_value("a"), Some(&Value::Integer(100)));
    assert_eq!(result.argument_value("PID"), Some(&Value::Integer(200)));
    assert_eq!(result.argument_value("TYPE"), Some(&Value::Integer(300)));
    assert_eq!(result.argument_value("ACTION"), Some(&Value::from("stop")));
}

#[test]
fn greedy_value_can_starve_the_positional_run() {
    // The user meant `-a` without a value; 200 still goes to the option.
    let grammar = greedy_grammar();
    let err = grammar.parse(&["-a", "200", "300"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert!(err.message().starts_with("too few arguments, expected min 2 got 1"));
}

#[test]
fn optional_option_value_falls_back_to_default() {
    let grammar = greedy_grammar();

    let result = grammar.parse(&["200", "300", "-a"]).unwrap();
    let a = result.globals().option("a").unwrap();
    let bound = a.value.as_ref().unwrap();
    assert_eq!(bound.value, Value::Integer(-11));
    assert_eq!(bound.provenance, Provenance::Default);

    // A following option is never taken as the value.
    let result = grammar.parse(&["-a", "-v", "200", "300"]).unwrap();
    assert_eq!(result.option_value("a"), Some(&Value::Integer(-11)));
    assert!(result.has_option("v"));
}

#[test]
fn enumeration_range_with_hole() {
    let holed = || {
        EnumerationConstraint::new().include_except(
            NumericRange::exclusive(-15, 15),
            NumericRange::exclusive(-3, 3),
        )
    };
    let grammar = |constraint: EnumerationConstraint| {
        let mut builder = Grammar::builder("holed");
        builder
            .register_global_argument(ArgumentSlot::integer("TYPE", "Type").constraint(constraint))
            .unwrap();
        builder.build().unwrap()
    };

    let strict = grammar(holed());
    let err = strict.parse(&["0"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Constraint);
    assert!(strict.parse(&["7"]).is_ok());

    let readmitted = grammar(holed().value(0i64));
    assert_eq!(readmitted.parse(&["0"]).unwrap().argument_value("TYPE"), Some(&Value::Integer(0)));

    let err = strict.parse(&["-16"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Constraint);
    assert!(err.message().contains("[(-15...15)] ![(-3...3)]"));
}

#[test]
fn duplicate_option_fails_before_any_parse() {
    let mut builder = Grammar::builder("dup");
    builder
        .register_global_option(OptionSlot::new("a", "First"))
        .unwrap();
    let err = builder
        .register_global_option(OptionSlot::new("a", "Second"))
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Configuration);
    assert!(err.message().contains("'a'"));
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn single_optional_at_any_position() {
    for position in 0..3 {
        let mut builder = Grammar::builder("single");
        let mut names = vec!["M1", "M2"];
        names.insert(position, "OPT");
        for name in &names {
            let slot = if *name == "OPT" {
                ArgumentSlot::string("OPT", "Optional").default_value("dflt")
            } else {
                ArgumentSlot::string(*name, "Mandatory")
            };
            builder.register_global_argument(slot).unwrap();
        }
        let grammar = builder.build().unwrap();

        let result = grammar.parse(&["x", "y"]).unwrap();
        assert_eq!(result.argument_value("OPT"), Some(&Value::from("dflt")), "position {}", position);
        assert_eq!(result.argument_value("M1"), Some(&Value::from("x")));
        assert_eq!(result.argument_value("M2"), Some(&Value::from("y")));

        let result = grammar.parse(&["t0", "t1", "t2"]).unwrap();
        let expected = format!("t{}", position);
        assert_eq!(result.argument_value("OPT"), Some(&Value::from(expected.as_str())));
    }
}

#[test]
fn trailing_optionals_fill_in_declared_order() {
    let mut builder = Grammar::builder("trailing");
    builder
        .register_global_argument(ArgumentSlot::string("M", "Mandatory"))
        .unwrap();
    for name in ["O1", "O2", "O3"] {
        builder
            .register_global_argument(ArgumentSlot::string(name, "Optional").default_value(format!("{}-default", name)))
            .unwrap();
    }
    let grammar = builder.build().unwrap();
    let slots = ["M", "O1", "O2", "O3"];

    for k in 1..=4 {
        let tokens: Vec<String> = (0..k).map(|i| format!("tok{}", i)).collect();
        let result = grammar.parse(&tokens).unwrap();
        for (i, slot) in slots.iter().enumerate() {
            let bound = result.globals().argument(slot).unwrap();
            if i < k {
                assert_eq!(bound.value.value, Value::String(format!("tok{}", i)));
                assert_eq!(bound.value.provenance, Provenance::Token { position: i });
            } else {
                assert_eq!(bound.value.value, Value::String(format!("{}-default", slot)));
                assert_eq!(bound.value.provenance, Provenance::Default);
            }
        }
    }

    let err = grammar.parse(&["a", "b", "c", "d", "e"]).unwrap_err();
    assert_eq!(err.message(), "too many arguments, expected max 4 got 5");
}

#[test]
fn alternative_names_resolve_to_the_same_slot() {
    let grammar = signal_grammar();
    let short = grammar.parse(&["-b", "3", "10", "lvl"]).unwrap();
    let long = grammar.parse(&["--base", "3", "10", "lvl"]).unwrap();
    for result in [&short, &long] {
        assert_eq!(result.option_value("b"), Some(&Value::Integer(3)));
        assert_eq!(result.option_value("base"), Some(&Value::Integer(3)));
        assert_eq!(result.argument_value("kind"), result.argument_value("TYPE"));
    }
    assert_eq!(short.globals().option("b").unwrap().flag, "-b");
    assert_eq!(long.globals().option("b").unwrap().flag, "--base");
    assert_eq!(short.bindings(), long.bindings());
}

#[test]
fn reparsing_is_idempotent() {
    let grammar = signal_grammar();
    let tokens = ["-a", "abc", "-b", "-2", "123", "level"];
    let first = grammar.parse(&tokens).unwrap();
    let second = grammar.parse(&tokens).unwrap();
    assert_eq!(first, second);
    // A failed parse leaves nothing behind either.
    assert!(grammar.parse(&["-a", "toolongvalue", "1", "x"]).is_err());
    assert_eq!(grammar.parse(&tokens).unwrap(), first);
}

#[test]
fn constraint_violation_carries_location() {
    let grammar = signal_grammar();
    let err = grammar.parse(&["-b", "9", "10", "lvl"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Constraint);
    assert_eq!(err.span(), Some(vyakarana::Span::new(3, 4)));
    assert_eq!(err.help_text(), Some("option -b accepts [-3...6]"));
}

#[test]
fn glued_short_option_value_is_split() {
    let grammar = greedy_grammar();
    let result = grammar.parse(&["-a5", "1", "2"]).unwrap();
    assert_eq!(result.option_value("a"), Some(&Value::Integer(5)));
    assert_eq!(result.argument_value("PID"), Some(&Value::Integer(1)));
    assert_eq!(result.argument_value("TYPE"), Some(&Value::Integer(2)));
}

#[test]
fn bindings_enumerate_options_then_arguments() {
    let grammar = signal_grammar();
    let result = grammar.parse(&["-b", "1", "-a", "abcd", "9", "lvl"]).unwrap();
    let ids: Vec<&str> = result.bindings().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["b", "a", "PID", "TYPE", "LEVEL"]);
}

#[test]
fn repeated_single_option_is_rejected() {
    let grammar = greedy_grammar();
    let err = grammar.parse(&["-v", "-v", "1", "2"]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::IllegalArgument);
    assert_eq!(err.message(), "option -v can occur only once");
}

#[test]
fn unknown_option_is_rejected() {
    let grammar = greedy_grammar();
    let err = grammar.parse(&["-x", "1", "2"]).unwrap_err();
    assert_eq!(err.message(), "-x is not a valid option");
}

#[test]
fn negative_numbers_are_positional() {
    let grammar = signal_grammar();
    let result = grammar.parse(&["-2", "lvl"]).unwrap();
    assert_eq!(result.argument_value("PID"), Some(&Value::Integer(-2)));
}

#[test]
fn multi_occurrence_options_keep_every_value() {
    let mut builder = Grammar::builder("include");
    builder
        .register_global_option(
            OptionSlot::new("I", "Include directory")
                .alternative("include")
                .multiple()
                .argument(ArgumentSlot::string("DIR", "Directory")),
        )
        .unwrap()
        .register_global_argument(ArgumentSlot::string("FILE", "Source file"))
        .unwrap();
    let grammar = builder.build().unwrap();

    let result = grammar
        .parse(&["-I", "a", "--include", "b", "main.c", "-Ic"])
        .unwrap();
    assert_eq!(
        result.option_values("include"),
        vec![&Value::from("a"), &Value::from("b"), &Value::from("c")]
    );
    assert!(result.bindings().iter().filter(|b| b.id == "I").all(|b| b.multiple));
}

#[test]
fn float_and_boolean_slots() {
    let mut builder = Grammar::builder("typed");
    builder
        .register_global_argument(ArgumentSlot::float("RATIO", "Ratio").constraint(RangeConstraint::inclusive(0, 1)))
        .unwrap()
        .register_global_argument(ArgumentSlot::boolean("DRY", "Dry run").default_value("false"))
        .unwrap();
    let grammar = builder.build().unwrap();

    let result = grammar.parse(&["0.25", "TRUE"]).unwrap();
    assert_eq!(result.argument_value("RATIO"), Some(&Value::Float(0.25)));
    assert_eq!(result.argument_value("DRY"), Some(&Value::Boolean(true)));

    let result = grammar.parse(&["1"]).unwrap();
    assert_eq!(result.argument_value("RATIO"), Some(&Value::Float(1.0)));
    assert_eq!(result.argument_value("DRY"), Some(&Value::Boolean(false)));

    let err = grammar.parse(&["0.5", "maybe"]).unwrap_err();
    assert_eq!(err.message(), "argument DRY expects a value of type boolean, got 'maybe'");
}
