//! Tests for delta accumulation.

use llm::{Delta, FunctionCall, FunctionCallDelta, Message, Role};
use relay_runtime::{Accumulator, CallState, Output};

fn content(text: &str) -> Delta {
    Delta {
        content: Some(text.into()),
        ..Default::default()
    }
}

fn call(name: Option<&str>, arguments: Option<&str>) -> Delta {
    Delta {
        function_call: Some(FunctionCallDelta {
            name: name.map(Into::into),
            arguments: arguments.map(Into::into),
        }),
        ..Default::default()
    }
}

fn fold(deltas: &[Delta]) -> (Message, Vec<Output>) {
    let mut output: Vec<Output> = Vec::new();
    let mut acc = Accumulator::new();
    for delta in deltas {
        acc.accept(delta, &mut output);
    }
    (acc.into_message(), output)
}

#[test]
fn role_and_content_accumulate() {
    let (message, output) = fold(&[
        Delta {
            role: Some(Role::Assistant),
            ..Default::default()
        },
        content("Hello"),
        content(", world"),
    ]);
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.content, "Hello, world");
    assert!(message.function_call.is_none());
    assert_eq!(
        output,
        vec![Output::Token("Hello".into()), Output::Token(", world".into())]
    );
}

#[test]
fn rechunking_content_yields_same_message() {
    let (whole, _) = fold(&[content("The time in Paris is 12:00.")]);
    let (split, _) = fold(&[content("The time in "), content("Paris is 12:00.")]);
    let (bytes, _) = fold(
        &"The time in Paris is 12:00."
            .chars()
            .map(|c| content(&c.to_string()))
            .collect::<Vec<_>>(),
    );
    assert_eq!(whole, split);
    assert_eq!(whole, bytes);
}

#[test]
fn rechunking_arguments_yields_same_call() {
    let (whole, _) = fold(&[
        call(Some("get_current_time"), None),
        call(None, Some(r#"{"location": "Paris"}"#)),
    ]);
    let (split, _) = fold(&[
        call(Some("get_current_time"), Some("{\"loc")),
        call(None, Some("ation\": ")),
        call(None, Some("\"Paris\"}")),
    ]);
    assert_eq!(whole, split);
    assert_eq!(
        whole.function_call,
        Some(FunctionCall {
            name: "get_current_time".into(),
            arguments: r#"{"location": "Paris"}"#.into(),
        })
    );
}

#[test]
fn empty_delta_is_noop() {
    let mut output: Vec<Output> = Vec::new();
    let mut acc = Accumulator::new();
    acc.accept(&content("partial"), &mut output);
    let before = acc.message().clone();
    output.clear();

    acc.accept(&Delta::default(), &mut output);
    acc.accept(&content(""), &mut output);
    acc.accept(&call(None, None), &mut output);

    assert_eq!(acc.message(), &before);
    assert!(output.is_empty());
    assert_eq!(acc.state(), CallState::NoCall);
}

#[test]
fn function_name_opens_call_channel() {
    let mut output: Vec<Output> = Vec::new();
    let mut acc = Accumulator::new();
    acc.accept(&content("Let me check."), &mut output);
    acc.accept(&call(Some("get_current_time"), None), &mut output);
    assert_eq!(acc.state(), CallState::NameKnown);
    acc.accept(&call(None, Some("{}")), &mut output);
    assert_eq!(acc.state(), CallState::AccumulatingArgs);

    assert_eq!(
        output,
        vec![
            Output::Token("Let me check.".into()),
            Output::ContentDone,
            Output::CallStart("get_current_time".into()),
            Output::CallToken {
                name: "get_current_time".into(),
                token: "get_current_time".into(),
            },
            Output::CallToken {
                name: "get_current_time".into(),
                token: "{}".into(),
            },
        ]
    );
}

#[test]
fn function_name_is_never_altered() {
    let (message, output) = fold(&[
        call(Some("get_current_time"), Some("{\"location\":")),
        call(Some("get_current_time"), None),
        call(Some("get_stock_market_data"), Some("\"Paris\"}")),
    ]);
    let call = message.function_call.unwrap();
    assert_eq!(call.name, "get_current_time");
    assert_eq!(call.arguments, r#"{"location":"Paris"}"#);
    let starts = output
        .iter()
        .filter(|o| matches!(o, Output::CallStart(_)))
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn arguments_before_name_are_ignored() {
    let (message, output) = fold(&[call(None, Some("{\"x\": 1}"))]);
    assert!(message.function_call.is_none());
    assert!(output.is_empty());
}

#[test]
fn missing_role_defaults_to_assistant() {
    let (message, _) = fold(&[content("hi")]);
    assert_eq!(message.role, Role::Assistant);
}
