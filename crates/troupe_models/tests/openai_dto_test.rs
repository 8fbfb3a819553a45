//! Conversion between engine requests and chat completion bodies.

use troupe_core::{GenerateRequest, Message, Output};
use troupe_error::GenerationErrorKind;
use troupe_models::{ChatResponse, from_chat_response, to_chat_request};

fn request() -> GenerateRequest {
    GenerateRequest::builder()
        .messages(vec![
            Message::system("You edit plays."),
            Message::user("Rewrite this."),
        ])
        .build()
        .expect("valid request")
}

#[test]
fn test_request_defaults_fill_unset_fields() {
    let body = to_chat_request(&request(), "gpt-4o-mini", 0.6, 2000).expect("convert");

    assert_eq!(body.model(), "gpt-4o-mini");
    assert_eq!(*body.temperature(), Some(0.6));
    assert_eq!(*body.max_tokens(), Some(2000));
    assert_eq!(body.messages().len(), 2);
    assert_eq!(body.messages()[0].role(), "system");
    assert_eq!(body.messages()[1].role(), "user");
    assert_eq!(body.messages()[1].content(), "Rewrite this.");
}

#[test]
fn test_request_overrides_win() {
    let req = GenerateRequest::builder()
        .messages(vec![Message::user("Hi")])
        .model(Some("local-model".to_string()))
        .temperature(Some(0.2))
        .max_tokens(Some(50))
        .build()
        .expect("valid request");

    let body = to_chat_request(&req, "gpt-4o-mini", 0.6, 2000).expect("convert");
    assert_eq!(body.model(), "local-model");
    assert_eq!(*body.temperature(), Some(0.2));
    assert_eq!(*body.max_tokens(), Some(50));
}

#[test]
fn test_request_serializes_openai_shape() {
    let body = to_chat_request(&request(), "gpt-4o-mini", 0.6, 2000).expect("convert");
    let json = serde_json::to_value(&body).expect("serialize");

    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["max_tokens"], 2000);
}

#[test]
fn test_response_text_and_refusal() {
    let raw = r#"{
        "choices": [
            {"message": {"content": "Mina: Hello."}, "finish_reason": "stop"},
            {"message": {"content": null, "refusal": "I can't help with that."}}
        ]
    }"#;
    let resp: ChatResponse = serde_json::from_str(raw).expect("parse");
    let generated = from_chat_response(resp).expect("convert");

    assert_eq!(generated.outputs().len(), 2);
    assert_eq!(generated.outputs()[0], Output::Text("Mina: Hello.".to_string()));
    assert!(matches!(generated.outputs()[1], Output::Refusal(_)));
    assert_eq!(generated.text(), "Mina: Hello.");
}

#[test]
fn test_response_without_choices_is_malformed() {
    let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).expect("parse");
    let err = from_chat_response(resp).expect_err("no choices");
    assert!(matches!(err.kind, GenerationErrorKind::MalformedResponse(_)));
}

#[test]
fn test_blank_content_is_empty_response() {
    let resp: ChatResponse =
        serde_json::from_str(r#"{"choices": [{"message": {"content": "   "}}]}"#).expect("parse");
    let err = from_chat_response(resp).expect_err("blank");
    assert!(matches!(err.kind, GenerationErrorKind::EmptyResponse));
}
