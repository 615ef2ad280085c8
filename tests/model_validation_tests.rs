use devsage::models::{
    AnswerSegment, CreateCustomQuestionRequest, Difficulty, Practicality, QaPair, SegmentKind,
};
use serde_json::json;

// --- QaPair (dataset format) ---

#[test]
fn test_qa_pair_parses_dataset_entry() {
    let value = json!({
        "question": "What is a closure?",
        "answer": [
            { "type": "text", "content": "A function plus its scope." },
            { "type": "code", "content": "() => n++" }
        ],
        "difficulty": 1,
        "practicality": 2,
        "tags": ["scope"],
        "estimatedTime": 5,
        "resources": ["https://developer.mozilla.org"]
    });

    let qa: QaPair = serde_json::from_value(value).unwrap();
    assert_eq!(qa.difficulty, Difficulty::Intermediate);
    assert_eq!(qa.practicality, Practicality::ScenarioBased);
    assert_eq!(qa.answer[1].kind, SegmentKind::Code);
    assert_eq!(qa.estimated_time, 5);
}

#[test]
fn test_qa_pair_accepts_legacy_string_answer() {
    let value = json!({
        "question": "What is REST?",
        "answer": "An architectural style.",
        "difficulty": 0,
        "practicality": 0,
        "estimatedTime": 2
    });

    let qa: QaPair = serde_json::from_value(value).unwrap();
    assert_eq!(qa.answer, vec![AnswerSegment::text("An architectural style.")]);
    assert!(qa.tags.is_empty());
    assert!(qa.resources.is_empty());
}

#[test]
fn test_qa_pair_rejects_out_of_range_difficulty() {
    let value = json!({
        "question": "Q",
        "answer": "A",
        "difficulty": 3,
        "practicality": 0,
        "estimatedTime": 2
    });
    assert!(serde_json::from_value::<QaPair>(value).is_err());
}

#[test]
fn test_qa_pair_serializes_camel_case_integers() {
    let qa = QaPair {
        question: "Q".to_string(),
        answer: vec![AnswerSegment::code("x")],
        difficulty: Difficulty::Advanced,
        estimated_time: 7,
        ..QaPair::default()
    };
    let value = serde_json::to_value(&qa).unwrap();
    assert_eq!(value["difficulty"], 2);
    assert_eq!(value["practicality"], 0);
    assert_eq!(value["estimatedTime"], 7);
    assert_eq!(value["answer"][0]["type"], "code");
}

#[test]
fn test_difficulty_ordering() {
    assert!(Difficulty::Beginner < Difficulty::Intermediate);
    assert!(Difficulty::Intermediate < Difficulty::Advanced);
}

#[test]
fn test_bundled_datasets_parse() {
    for raw in [
        include_str!("../content/interview-questions/js.json"),
        include_str!("../content/interview-questions/ts.json"),
        include_str!("../content/interview-questions/react.json"),
        include_str!("../content/interview-questions/node.json"),
        include_str!("../content/interview-questions/express.json"),
        include_str!("../content/interview-questions/mongo.json"),
        include_str!("../content/interview-questions/dsa.json"),
    ] {
        let questions: Vec<QaPair> = serde_json::from_str(raw).unwrap();
        assert!(!questions.is_empty());
    }
}

// --- CreateCustomQuestionRequest ---

fn valid_request() -> CreateCustomQuestionRequest {
    CreateCustomQuestionRequest {
        topic: "javascript".to_string(),
        question: "What is hoisting?".to_string(),
        answer: vec![AnswerSegment::text("Declarations move to the top of their scope.")],
        difficulty: Difficulty::Beginner,
        estimated_time: 3,
        ..CreateCustomQuestionRequest::default()
    }
}

#[test]
fn test_custom_question_validation() {
    assert!(valid_request().validate().is_ok());

    let blank_question = CreateCustomQuestionRequest {
        question: "   ".to_string(),
        ..valid_request()
    };
    assert!(blank_question.validate().is_err());

    let no_answer = CreateCustomQuestionRequest {
        answer: vec![],
        ..valid_request()
    };
    assert!(no_answer.validate().is_err());

    let zero_time = CreateCustomQuestionRequest {
        estimated_time: 0,
        ..valid_request()
    };
    assert!(zero_time.validate().is_err());
}

#[test]
fn test_custom_question_into_qa_pair() {
    let (topic, qa) = valid_request().into_qa_pair();
    assert_eq!(topic, "javascript");
    assert_eq!(qa.question, "What is hoisting?");
    assert_eq!(qa.practicality, Practicality::TheoreticalAndFundamental);
}
