use std::time::Duration;

use super::*;
use crate::model::{CandidateProduct, IngredientForm, IngredientSpec, Verdict};

fn items(n: usize) -> Vec<JudgeItem> {
    let spec = IngredientSpec::new("chicken breast")
        .with_form(IngredientForm::Raw)
        .with_quantity(500.0, "g");
    (0..n)
        .map(|i| {
            let candidate = CandidateProduct::new(format!("p{i}"), format!("Chicken Breast {i}"))
                .with_size_text("500g")
                .with_categories(["Meat", "Poultry"]);
            JudgeItem::new(&spec, &candidate)
        })
        .collect()
}

fn client(mock: MockJudgeBackend, retries: u32) -> BatchJudgeClient<MockJudgeBackend> {
    BatchJudgeClient::new(mock).with_retry(RetryConfig::immediate(retries))
}

// parse_verdicts

#[test]
fn test_parse_direct_array() {
    let text = r#"[{"verdict":"pass","confidence":0.95,"reason":"same food"},
                   {"verdict":"fail","confidence":0.9,"reason":"pet food"}]"#;

    let verdicts = parse_verdicts(text, 2).unwrap();

    assert_eq!(verdicts[0].verdict, Verdict::Pass);
    assert_eq!(verdicts[0].confidence, 0.95);
    assert_eq!(verdicts[0].reason, "same food");
    assert_eq!(verdicts[1].verdict, Verdict::Fail);
}

#[test]
fn test_parse_extracts_array_from_code_fence() {
    let text = "```json\n[{\"verdict\":\"pass\",\"confidence\":0.8,\"reason\":\"ok\"}]\n```";

    let verdicts = parse_verdicts(text, 1).unwrap();

    assert_eq!(verdicts[0].verdict, Verdict::Pass);
    assert_eq!(verdicts[0].confidence, 0.8);
}

#[test]
fn test_parse_extracts_array_from_prose() {
    let text = "Sure [see below]. Here you go: [{\"verdict\":\"FAIL\",\"confidence\":\"0.75\"}] Thanks!";

    let verdicts = parse_verdicts(text, 1).unwrap();

    assert_eq!(verdicts[0].verdict, Verdict::Fail);
    assert_eq!(verdicts[0].confidence, 0.75);
    assert_eq!(verdicts[0].reason, "");
}

#[test]
fn test_parse_ignores_brackets_inside_strings() {
    let text = r#"Result: [{"verdict":"unsure","confidence":0.4,"reason":"label says [sic] ]"}]"#;

    let verdicts = parse_verdicts(text, 1).unwrap();

    assert_eq!(verdicts[0].verdict, Verdict::Unsure);
    assert_eq!(verdicts[0].reason, "label says [sic] ]");
}

#[test]
fn test_parse_missing_fields_default_to_unsure() {
    let text = r#"[{}, "garbage", {"verdict":"maybe","confidence":7}]"#;

    let verdicts = parse_verdicts(text, 3).unwrap();

    assert_eq!(verdicts[0], JudgeVerdict::undecided());
    assert_eq!(verdicts[1], JudgeVerdict::undecided());
    assert_eq!(verdicts[2].verdict, Verdict::Unsure);
    assert_eq!(verdicts[2].confidence, 1.0, "confidence is clamped");
}

#[test]
fn test_parse_pads_short_array() {
    let text = r#"[{"verdict":"pass","confidence":0.9}]"#;

    let verdicts = parse_verdicts(text, 3).unwrap();

    assert_eq!(verdicts.len(), 3);
    assert_eq!(verdicts[0].verdict, Verdict::Pass);
    assert_eq!(verdicts[1], JudgeVerdict::undecided());
    assert_eq!(verdicts[2], JudgeVerdict::undecided());
}

#[test]
fn test_parse_truncates_long_array() {
    let text = r#"[{"verdict":"pass"},{"verdict":"fail"},{"verdict":"fail"}]"#;

    let verdicts = parse_verdicts(text, 2).unwrap();

    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[1].verdict, Verdict::Fail);
}

#[test]
fn test_parse_empty_text_is_error() {
    assert!(matches!(
        parse_verdicts("   ", 1),
        Err(JudgeError::EmptyResponse)
    ));
}

#[test]
fn test_parse_empty_array_is_error() {
    assert!(matches!(
        parse_verdicts("[]", 1),
        Err(JudgeError::InvalidResponse(_))
    ));
}

#[test]
fn test_parse_without_array_is_error() {
    assert!(matches!(
        parse_verdicts("I cannot help with that.", 1),
        Err(JudgeError::InvalidResponse(_))
    ));
    assert!(matches!(
        parse_verdicts(r#"{"verdict":"pass"}"#, 1),
        Err(JudgeError::InvalidResponse(_))
    ));
}

// prompt

#[test]
fn test_judge_item_describes_pair() {
    let item = &items(1)[0];

    assert_eq!(item.ingredient, "chicken breast (raw, 500g)");
    assert_eq!(item.candidate_title, "Chicken Breast 0");
    assert_eq!(item.candidate_category.as_deref(), Some("Meat > Poultry"));
    assert_eq!(item.candidate_size.as_deref(), Some("500g"));
}

#[test]
fn test_judge_item_omits_missing_fields() {
    let spec = IngredientSpec::new("basil");
    let item = JudgeItem::new(&spec, &CandidateProduct::new("p", "Basil"));

    let json = serde_json::to_value(&item).unwrap();

    assert!(json.get("candidate_category").is_none());
    assert!(json.get("candidate_size").is_none());
}

#[test]
fn test_render_items_embeds_parsable_array() {
    let rendered = render_items(&items(3)).unwrap();

    assert!(rendered.starts_with("Judge these 3 items:"));
    assert!(rendered.ends_with("Respond with a JSON array of 3 elements."));
    assert_eq!(extract_first_array(&rendered).map(|a| a.len()), Some(3));
}

#[test]
fn test_system_instruction_sets_rules() {
    for needle in ["same base food", "form", "15%", "pet food", "JSON array only"] {
        assert!(SYSTEM_INSTRUCTION.contains(needle), "missing {needle}");
    }
}

// retry

#[test]
fn test_backoff_grows_and_caps() {
    let retry = RetryConfig {
        max_retries: 5,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(350),
        backoff_multiplier: 2.0,
    };

    assert_eq!(retry.backoff_for(0), Duration::from_millis(100));
    assert_eq!(retry.backoff_for(1), Duration::from_millis(200));
    assert_eq!(retry.backoff_for(2), Duration::from_millis(350));
    assert_eq!(retry.backoff_for(3), Duration::from_millis(350));
}

#[test]
fn test_retry_config_validate() {
    assert!(RetryConfig::default().validate().is_ok());
    assert!(RetryConfig::immediate(3).validate().is_ok());

    let bad = RetryConfig {
        backoff_multiplier: 0.0,
        ..RetryConfig::default()
    };
    assert!(bad.validate().is_err());

    let inverted = RetryConfig {
        initial_backoff: Duration::from_secs(10),
        ..RetryConfig::default()
    };
    assert!(inverted.validate().is_err());
}

#[test]
fn test_retryable_errors() {
    assert!(JudgeError::Transport("reset".into()).is_retryable());
    assert!(JudgeError::Provider("overloaded".into()).is_retryable());
    assert!(
        JudgeError::UpstreamStatus {
            status: 503,
            body: String::new()
        }
        .is_retryable()
    );
    assert!(
        JudgeError::UpstreamStatus {
            status: 429,
            body: String::new()
        }
        .is_retryable()
    );
    assert!(
        !JudgeError::UpstreamStatus {
            status: 401,
            body: String::new()
        }
        .is_retryable()
    );
    assert!(!JudgeError::EmptyResponse.is_retryable());
    assert!(!JudgeError::Disabled.is_retryable());
}

// client

#[tokio::test]
async fn test_judge_batch_makes_one_call() {
    let judge = client(MockJudgeBackend::always(Verdict::Pass, 0.9), 0);

    let verdicts = judge.judge_batch(&items(4), "test-model").await.unwrap();

    assert_eq!(verdicts.len(), 4);
    assert!(verdicts.iter().all(|v| v.verdict == Verdict::Pass));

    let calls = judge.backend().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "test-model");
    assert_eq!(calls[0].system, SYSTEM_INSTRUCTION);
    assert_eq!(calls[0].item_count(), 4);
}

#[tokio::test]
async fn test_judge_batch_empty_skips_backend() {
    let judge = client(MockJudgeBackend::default(), 0);

    let verdicts = judge.judge_batch(&[], "m").await.unwrap();

    assert!(verdicts.is_empty());
    assert_eq!(judge.backend().call_count(), 0);
}

#[tokio::test]
async fn test_judge_batch_retries_transient_errors() {
    let mock = MockJudgeBackend::always(Verdict::Fail, 0.85);
    mock.push_error(JudgeError::Transport("connection reset".into()))
        .push_error(JudgeError::UpstreamStatus {
            status: 502,
            body: "bad gateway".into(),
        });
    let judge = client(mock, 2);

    let verdicts = judge.judge_batch(&items(2), "m").await.unwrap();

    assert_eq!(verdicts[0].verdict, Verdict::Fail);
    assert_eq!(judge.backend().call_count(), 3);
}

#[tokio::test]
async fn test_judge_batch_gives_up_after_max_retries() {
    let mock = MockJudgeBackend::default();
    mock.push_error(JudgeError::Transport("a".into()))
        .push_error(JudgeError::Transport("b".into()));
    let judge = client(mock, 1);

    let err = judge.judge_batch(&items(1), "m").await.unwrap_err();

    assert!(matches!(err, JudgeError::Transport(ref msg) if msg == "b"));
    assert_eq!(judge.backend().call_count(), 2);
}

#[tokio::test]
async fn test_judge_batch_does_not_retry_client_errors() {
    let mock = MockJudgeBackend::default();
    mock.push_error(JudgeError::UpstreamStatus {
        status: 400,
        body: "bad request".into(),
    });
    let judge = client(mock, 3);

    let err = judge.judge_batch(&items(1), "m").await.unwrap_err();

    assert!(matches!(err, JudgeError::UpstreamStatus { status: 400, .. }));
    assert_eq!(judge.backend().call_count(), 1);
}

#[tokio::test]
async fn test_judge_batch_surfaces_unparsable_reply() {
    let mock = MockJudgeBackend::default();
    mock.push_text("no idea, sorry");
    let judge = client(mock, 3);

    let err = judge.judge_batch(&items(2), "m").await.unwrap_err();

    assert!(matches!(err, JudgeError::InvalidResponse(_)));
    assert_eq!(judge.backend().call_count(), 1);
}

#[tokio::test]
async fn test_judge_batch_pads_short_reply() {
    let mock = MockJudgeBackend::default();
    mock.push_text(r#"[{"verdict":"pass","confidence":0.9,"reason":"ok"}]"#);
    let judge = client(mock, 0);

    let verdicts = judge.judge_batch(&items(3), "m").await.unwrap();

    assert_eq!(verdicts.len(), 3);
    assert_eq!(verdicts[0].verdict, Verdict::Pass);
    assert_eq!(verdicts[2], JudgeVerdict::undecided());
}

#[tokio::test]
async fn test_disabled_backend_errors() {
    let judge = BatchJudgeClient::new(ConfiguredBackend::Disabled).with_retry(RetryConfig::none());

    let err = judge.judge_batch(&items(1), "m").await.unwrap_err();

    assert!(matches!(err, JudgeError::Disabled));
}

#[test]
fn test_configured_backend_from_config() {
    use crate::config::{Config, JudgeBackendKind};

    let config = Config {
        judge_backend: JudgeBackendKind::Disabled,
        ..Default::default()
    };
    assert_eq!(ConfiguredBackend::from_config(&config).unwrap().name(), "disabled");

    let config = Config {
        judge_backend: JudgeBackendKind::OpenAi,
        judge_base_url: "http://localhost:11434/v1/".to_string(),
        judge_timeout: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    match ConfiguredBackend::from_config(&config).unwrap() {
        ConfiguredBackend::OpenAiCompat(backend) => assert_eq!(
            backend.endpoint(),
            "http://localhost:11434/v1/chat/completions"
        ),
        other => panic!("unexpected backend {}", other.name()),
    }

    let config = Config::default();
    assert_eq!(ConfiguredBackend::from_config(&config).unwrap().name(), "genai");
}
