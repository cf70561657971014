/// Rule-based analyzer behaviour seen from outside the crate
use diary_insight_mcp::analyzer::feedback::{template, TemplateKey};
use diary_insight_mcp::analyzer::metrics::base_score;
use diary_insight_mcp::*;

fn analyze(content: &str) -> Analysis {
    analyze_with(EntryDraft::with_content(content), Personality::WarmCompanion)
}

fn analyze_with(draft: EntryDraft, personality: Personality) -> Analysis {
    LocalAnalyzer::new().analyze(&AnalysisInput::from_draft(&draft, personality))
}

#[test]
fn test_finance_entry() {
    let analysis = analyze("주식 투자 수익");

    assert_eq!(analysis.summary, template(TemplateKey::SummaryFinance));
    assert_eq!(analysis.feedback, template(TemplateKey::FeedbackFinance));
    assert_eq!(analysis.emotional_score.positive, 0);
    // base 2, +1, +3/2
    assert_eq!(analysis.metric_scores.get(Metric::Money), Some(4));
    assert_eq!(analysis.metric_scores.get(Metric::Health), Some(2));
    assert!(analysis.debug.is_none());
}

#[test]
fn test_text_without_keywords() {
    let analysis = analyze("A quiet evening at home");

    assert_eq!(analysis.summary, template(TemplateKey::SummaryNeutral));
    assert_eq!(analysis.feedback, template(TemplateKey::FeedbackCalmDay));
    for metric in Metric::ALL {
        assert_eq!(analysis.metric_scores.get(metric), Some(2), "{:?}", metric);
    }
}

#[test]
fn test_every_metric_is_in_range() {
    for text in [
        "",
        "행복 감사 사랑 뿌듯 상쾌 만족 신나 최고 훌륭 보람",
        "스트레스 힘들 슬프 걱정 불안",
        "운동 조깅 헬스 산책 건강 잠 수면 몸 투자 자산 돈 주식",
    ] {
        let analysis = analyze(text);
        assert_eq!(analysis.metric_scores.iter().count(), Metric::ALL.len());
        for (_, score) in analysis.metric_scores.iter() {
            assert!((1..=5).contains(&score));
        }
        assert!(analysis.emotional_score.positive <= 100);
        assert!(analysis.emotional_score.negative <= 100);
    }
}

#[test]
fn test_rest_equals_base_score() {
    for text in ["잠 수면", "행복 감사 사랑 뿌듯 상쾌 만족 신나 최고", "피곤"] {
        let analysis = analyze(text);
        assert_eq!(
            analysis.metric_scores.get(Metric::Rest),
            Some(base_score(&analysis.emotional_score))
        );
    }
}

#[test]
fn test_context_and_tone_frame_the_feedback() {
    let draft = EntryDraft {
        weather: Some(Weather::Rain),
        sleep_hours: Some(5.0),
        ..EntryDraft::with_content("A quiet evening at home")
    };
    let analysis = analyze_with(draft, Personality::GrowthCoach);

    assert!(analysis.feedback.starts_with(template(TemplateKey::ContextRain)));
    assert!(analysis.feedback.contains(template(TemplateKey::ContextLowSleep)));
    assert!(analysis.feedback.ends_with(template(TemplateKey::ToneGrowthCoach)));
}

#[test]
fn test_draft_personality_overrides_settings() {
    let draft = EntryDraft {
        personality: Some(Personality::NeutralObserver),
        ..EntryDraft::with_content("A quiet evening at home")
    };
    let analysis = analyze_with(draft, Personality::GrowthCoach);
    assert!(analysis.feedback.ends_with(template(TemplateKey::ToneNeutralObserver)));
}

#[test]
fn test_draft_validation() {
    assert!(matches!(
        EntryDraft::with_content(" \n\t").validate(),
        Err(DomainError::EmptyContent)
    ));

    let crowded = EntryDraft {
        images: vec!["data:image/png;base64,AAAA".to_string(); 4],
        ..EntryDraft::with_content("photos")
    };
    assert!(matches!(crowded.validate(), Err(DomainError::TooManyImages { count: 4, .. })));

    let overnight = EntryDraft {
        sleep_start: Some("23:00".to_string()),
        sleep_end: Some("07:30".to_string()),
        ..EntryDraft::with_content("slept well")
    };
    assert_eq!(overnight.resolved_sleep_hours(), Some(8.5));
}

#[test]
fn test_tags_parse_from_english_and_korean() {
    assert_eq!("비".parse::<Weather>().unwrap(), Weather::Rain);
    assert_eq!("snow".parse::<Weather>().unwrap(), Weather::Snow);
    assert_eq!("finance".parse::<Metric>().unwrap(), Metric::Money);
    assert_eq!("growth_coach".parse::<Personality>().unwrap(), Personality::GrowthCoach);
    assert!("fog".parse::<Weather>().is_err());
}

#[test]
fn test_analyze_entry_without_provider_stays_local() {
    let mut settings = Settings {
        api_key: Some("key".to_string()),
        ..Settings::default()
    };
    let input = AnalysisInput::from_draft(&EntryDraft::with_content("주식 투자 수익"), settings.personality);
    let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();

    let (analysis, origin) = tokio_test::block_on(diary_insight_mcp::remote::analyze_entry(
        &mut settings,
        None,
        &input,
        today,
    ));

    assert_eq!(origin, AnalysisOrigin::Local);
    assert_eq!(analysis, LocalAnalyzer::new().analyze(&input));
    assert_eq!(settings.usage.used_on(today), 0);
}
