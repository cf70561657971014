/// Summary and feedback template selection
///
/// Selection is a pure function of the dominant category, the emotion
/// balance and the entry context. All user-visible text lives in the
/// `template` lookup table, keyed by `TemplateKey`, so branches never carry
/// string literals of their own.

use crate::domain::{EmotionalScore, LifeCategory, Personality, Weather};

/// Stable symbolic key for every canned sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    SummaryFinance,
    SummaryWork,
    SummaryRelationship,
    SummaryHealth,
    SummaryHobby,
    SummaryPositive,
    SummaryNegative,
    SummaryNeutral,

    ContextRain,
    ContextSnow,
    ContextClear,
    ContextLowSleep,
    ContextWellRested,

    FeedbackFinance,
    FeedbackOverwork,
    FeedbackHealthyHabit,
    FeedbackGreatDay,
    FeedbackGoodDay,
    FeedbackMixedDay,
    FeedbackCalmDay,
    FeedbackHeavyDay,
    FeedbackHardDay,
    FeedbackSteadyDay,
    FeedbackSlightlyLowDay,

    ToneGrowthCoach,
    ToneNeutralObserver,
}

/// Text for a template key
pub fn template(key: TemplateKey) -> &'static str {
    use TemplateKey::*;
    match key {
        SummaryFinance => "A day spent paying close attention to investments and money, planning ahead for the future.",
        SummaryWork => "A focused, rewarding day of working or studying toward your goals.",
        SummaryRelationship => "A day that drew energy and joy from time with the people who matter to you.",
        SummaryHealth => "A day that kept health in mind, training the body and finding fresh energy.",
        SummaryHobby => "A day of enjoying your hobbies and savouring the small pleasures of everyday life.",
        SummaryPositive => "A cheerful day full of experiences enjoyed with a positive mind.",
        SummaryNegative => "There were some tiring, difficult moments, but you got through them and closed out the day.",
        SummaryNeutral => "A quiet day spent calmly recording everyday life and looking back on it.",

        ContextRain => "Rainy days can weigh on the mood, so be gentle with yourself.",
        ContextSnow => "On a snowy day like this, staying warm and taking it slow is enough.",
        ContextClear => "The clear weather must have given you a lift.",
        ContextLowSleep => "You slept less than six hours, so try to get to bed a little earlier tonight.",
        ContextWellRested => "A full night's sleep set you up well for the day.",

        FeedbackFinance => "Your steady interest in financial freedom really shows. Managing your assets with a long view, rather than reacting to every rise and fall, is a sign of real wisdom! 💰",
        FeedbackOverwork => "Work made for an exhausting day. Achievement matters, but keeping a healthy balance of rest so you don't burn out is a skill too. Well done today!",
        FeedbackHealthyHabit => "Looking after your body and mind is a beautiful thing. Today's sweat will come back as more energy tomorrow! 💪",
        FeedbackGreatDay => "An almost perfect day! Your positive energy comes through the page. Hold on to this happy feeling for a long time! 🎉",
        FeedbackGoodDay => "Sounds like a good day. Small joys like these add up to a richer life. Here's to tomorrow! 😊",
        FeedbackMixedDay => "A busy, eventful day. There were hard moments, but you kept looking for the bright side, and that is impressive. 👏",
        FeedbackCalmDay => "A calm, peaceful day. Even without big events, quiet days like this strengthen the muscles of the mind. ☕",
        FeedbackHeavyDay => "It seems your heart was a little heavy today. On days like this, rather than pushing yourself, take a moment to stop and look after how you feel.",
        FeedbackHardDay => "You went through a lot today. Today is a day to comfort yourself more than anyone else. Rest well under a warm blanket and let your tired mind recover. 💙",
        FeedbackSteadyDay => "A day that wrapped up smoothly. Hoping tomorrow brings even more reasons to smile!",
        FeedbackSlightlyLowDay => "Today may have left something to be desired, but new chances are waiting tomorrow. Keep going!",

        ToneGrowthCoach => "Pick one small thing from today to build on tomorrow.",
        ToneNeutralObserver => "This note reflects the keyword patterns found in today's entry.",
    }
}

/// Summary sentence for an entry
pub fn summary_key(dominant: Option<LifeCategory>, emotion: &EmotionalScore) -> TemplateKey {
    match dominant {
        Some(LifeCategory::Finance) => TemplateKey::SummaryFinance,
        Some(LifeCategory::Work) => TemplateKey::SummaryWork,
        Some(LifeCategory::Relationship) => TemplateKey::SummaryRelationship,
        Some(LifeCategory::Health) => TemplateKey::SummaryHealth,
        Some(LifeCategory::Hobby) => TemplateKey::SummaryHobby,
        None if emotion.positive >= 30 => TemplateKey::SummaryPositive,
        None if emotion.negative >= 30 => TemplateKey::SummaryNegative,
        None => TemplateKey::SummaryNeutral,
    }
}

/// Contextual clauses placed before the main feedback sentence
///
/// At most one weather clause and one sleep clause. Sleep between 6 and 8
/// hours, cloudy weather or missing data add nothing.
pub fn context_keys(weather: Option<Weather>, sleep_hours: Option<f64>) -> Vec<TemplateKey> {
    let mut keys = Vec::new();

    match weather {
        Some(Weather::Rain) => keys.push(TemplateKey::ContextRain),
        Some(Weather::Snow) => keys.push(TemplateKey::ContextSnow),
        Some(Weather::Clear) => keys.push(TemplateKey::ContextClear),
        Some(Weather::Cloudy) | None => {}
    }

    match sleep_hours {
        Some(hours) if hours < 6.0 => keys.push(TemplateKey::ContextLowSleep),
        Some(hours) if hours >= 8.0 => keys.push(TemplateKey::ContextWellRested),
        _ => {}
    }

    keys
}

/// Main feedback sentence
///
/// Category rules are checked first; otherwise the positive/negative
/// balance picks one of seven bands.
pub fn feedback_key(dominant: Option<LifeCategory>, emotion: &EmotionalScore) -> TemplateKey {
    let positive = emotion.positive as i32;
    let negative = emotion.negative as i32;

    match dominant {
        Some(LifeCategory::Finance) => return TemplateKey::FeedbackFinance,
        Some(LifeCategory::Work) if negative > positive => return TemplateKey::FeedbackOverwork,
        Some(LifeCategory::Health) if positive > negative => return TemplateKey::FeedbackHealthyHabit,
        _ => {}
    }

    let balance = emotion.balance();

    if balance >= 40 {
        TemplateKey::FeedbackGreatDay
    } else if balance >= 15 {
        TemplateKey::FeedbackGoodDay
    } else if positive >= 25 && negative >= 25 {
        TemplateKey::FeedbackMixedDay
    } else if balance.abs() < 15 && positive < 25 && negative < 25 {
        TemplateKey::FeedbackCalmDay
    } else if balance <= -15 && balance > -40 {
        TemplateKey::FeedbackHeavyDay
    } else if balance <= -40 {
        TemplateKey::FeedbackHardDay
    } else if balance >= 0 {
        TemplateKey::FeedbackSteadyDay
    } else {
        TemplateKey::FeedbackSlightlyLowDay
    }
}

/// Closing sentence for the chosen tone
pub fn tone_key(personality: Personality) -> Option<TemplateKey> {
    match personality {
        Personality::WarmCompanion => None,
        Personality::GrowthCoach => Some(TemplateKey::ToneGrowthCoach),
        Personality::NeutralObserver => Some(TemplateKey::ToneNeutralObserver),
    }
}

/// Assemble the full feedback text
pub fn compose_feedback(
    dominant: Option<LifeCategory>,
    emotion: &EmotionalScore,
    context: &[TemplateKey],
    personality: Personality,
) -> String {
    context
        .iter()
        .copied()
        .chain(std::iter::once(feedback_key(dominant, emotion)))
        .chain(tone_key(personality))
        .map(template)
        .collect::<Vec<_>>()
        .join(" ")
}
