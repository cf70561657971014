/// Keyword tables for the rule-based analyzer
///
/// Entries are written in Korean. Each keyword is matched as a plain
/// substring, so stems (e.g. "즐거") also match their inflected forms.

use crate::domain::LifeCategory;

pub const POSITIVE: &[&str] = &[
    "좋", "행복", "성공", "즐거", "기쁘", "감사", "사랑", "뿌듯", "상쾌", "만족",
    "신나", "최고", "훌륭", "보람", "기대", "감동", "편안", "아늑", "활기", "열정",
    "희망", "운", "럭키", "득템", "맛있", "꿀맛", "힐링", "성취", "성장", "발전",
    "웃음", "미소", "산뜻", "개운", "맑", "따뜻", "포근", "평화", "여유", "달콤",
    "흥미", "재미", "멋진", "대단", "인정", "칭찬", "선물", "행운", "설레",
];

pub const NEGATIVE: &[&str] = &[
    "스트레스", "힘들", "슬프", "걱정", "불안", "싫", "나쁘", "피곤", "짜증", "우울",
    "화가", "분노", "절망", "포기", "실패", "망했", "엉망", "최악", "끔찍", "고통",
    "아파", "아프", "병", "지겹", "심심", "따분", "답답", "막막", "눈물", "울고",
    "속상", "서운", "억울", "멍", "후회", "죄책감", "비참", "초라", "외로", "고독",
    "허무", "무기력", "귀찮", "긴장", "공포", "무서", "씁쓸", "멘붕", "충격",
];

pub const FINANCE: &[&str] = &[
    "투자", "자산", "돈", "매매", "증시", "관세", "주식", "경제", "재태크", "금전",
    "비트코인", "수익", "본전",
];

pub const HEALTH: &[&str] = &[
    "운동", "조깅", "헬스", "산책", "건강", "잠", "수면", "팔굽혀펴기", "몸",
];

pub const RELATIONSHIP: &[&str] = &["친구", "가족", "동료", "만남", "대화", "사람", "약속"];

pub const WORK: &[&str] = &[
    "업무", "회사", "일", "프로젝트", "미팅", "회의", "공부", "스터디", "개발", "코딩",
];

pub const HOBBY: &[&str] = &[
    "취미", "게임", "영화", "책", "음악", "그림", "요리", "넷플릭스", "드라마", "롤체",
];

/// Keyword list for a life category
pub fn keywords_for(category: LifeCategory) -> &'static [&'static str] {
    match category {
        LifeCategory::Finance => FINANCE,
        LifeCategory::Health => HEALTH,
        LifeCategory::Relationship => RELATIONSHIP,
        LifeCategory::Work => WORK,
        LifeCategory::Hobby => HOBBY,
    }
}

/// Number of keywords from `words` that occur at least once in `text`
pub fn count_present(text: &str, words: &[&str]) -> u32 {
    words.iter().filter(|w| text.contains(*w)).count() as u32
}
