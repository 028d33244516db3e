//! 情绪分类
//!
//! 基于关键词计分的启发式分类器。不是模型，只承诺同一输入
//! 得到同一标签。

use once_cell::sync::Lazy;

use crate::models::emotion::Emotion;

/// 每个非中性情绪的关键词表
static EMOTION_KEYWORDS: Lazy<Vec<(Emotion, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            Emotion::Happy,
            vec![
                "great",
                "wonderful",
                "excellent",
                "perfect",
                "amazing",
                "glad",
                "happy",
            ],
        ),
        (
            Emotion::Explaining,
            vec![
                "let me explain",
                "here's how",
                "basically",
                "in other words",
                "to understand",
            ],
        ),
        (
            Emotion::Thinking,
            vec![
                "hmm",
                "well",
                "let me think",
                "interesting question",
                "that's complex",
            ],
        ),
        (
            Emotion::Confused,
            vec!["i don't know", "unclear", "not sure", "uncertain", "can't find"],
        ),
        (
            Emotion::Encouraging,
            vec![
                "you can do",
                "keep trying",
                "great job",
                "well done",
                "good question",
            ],
        ),
    ]
});

/// 从回答文本推断情绪标签
///
/// 命中关键词最多的情绪胜出，平局时按表的固定顺序取靠前者；
/// 零命中时退化为标点启发：问号给 thinking，感叹号给 encouraging，
/// 否则 neutral。
pub fn classify(text: &str) -> Emotion {
    let text_lower = text.to_lowercase();

    let mut best: Option<(Emotion, usize)> = None;
    for (emotion, keywords) in EMOTION_KEYWORDS.iter() {
        let score = keywords
            .iter()
            .filter(|keyword| text_lower.contains(**keyword))
            .count();
        if score > 0 && best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((*emotion, score));
        }
    }

    if let Some((emotion, _)) = best {
        return emotion;
    }

    if text.contains('?') {
        Emotion::Thinking
    } else if text.contains('!') {
        Emotion::Encouraging
    } else {
        Emotion::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("That is an excellent observation", Emotion::Happy)]
    #[case("Let me explain how recursion works", Emotion::Explaining)]
    #[case("Hmm, that needs some thought", Emotion::Thinking)]
    #[case("I'm not sure about the details", Emotion::Confused)]
    #[case("Keep trying, you are close", Emotion::Encouraging)]
    fn test_single_keyword_wins(#[case] text: &str, #[case] expected: Emotion) {
        assert_eq!(classify(text), expected);
    }

    #[test]
    fn test_highest_count_wins() {
        // confused 命中两个关键词，thinking 只命中一个
        let text = "Well, the answer is unclear and I'm not sure";
        assert_eq!(classify(text), Emotion::Confused);
    }

    #[test]
    fn test_tie_breaks_by_fixed_order() {
        // happy 和 confused 各命中一个，顺序上 happy 在前
        let text = "It would be amazing to know, but the sources are unclear";
        assert_eq!(classify(text), Emotion::Happy);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify("WONDERFUL work on that proof"), Emotion::Happy);
    }

    #[rstest]
    #[case("Does that make sense to you?", Emotion::Thinking)]
    #[case("Now go solve the next one!", Emotion::Encouraging)]
    #[case("The derivative of x squared is 2x", Emotion::Neutral)]
    fn test_punctuation_fallback(#[case] text: &str, #[case] expected: Emotion) {
        assert_eq!(classify(text), expected);
    }

    #[test]
    fn test_question_mark_beats_exclamation() {
        assert_eq!(classify("Ready for more? Here we go!"), Emotion::Thinking);
    }

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(classify(""), Emotion::Neutral);
    }
}
