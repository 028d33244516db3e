//! 情绪标签
//!
//! 回答文本附带的情绪枚举，渲染端据此选择语气和音色。

use serde::{Deserialize, Serialize};

/// 情绪标签
///
/// 封闭枚举，每个回答恰好携带一个标签；`Neutral` 是兜底值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// 高兴
    Happy,
    /// 讲解中
    Explaining,
    /// 思考中
    Thinking,
    /// 困惑
    Confused,
    /// 鼓励
    Encouraging,
    /// 中性（默认）
    #[default]
    Neutral,
}

impl Emotion {
    /// 关键词评分使用的固定顺序，平局时靠前者胜出
    pub const SCORED: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Explaining,
        Emotion::Thinking,
        Emotion::Confused,
        Emotion::Encouraging,
    ];

    /// 全部标签
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Explaining,
        Emotion::Thinking,
        Emotion::Confused,
        Emotion::Encouraging,
        Emotion::Neutral,
    ];

    /// 小写标签名
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Explaining => "explaining",
            Emotion::Thinking => "thinking",
            Emotion::Confused => "confused",
            Emotion::Encouraging => "encouraging",
            Emotion::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "happy" => Ok(Emotion::Happy),
            "explaining" => Ok(Emotion::Explaining),
            "thinking" => Ok(Emotion::Thinking),
            "confused" => Ok(Emotion::Confused),
            "encouraging" => Ok(Emotion::Encouraging),
            "neutral" => Ok(Emotion::Neutral),
            other => Err(format!("unknown emotion label: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_serializes_lowercase() {
        let json = serde_json::to_string(&Emotion::Encouraging).unwrap();
        assert_eq!(json, "\"encouraging\"");
    }

    #[test]
    fn test_emotion_default_is_neutral() {
        assert_eq!(Emotion::default(), Emotion::Neutral);
    }

    #[test]
    fn test_emotion_round_trip_from_str() {
        for emotion in Emotion::ALL {
            let parsed: Emotion = emotion.as_str().parse().unwrap();
            assert_eq!(parsed, emotion);
        }
    }
}
