//! 草稿路由策略：基于关键词决定进入润色、事实核查还是直接收尾

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 草稿中出现即需要润色的不确定性词汇
pub const REFINE_KEYWORDS: &[&str] = &[
    "error",
    "unclear",
    "not sure",
    "unknown",
    "confused",
    "impossible",
    "unlikely",
    "absurd",
    "weird",
];

/// 调研材料中出现即需要事实核查的争议性词汇
pub const FACT_CHECK_KEYWORDS: &[&str] = &[
    "controversial",
    "debate",
    "hoax",
    "false",
    "misinformation",
    "disputed",
];

const PREVIEW_CHARS: usize = 150;

/// 起草之后的分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Refine,
    FactCheck,
    Final,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Refine, Route::FactCheck, Route::Final];
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Refine => write!(f, "refine"),
            Route::FactCheck => write!(f, "fact_check"),
            Route::Final => write!(f, "final"),
        }
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// 根据草稿与调研文本选择分支
///
/// REFINE 优先判断，一旦命中就不再检查 FACT_CHECK。
pub fn route(answer: &str, research: &str) -> Route {
    let answer_text = answer.to_lowercase();
    let research_text = research.to_lowercase();

    debug!(
        answer_preview = %preview(&answer_text),
        research_preview = %preview(&research_text),
        "路由决策"
    );

    if contains_any(&answer_text, REFINE_KEYWORDS) {
        info!("草稿存在不确定表述，进入 RefinerAgent");
        return Route::Refine;
    }

    if contains_any(&research_text, FACT_CHECK_KEYWORDS) {
        info!("调研材料存在争议内容，进入 FactCheckerAgent");
        return Route::FactCheck;
    }

    info!("无特殊情况，直接进入 Final");
    Route::Final
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_draft_routes_to_final() {
        assert_eq!(
            route(
                "Photosynthesis converts light into chemical energy.",
                "Plants use chlorophyll."
            ),
            Route::Final
        );
    }

    #[test]
    fn test_uncertain_draft_routes_to_refine() {
        assert_eq!(route("I am not sure about this", ""), Route::Refine);
        assert_eq!(route("The outcome is unknown.", "plain research"), Route::Refine);
    }

    #[test]
    fn test_contested_research_routes_to_fact_check() {
        assert_eq!(
            route("A confident draft.", "Experts say this claim is disputed."),
            Route::FactCheck
        );
    }

    #[test]
    fn test_refine_takes_precedence_over_fact_check() {
        assert_eq!(
            route("This seems impossible.", "The topic is controversial and a hoax."),
            Route::Refine
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        for answer in ["ERROR", "Error", "error"] {
            assert_eq!(route(answer, ""), Route::Refine);
        }
        assert_eq!(route("fine", "MISINFORMATION spread"), Route::FactCheck);
    }

    #[test]
    fn test_keywords_match_as_substrings() {
        // "errors" 含 "error"，"falsehood" 含 "false"
        assert_eq!(route("There are no errors here.", ""), Route::Refine);
        assert_eq!(route("fine", "an old falsehood"), Route::FactCheck);
    }

    #[test]
    fn test_fact_check_keywords_in_answer_are_ignored() {
        assert_eq!(route("This is controversial.", "neutral research"), Route::Final);
    }

    #[test]
    fn test_sentinel_text_triggers_refine() {
        // 哨兵文本被视为普通文本，其中的 "error" 会命中 REFINE
        assert_eq!(route("Error: Drafting failed", ""), Route::Refine);
        assert_eq!(
            route("A fine draft.", "Error: Research failed"),
            Route::Final
        );
    }

    #[test]
    fn test_route_display() {
        assert_eq!(Route::Refine.to_string(), "refine");
        assert_eq!(Route::FactCheck.to_string(), "fact_check");
        assert_eq!(Route::Final.to_string(), "final");
    }
}
