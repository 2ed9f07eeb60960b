use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{
    models::dto::response::{
        ArticlePlanResponse, ArticleResponse, ExplainResponse, Stage4Response,
    },
    services::response_interpreter::{
        json_string, json_string_list, split_list_items, split_paragraphs, string_items,
        JsonStrategy, LineStrategy, ResponseInterpreter, SectionStrategy,
    },
};

static IMAGE_IDEA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*[-*•]?[ \t]*image (?:idea|prompt)[ \t]*:[ \t]*(.+?)[ \t]*$")
        .expect("IMAGE_IDEA is a valid regex")
});

fn has_any_key(value: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|key| value.get(*key).is_some())
}

fn two_sections<T>(build: impl Fn(String, String) -> T) -> impl Fn(Vec<String>) -> Option<T> {
    move |sections: Vec<String>| {
        let mut sections = sections.into_iter();
        let first = sections.next()?;
        let second = sections.next()?;
        Some(build(first, second))
    }
}

pub fn explain_interpreter() -> ResponseInterpreter<ExplainResponse> {
    ResponseInterpreter::new(|raw| ExplainResponse {
        en: raw.to_string(),
        ja: String::new(),
    })
    .then(JsonStrategy::new(|value: &Value| {
        if !has_any_key(value, &["en", "en_simple", "ja"]) {
            return None;
        }
        Some(ExplainResponse {
            en: json_string(value, &["en", "en_simple"]).unwrap_or_default(),
            ja: json_string(value, &["ja"]).unwrap_or_default(),
        })
    }))
    .then(SectionStrategy::new(
        &["EN|ENGLISH", "JA|JP|JAPANESE"],
        two_sections(|en, ja| ExplainResponse { en, ja }),
    ))
}

/// Reply for research questions: any list of question strings.
pub fn questions_interpreter() -> ResponseInterpreter<Vec<String>> {
    ResponseInterpreter::new(|raw| {
        if raw.is_empty() {
            Vec::new()
        } else {
            vec![raw.to_string()]
        }
    })
    .then(JsonStrategy::new(|value: &Value| match value {
        Value::Array(items) => Some(string_items(items)),
        _ => json_string_list(value, &["questions", "titles"]),
    }))
    .then(LineStrategy::new(|text: &str| {
        // Lead-in lines such as "Here are five questions:" are not questions.
        let items: Vec<String> = split_list_items(text)
            .into_iter()
            .filter(|item| !item.ends_with(':'))
            .collect();
        (!items.is_empty()).then_some(items)
    }))
}

pub fn article_plan_interpreter() -> ResponseInterpreter<ArticlePlanResponse> {
    ResponseInterpreter::new(|raw| ArticlePlanResponse {
        research_plan: raw.to_string(),
        titles: Vec::new(),
    })
    .then(JsonStrategy::new(|value: &Value| {
        if !has_any_key(value, &["research_plan", "plan", "titles"]) {
            return None;
        }
        Some(ArticlePlanResponse {
            research_plan: json_string(value, &["research_plan", "plan"]).unwrap_or_default(),
            titles: json_string_list(value, &["titles"]).unwrap_or_default(),
        })
    }))
    .then(SectionStrategy::new(
        &["RESEARCH[ _]PLAN", "(?:ARTICLE[ _])?TITLES"],
        two_sections(|plan, titles| ArticlePlanResponse {
            research_plan: plan,
            titles: split_list_items(&titles),
        }),
    ))
    .then(LineStrategy::new(|text: &str| {
        // First paragraph is the plan, the remaining paragraphs hold the list.
        let mut paragraphs = split_paragraphs(text).into_iter();
        let research_plan = paragraphs.next()?;
        let rest: Vec<String> = paragraphs.collect();
        if rest.is_empty() {
            return None;
        }
        Some(ArticlePlanResponse {
            research_plan,
            titles: split_list_items(&rest.join("\n")),
        })
    }))
}

/// The index is not part of the reply; callers fill it in afterwards.
pub fn article_interpreter() -> ResponseInterpreter<ArticleResponse> {
    ResponseInterpreter::new(|raw| ArticleResponse {
        index: None,
        full: raw.to_string(),
        simple: String::new(),
    })
    .then(JsonStrategy::new(|value: &Value| {
        if !has_any_key(value, &["full", "original", "simple", "simplified"]) {
            return None;
        }
        Some(ArticleResponse {
            index: None,
            full: json_string(value, &["full", "original"]).unwrap_or_default(),
            simple: json_string(value, &["simple", "simplified"]).unwrap_or_default(),
        })
    }))
    .then(SectionStrategy::new(
        &[
            "(?:FULL|ORIGINAL)(?:[ _]VERSION)?",
            "(?:SIMPLE|SIMPLIFIED)(?:[ _]VERSION)?",
        ],
        two_sections(|full, simple| ArticleResponse {
            index: None,
            full,
            simple,
        }),
    ))
}

pub fn stage4_interpreter() -> ResponseInterpreter<Stage4Response> {
    ResponseInterpreter::new(|raw| Stage4Response {
        slide_idea: raw.to_string(),
        narration: String::new(),
        image_prompts: Vec::new(),
    })
    .then(JsonStrategy::new(|value: &Value| {
        if !has_any_key(value, &["slideIdea", "slide_idea", "narration"]) {
            return None;
        }
        Some(Stage4Response {
            slide_idea: json_string(value, &["slideIdea", "slide_idea"]).unwrap_or_default(),
            narration: json_string(value, &["narration"]).unwrap_or_default(),
            image_prompts: json_string_list(value, &["imagePrompts", "image_prompts"])
                .unwrap_or_default(),
        })
    }))
    .then(SectionStrategy::new(
        &["SLIDE[ _]IDEAS?", "NARRATION"],
        two_sections(|slide_idea, narration| Stage4Response {
            slide_idea,
            narration,
            image_prompts: Vec::new(),
        }),
    ))
}

/// Collects the text of every `Image idea:` bullet in a slide plan.
pub fn extract_image_prompts(slide_idea: &str) -> Vec<String> {
    IMAGE_IDEA
        .captures_iter(slide_idea)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
