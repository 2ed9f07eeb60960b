use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExplainResponse {
    pub en: String,
    pub ja: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResearchQuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticlePlanResponse {
    pub research_plan: String,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleResponse {
    pub index: Option<u8>,
    pub full: String,
    pub simple: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage4Response {
    pub slide_idea: String,
    pub narration: String,
    pub image_prompts: Vec<String>,
}
