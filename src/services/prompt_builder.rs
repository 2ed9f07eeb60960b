//! Assembles the instruction text for each assistant operation. Student
//! text is embedded verbatim; the JSON request body already carries it
//! safely to the provider.

use crate::{
    constants::prompts::*,
    models::dto::request::{
        ArticlePlanRequest, ArticleRequest, ExplainRequest, ResearchQuestionsRequest,
        Stage4Request,
    },
    services::model_service::ChatRequest,
};

/// Article texts shorter than this are treated as absent.
const MIN_ARTICLES_CHARS: usize = 40;

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder
    } else {
        trimmed
    }
}

pub fn explain(request: &ExplainRequest) -> ChatRequest {
    let user = format!(
        "Text: \"{}\"\n\n\
         Return ONLY this JSON format:\n\
         {{\"en\":\"simple paraphrase in easy English\",\"ja\":\"natural Japanese translation\"}}",
        request.text.trim()
    );
    ChatRequest::new("explain", user, EXPLAIN_TEMPERATURE).with_system(EXPLAIN_SYSTEM_PROMPT)
}

pub fn research_questions(request: &ResearchQuestionsRequest) -> ChatRequest {
    let user = format!(
        "Student research topic (short phrase): \"{topic}\".\n\
         Student keywords: \"{keywords}\".\n\n\
         Please suggest {count} possible research questions.\n\
         - Use simple English (B1-B2 level).\n\
         - Each question should be clear and different.\n\
         - Questions should be about the topic as a whole, not tiny details.\n\n\
         Return ONLY this JSON format:\n\
         {{\"questions\": [\"Question 1\", \"Question 2\", \"Question 3\", \"Question 4\", \"Question 5\"]}}",
        topic = request.topic.trim(),
        keywords = request.keywords().unwrap_or("none"),
        count = RESEARCH_QUESTION_COUNT,
    );
    ChatRequest::new("research questions", user, RESEARCH_QUESTIONS_TEMPERATURE)
        .with_system(RESEARCH_QUESTIONS_SYSTEM_PROMPT)
}

pub fn article_plan(request: &ArticlePlanRequest) -> ChatRequest {
    let user = format!(
        "Student's final research question: \"{research_topic}\".\n\
         Short topic title: \"{topic}\".\n\
         Keywords: \"{keywords}\".\n\n\
         First, write ONE short paragraph (3-4 sentences) that explains the student's research plan.\n\
         - Use simple English (CEFR B1).\n\
         - Explain what aspects they will look at.\n\
         - Do NOT mention AI.\n\n\
         Second, make a list of 10 possible article titles the student could read.\n\
         - Use simple English (B1-B2). Each title should be clear and specific.\n\
         - Together the titles should cover all important areas of the keywords and question.\n\
         - Do NOT write explanations, only titles.\n\n\
         Return ONLY this JSON format:\n\
         {{\"research_plan\": \"short paragraph here\", \"titles\": [\"Title 1\", \"Title 2\", \"...\", \"Title 10\"]}}",
        research_topic = request.research_topic.trim(),
        topic = request.topic.trim(),
        keywords = request.keywords().unwrap_or("none"),
    );
    ChatRequest::new("article plan", user, ARTICLE_PLAN_TEMPERATURE)
        .with_system(ARTICLE_PLAN_SYSTEM_PROMPT)
}

pub fn article(request: &ArticleRequest) -> ChatRequest {
    let system = format!(
        "{}\n\nTOPIC INFORMATION:\n- Overall research topic: {}\n- Article title: \"{}\"",
        ARTICLE_SYSTEM_PROMPT,
        request.research_topic.trim(),
        request.title.trim()
    );
    let user = format!(
        "Write both versions for the article titled \"{}\".",
        request.title.trim()
    );
    ChatRequest::new("article", user, ARTICLE_TEMPERATURE).with_system(system)
}

pub fn stage4(request: &Stage4Request) -> ChatRequest {
    let titles: Vec<String> = request
        .article_titles
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t))
        .collect();
    let titles = if titles.is_empty() {
        "(No titles provided.)".to_string()
    } else {
        titles.join("\n")
    };

    let articles = if request.articles_all.trim().chars().count() > MIN_ARTICLES_CHARS {
        request.articles_all.trim()
    } else {
        "(No article texts provided.)"
    };

    let user = format!(
        "{instructions}\n\n\
         TOPIC:\n\
         - Topic title: {topic}\n\
         - Research question: {question}\n\n\
         ARTICLE TITLES (reference only):\n{titles}\n\n\
         STUDENT NOTES (may be empty):\n\
         [Key Findings]\n{findings}\n\n\
         [Summaries]\n{summaries}\n\n\
         [Glossary]\n{glossary}\n\n\
         ARTICLE TEXTS (MAIN EVIDENCE):\n{articles}\n\n\
         {template}",
        instructions = STAGE4_INSTRUCTIONS,
        topic = or_placeholder(&request.topic_title, "(Topic title)"),
        question = or_placeholder(&request.research_question, "(Research question)"),
        titles = titles,
        findings = request.key_findings_all.trim(),
        summaries = request.summaries_all.trim(),
        glossary = request.glossary_all.trim(),
        articles = articles,
        template = STAGE4_OUTPUT_TEMPLATE,
    );
    ChatRequest::new("stage4", user, STAGE4_TEMPERATURE).with_system(STAGE4_SYSTEM_PROMPT)
}
