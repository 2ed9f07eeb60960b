use std::collections::HashSet;

use crate::models::{
    domain::{ArticleIndex, Topic},
    dto::{request::Stage4Request, response::Stage4Response},
};

const DRAFT_FINDINGS: usize = 5;
const DRAFT_SUMMARIES: usize = 3;
const DRAFT_GLOSSARY: usize = 8;

/// Splits glossary blocks into lines and removes case-insensitive duplicates,
/// keeping the first spelling seen.
pub fn dedupe_glossary<'a>(blocks: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    blocks
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Stage 3 notes of one topic, gathered in article order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stage3Digest {
    pub title: String,
    pub research_question: String,
    pub article_titles: Vec<String>,
    pub summaries: Vec<String>,
    pub findings: Vec<String>,
    pub glossary: Vec<String>,
    /// `(index, full text)` of every article that has one.
    pub articles: Vec<(ArticleIndex, String)>,
}

impl Stage3Digest {
    pub fn from_topic(topic: &Topic) -> Self {
        let entries = topic.stage3_entries();

        let non_blank = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Stage3Digest {
            title: topic.title.clone(),
            research_question: topic.research_topic.clone(),
            article_titles: topic.article_titles(),
            summaries: entries.iter().filter_map(|(_, e)| non_blank(&e.summary)).collect(),
            findings: entries
                .iter()
                .filter_map(|(_, e)| non_blank(&e.key_findings))
                .collect(),
            glossary: dedupe_glossary(entries.iter().map(|(_, e)| e.glossary.as_str())),
            articles: entries
                .iter()
                .filter_map(|(i, e)| non_blank(&e.full).map(|text| (*i, text)))
                .collect(),
        }
    }

    fn article_heading(&self, index: ArticleIndex) -> String {
        match self.article_titles.get(index.value() as usize) {
            Some(title) => format!("Article {}: {}", index.value() + 1, title),
            None => format!("Article {}", index.value() + 1),
        }
    }

    pub fn to_stage4_request(&self) -> Stage4Request {
        let articles_all = self
            .articles
            .iter()
            .map(|(index, text)| format!("[{}]\n{}", self.article_heading(*index), text))
            .collect::<Vec<_>>()
            .join("\n\n");

        Stage4Request {
            topic_title: self.title.clone(),
            research_question: self.research_question.clone(),
            article_titles: self.article_titles.clone(),
            key_findings_all: self.findings.join("\n\n"),
            summaries_all: self.summaries.join("\n\n"),
            glossary_all: self.glossary.join("\n"),
            articles_all,
        }
    }

    /// Slide plan and narration template built only from the student's own
    /// notes, for use without the model.
    pub fn draft(&self) -> Stage4Response {
        let question = if self.research_question.trim().is_empty() {
            "(write your research question here)"
        } else {
            self.research_question.trim()
        };
        let bullets = |items: &[String], limit: usize, prefix: &str| -> Vec<String> {
            items
                .iter()
                .take(limit)
                .map(|item| format!("- {}{}", prefix, item))
                .collect()
        };

        let image_prompts = vec![
            "clean academic title background, minimal, no text".to_string(),
            "simple infographic icons, minimal, no text".to_string(),
            "comparison visual with two columns of icons, minimal, no text".to_string(),
            "student taking notes and thinking, minimal, no text".to_string(),
            "book with vocabulary icons, minimal, no text".to_string(),
            "friendly closing atmosphere, minimal, no text".to_string(),
        ];

        let mut slides: Vec<String> = vec![
            "Slide 1: Title (Research Question)".into(),
            format!("- Research Question: {}", question),
            format!("- Topic: {}", self.title),
            format!("- Image idea: {}", image_prompts[0]),
            String::new(),
            "Slide 2: Key findings (3-5 points)".into(),
            "- Use your own wording.".into(),
        ];
        slides.extend(bullets(&self.findings, DRAFT_FINDINGS, ""));
        slides.push(format!("- Image idea: {}", image_prompts[1]));
        slides.push(String::new());
        slides.push("Slide 3: Interesting or surprising points".into());
        slides.extend(bullets(&self.summaries, DRAFT_SUMMARIES, "From my summary: "));
        slides.push(format!("- Image idea: {}", image_prompts[2]));
        slides.push(String::new());
        slides.extend([
            "Slide 4: Consideration (my interpretation)".to_string(),
            "- What do these findings suggest?".to_string(),
            format!("- Image idea: {}", image_prompts[3]),
            String::new(),
            "Slide 5: Important terms".to_string(),
        ]);
        slides.extend(bullets(&self.glossary, DRAFT_GLOSSARY, ""));
        slides.push(format!("- Image idea: {}", image_prompts[4]));
        slides.push(String::new());
        slides.extend([
            "Slide 6: Closing".to_string(),
            "- Thank you for listening.".to_string(),
            "- One question for the audience.".to_string(),
            format!("- Image idea: {}", image_prompts[5]),
        ]);

        let narration = [
            "Slide 1 narration:".to_string(),
            format!(
                "Hello everyone. Today I will present my research question: {}.",
                question
            ),
            format!(
                "I read {} articles and wrote summaries, key findings and important terms.",
                self.articles.len().max(self.summaries.len())
            ),
            String::new(),
            "Slide 2 narration:".into(),
            "These are my key findings. The most important pattern I noticed was: (your point).".into(),
            String::new(),
            "Slide 3 narration:".into(),
            "One point that surprised me was: (your point). It matters because: (your reason).".into(),
            String::new(),
            "Slide 4 narration:".into(),
            "In my interpretation, these findings suggest: (your interpretation).".into(),
            String::new(),
            "Slide 5 narration:".into(),
            "I will quickly explain a few key words that appeared many times.".into(),
            String::new(),
            "Slide 6 narration:".into(),
            "Thank you for listening.".into(),
        ]
        .join("\n");

        Stage4Response {
            slide_idea: slides.join("\n"),
            narration,
            image_prompts,
        }
    }
}
