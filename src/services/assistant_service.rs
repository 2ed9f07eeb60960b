use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::prompts::RESEARCH_QUESTION_COUNT,
    errors::AppResult,
    models::{
        domain::ARTICLE_COUNT,
        dto::{
            request::{
                ArticlePlanRequest, ArticleRequest, ExplainRequest, ResearchQuestionsRequest,
                Stage4Request,
            },
            response::{
                ArticlePlanResponse, ArticleResponse, ExplainResponse, ResearchQuestionsResponse,
                Stage4Response,
            },
        },
    },
    services::{
        model_service::{ChatModel, ChatRequest},
        prompt_builder,
        reply_parsers::{
            article_interpreter, article_plan_interpreter, explain_interpreter,
            extract_image_prompts, questions_interpreter, stage4_interpreter,
        },
        response_interpreter::ResponseInterpreter,
    },
};

/// Validate, prompt, invoke, interpret. Validation errors are returned
/// before the model is called; interpretation never fails.
pub struct AssistantService {
    model: Arc<dyn ChatModel>,
    explain_reply: ResponseInterpreter<ExplainResponse>,
    questions_reply: ResponseInterpreter<Vec<String>>,
    article_plan_reply: ResponseInterpreter<ArticlePlanResponse>,
    article_reply: ResponseInterpreter<ArticleResponse>,
    stage4_reply: ResponseInterpreter<Stage4Response>,
}

impl AssistantService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            explain_reply: explain_interpreter(),
            questions_reply: questions_interpreter(),
            article_plan_reply: article_plan_interpreter(),
            article_reply: article_interpreter(),
            stage4_reply: stage4_interpreter(),
        }
    }

    async fn invoke(&self, chat: ChatRequest) -> AppResult<String> {
        let label = chat.label;
        let raw = self.model.complete(chat).await?;
        log::info!("Raw model reply ({}): {}", label, raw);
        Ok(raw)
    }

    fn interpret<T>(label: &str, interpreter: &ResponseInterpreter<T>, raw: &str) -> T {
        let interpretation = interpreter.interpret(raw);
        log::debug!("{} reply interpreted via {}", label, interpretation.strategy);
        interpretation.value
    }

    pub async fn explain(&self, request: ExplainRequest) -> AppResult<ExplainResponse> {
        request.validate()?;

        let raw = self.invoke(prompt_builder::explain(&request)).await?;
        Ok(Self::interpret("explain", &self.explain_reply, &raw))
    }

    pub async fn research_questions(
        &self,
        request: ResearchQuestionsRequest,
    ) -> AppResult<ResearchQuestionsResponse> {
        request.validate()?;

        let raw = self.invoke(prompt_builder::research_questions(&request)).await?;
        let mut questions = Self::interpret("research questions", &self.questions_reply, &raw);

        questions.truncate(RESEARCH_QUESTION_COUNT);
        if questions.is_empty() {
            questions.push(format!(
                "What are some important questions about {}?",
                request.topic.trim()
            ));
        }

        Ok(ResearchQuestionsResponse { questions })
    }

    pub async fn article_plan(
        &self,
        request: ArticlePlanRequest,
    ) -> AppResult<ArticlePlanResponse> {
        request.validate()?;

        let raw = self.invoke(prompt_builder::article_plan(&request)).await?;
        let mut plan = Self::interpret("article plan", &self.article_plan_reply, &raw);

        let topic = request.topic.trim();
        if plan.research_plan.is_empty() {
            plan.research_plan = format!(
                "The student will research \"{}\" by reading articles about {} and related topics.",
                request.research_topic.trim(),
                topic
            );
        }
        plan.titles.truncate(ARTICLE_COUNT);
        if plan.titles.is_empty() {
            plan.titles.push(format!("Reading about {} – basic background", topic));
        }

        Ok(plan)
    }

    pub async fn article(&self, request: ArticleRequest) -> AppResult<ArticleResponse> {
        request.validate()?;

        let raw = self.invoke(prompt_builder::article(&request)).await?;
        let mut article = Self::interpret("article", &self.article_reply, &raw);
        article.index = request.index;

        Ok(article)
    }

    pub async fn stage4(&self, request: Stage4Request) -> AppResult<Stage4Response> {
        request.validate()?;

        let raw = self.invoke(prompt_builder::stage4(&request)).await?;
        let mut slides = Self::interpret("stage4", &self.stage4_reply, &raw);
        if slides.image_prompts.is_empty() {
            slides.image_prompts = extract_image_prompts(&slides.slide_idea);
        }

        Ok(slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::AppError, services::model_service::MockChatModel};

    fn service_replying(reply: &'static str) -> AssistantService {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(reply.to_string()));
        AssistantService::new(Arc::new(model))
    }

    fn service_never_called() -> AssistantService {
        let mut model = MockChatModel::new();
        model.expect_complete().never();
        AssistantService::new(Arc::new(model))
    }

    #[actix_web::test]
    async fn test_explain_returns_trimmed_json_fields() {
        let service =
            service_replying(r#"{"en":" found everywhere ","ja":" どこにでもある "}"#);
        let response = service
            .explain(ExplainRequest { text: "ubiquitous".into() })
            .await
            .unwrap();

        assert_eq!(
            response,
            ExplainResponse {
                en: "found everywhere".into(),
                ja: "どこにでもある".into()
            }
        );
    }

    #[actix_web::test]
    async fn test_blank_text_never_reaches_model() {
        let service = service_never_called();
        let result = service.explain(ExplainRequest { text: " ".into() }).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_model_receives_operation_temperature() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|chat| chat.label == "article" && (chat.temperature - 0.4).abs() < 1e-6)
            .times(1)
            .returning(|_| Ok(r#"{"full":"F","simple":"S"}"#.to_string()));
        let service = AssistantService::new(Arc::new(model));

        let response = service
            .article(ArticleRequest {
                title: "Cafe culture".into(),
                research_topic: "Why cafes?".into(),
                index: Some(3),
            })
            .await
            .unwrap();

        assert_eq!(response.index, Some(3));
        assert_eq!(response.full, "F");
        assert_eq!(response.simple, "S");
    }

    #[actix_web::test]
    async fn test_provider_failure_propagates() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_| Err(AppError::ProviderError("insufficient_quota".into())));
        let service = AssistantService::new(Arc::new(model));

        let result = service
            .research_questions(ResearchQuestionsRequest {
                topic: "coffee".into(),
                keywords: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::ProviderError(m)) if m == "insufficient_quota"));
    }

    #[actix_web::test]
    async fn test_research_questions_capped_at_five() {
        let service = service_replying(
            r#"{"questions":["Q1","Q2","Q3","Q4","Q5","Q6","Q7"]}"#,
        );
        let response = service
            .research_questions(ResearchQuestionsRequest {
                topic: "coffee".into(),
                keywords: Some("price".into()),
            })
            .await
            .unwrap();
        assert_eq!(response.questions, vec!["Q1", "Q2", "Q3", "Q4", "Q5"]);
    }

    #[actix_web::test]
    async fn test_research_questions_default_when_reply_empty() {
        let service = service_replying("");
        let response = service
            .research_questions(ResearchQuestionsRequest {
                topic: "coffee shops".into(),
                keywords: None,
            })
            .await
            .unwrap();
        assert_eq!(
            response.questions,
            vec!["What are some important questions about coffee shops?"]
        );
    }

    #[actix_web::test]
    async fn test_article_plan_tolerates_fewer_titles() {
        let service = service_replying(
            r#"{"research_plan":"I will compare cafes near campus.","titles":["A","B","C"]}"#,
        );
        let response = service
            .article_plan(ArticlePlanRequest {
                topic: "coffee shops".into(),
                keywords: None,
                research_topic: "Why do students prefer specific coffee shops?".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.titles.len(), 3);
        assert_eq!(response.research_plan, "I will compare cafes near campus.");
    }

    #[actix_web::test]
    async fn test_article_plan_defaults_for_empty_json() {
        let service = service_replying(r#"{"research_plan":"","titles":[]}"#);
        let response = service
            .article_plan(ArticlePlanRequest {
                topic: "coffee shops".into(),
                keywords: None,
                research_topic: "Why cafes?".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            response.research_plan,
            "The student will research \"Why cafes?\" by reading articles about coffee shops and related topics."
        );
        assert_eq!(response.titles, vec!["Reading about coffee shops – basic background"]);
    }

    #[actix_web::test]
    async fn test_stage4_derives_image_prompts() {
        let service = service_replying(
            "SLIDE_IDEA\nSlide 1: Title\n- Image idea: campus cafe, no text\nNARRATION\nHello.",
        );
        let response = service.stage4(Stage4Request::default()).await.unwrap();
        assert_eq!(response.image_prompts, vec!["campus cafe, no text"]);
        assert_eq!(response.narration, "Hello.");
    }
}
