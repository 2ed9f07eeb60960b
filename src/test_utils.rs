use crate::models::domain::{ArticleIndex, ArticlePlan, Stage3Entry, Topic};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Topic with a full ten-title plan and no notes yet
    pub fn coffee_topic() -> Topic {
        let plan = ArticlePlan::new(
            "The student will compare cafes near campus and look at price, wifi and atmosphere.",
            (1..=10).map(|i| format!("Coffee shop article {}", i)),
        );
        Topic::new(
            "owner-1",
            "Coffee shops",
            "Why do students prefer specific coffee shops?",
            Some(plan),
        )
    }

    /// Same topic with notes on the first two articles; the glossary repeats
    /// one term in a different case.
    pub fn topic_with_stage3() -> Topic {
        let mut topic = coffee_topic();
        topic.set_stage3_entry(
            index(0),
            Stage3Entry {
                full: "Many students choose cafes with free wifi and quiet corners.".into(),
                simple: "Students like cafes with wifi.".into(),
                summary: "Students like quiet cafes.".into(),
                key_findings: "Wifi and quiet are the top reasons.".into(),
                glossary: "wifi: wireless internet\nlatte: coffee with milk".into(),
            },
        );
        topic.set_stage3_entry(
            index(1),
            Stage3Entry {
                summary: "Price matters less than location.".into(),
                glossary: "WIFI: WIRELESS INTERNET\nbarista: person who makes coffee".into(),
                ..Default::default()
            },
        );
        topic
    }

    pub fn index(value: u8) -> ArticleIndex {
        ArticleIndex::new(value).unwrap()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_coffee_topic_has_ten_titles() {
        let topic = coffee_topic();
        assert_eq!(topic.article_titles().len(), 10);
        assert!(topic.stage4_data.is_none());
    }

    #[test]
    fn test_fixtures_topic_with_stage3() {
        let topic = topic_with_stage3();
        assert_eq!(topic.stage3_entries().len(), 2);
        assert!(topic.stage3_entry(index(2)).is_none());
    }
}
