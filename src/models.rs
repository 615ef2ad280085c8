use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Question / Answer Schemas (Mapped to the JSON datasets) ---

/// Difficulty
///
/// Ordered difficulty tier of a question. Serialized as the integers `0..=2`
/// used by the JSON datasets, so ordering by the numeric value is ordering by tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    #[default]
    Beginner = 0,
    Intermediate = 1,
    Advanced = 2,
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Difficulty::Beginner),
            1 => Ok(Difficulty::Intermediate),
            2 => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value as u8
    }
}

/// Practicality
///
/// How applied a question is. Serialized as the integers `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Practicality {
    #[default]
    TheoreticalAndFundamental = 0,
    Practical = 1,
    ScenarioBased = 2,
}

impl TryFrom<u8> for Practicality {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Practicality::TheoreticalAndFundamental),
            1 => Ok(Practicality::Practical),
            2 => Ok(Practicality::ScenarioBased),
            other => Err(format!("unknown practicality: {other}")),
        }
    }
}

impl From<Practicality> for u8 {
    fn from(value: Practicality) -> Self {
        value as u8
    }
}

/// SegmentKind
///
/// Discriminates prose from code inside an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SegmentKind {
    #[default]
    Text,
    Code,
}

/// AnswerSegment
///
/// One block of an answer. Clients render `text` as a paragraph and `code` as a
/// preformatted block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AnswerSegment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub content: String,
}

impl AnswerSegment {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.into(),
        }
    }

    pub fn code(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Code,
            content: content.into(),
        }
    }
}

/// QaPair
///
/// A single interview question with its answer and metadata, exactly as stored
/// in the `interview-questions/*.json` datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QaPair {
    pub question: String,
    #[serde(deserialize_with = "deserialize_answer")]
    pub answer: Vec<AnswerSegment>,
    #[ts(type = "number")]
    #[schema(value_type = u8)]
    pub difficulty: Difficulty,
    #[ts(type = "number")]
    #[schema(value_type = u8)]
    pub practicality: Practicality,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Estimated time to answer, in minutes.
    pub estimated_time: u32,
    /// Optional links to resources for hints.
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Older datasets store the answer as a single string.
fn deserialize_answer<'de, D>(deserializer: D) -> Result<Vec<AnswerSegment>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAnswer {
        Plain(String),
        Segments(Vec<AnswerSegment>),
    }

    Ok(match RawAnswer::deserialize(deserializer)? {
        RawAnswer::Plain(text) => vec![AnswerSegment::text(text)],
        RawAnswer::Segments(segments) => segments,
    })
}

/// DifficultyLabel
///
/// Badge text and style variant for a difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DifficultyLabel {
    pub text: String,
    /// One of `default`, `secondary`, `destructive`.
    pub variant: String,
}

// --- Content Navigation Schemas ---

/// CardImage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CardImage {
    /// Storage key on input, resolved to a fetchable URL on output.
    pub src: String,
    pub alt: String,
}

/// CardItem
///
/// A navigation card on the landing pages. `href` is an absolute site route,
/// e.g. `/documents/oop/inheritance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CardItem {
    pub title: String,
    pub href: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<CardImage>,
}

/// Breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
    /// True for the last crumb, which is rendered as the current page rather than a link.
    pub current: bool,
}

/// NavLink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavLink {
    pub to: String,
    pub title: String,
}

/// SiteInfo
///
/// Output schema for the home route (GET /).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
    /// Per-page title template, e.g. `%s | DevSage`.
    pub title_template: String,
    pub nav: Vec<NavLink>,
}

/// DocumentResponse
///
/// Output schema for a resolved document (GET /documents/{*path}).
/// `body` is the raw MDX source; compilation happens client side.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    /// `/documents/...` path of the document's position in the tree.
    pub canonical_path: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub sub_documents: Vec<CardItem>,
}

// --- Question Table Schemas ---

/// QuestionRow
///
/// One visible row of the question table. Hidden columns are `None` and
/// omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct QuestionRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// First answer segment only; the full answer is served by the single-question route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<DifficultyLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

/// QuestionPage
///
/// Output schema for the paginated question table (GET /interview-questions/{id}).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct QuestionPage {
    pub id: String,
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<QuestionRow>,
    pub page_index: usize,
    pub page_size: usize,
    /// Row count after filtering.
    pub total: usize,
    pub can_previous: bool,
    pub can_next: bool,
    /// e.g. `1 - 11 of 42 question(s).`
    pub summary: String,
}

/// QuestionDetail
///
/// Output schema for a single question (GET /interview-questions/{id}/{number}).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct QuestionDetail {
    pub heading: String,
    pub number: usize,
    pub difficulty_label: DifficultyLabel,
    pub estimated_time: String,
    pub question: QaPair,
}

// --- Identity Schemas (Mapped to Database) ---

/// User
///
/// The user's canonical identity record stored in the `profiles` table.
/// The `id` mirrors the external auth provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub image_url: Option<String>,
    // 'member' or 'admin'.
    pub role: String,
}

/// UserProfile
///
/// Output schema for the gated profile page (GET /profile).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub image_url: String,
    pub role: String,
    pub custom_question_count: i64,
}

/// RegisterUserRequest
///
/// Input payload for the public registration endpoint (POST /register).
/// The password is only passed through to the external auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

// --- Custom Question Schemas ---

/// CustomQuestion
///
/// A user-authored question stored in `custom_questions`. Private to its author.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CustomQuestion {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Question set the user filed it under, e.g. `javascript`.
    pub topic: String,
    pub question: QaPair,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// CreateCustomQuestionRequest
///
/// Input payload for POST /profile/questions.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCustomQuestionRequest {
    pub topic: String,
    pub question: String,
    pub answer: Vec<AnswerSegment>,
    #[ts(type = "number")]
    #[schema(value_type = u8)]
    pub difficulty: Difficulty,
    #[ts(type = "number")]
    #[schema(value_type = u8)]
    #[serde(default)]
    pub practicality: Practicality,
    #[serde(default)]
    pub tags: Vec<String>,
    pub estimated_time: u32,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl CreateCustomQuestionRequest {
    /// Returns the first validation failure, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("topic must not be empty".to_string());
        }
        if self.question.trim().is_empty() {
            return Err("question must not be empty".to_string());
        }
        if self.answer.is_empty() {
            return Err("answer must have at least one segment".to_string());
        }
        if self.estimated_time == 0 {
            return Err("estimated_time must be positive".to_string());
        }
        Ok(())
    }

    pub fn into_qa_pair(self) -> (String, QaPair) {
        (
            self.topic,
            QaPair {
                question: self.question,
                answer: self.answer,
                difficulty: self.difficulty,
                practicality: self.practicality,
                tags: self.tags,
                estimated_time: self.estimated_time,
                resources: self.resources,
            },
        )
    }
}

/// ErrorBody
///
/// JSON body returned with every non-2xx response produced by `AppError`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
