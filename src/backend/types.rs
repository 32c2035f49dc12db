//! Wire shapes of the backend API (serde ready).
//!
//! Lists default to empty and "present or absent" scalars/objects are
//! `Option`, so a partial payload still decodes and the page's merge rule
//! decides what survives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// --- Dashboard ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulsePoint {
  pub day: String,
  pub score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningPulse {
  #[serde(default)] pub predicted_score: Option<f64>,
  #[serde(default)] pub weekly_delta: Option<f64>,
  #[serde(default)] pub points: Vec<PulsePoint>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMetric {
  pub name: String,
  pub value: i64,
  pub color: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMetrics {
  #[serde(default)] pub pending_count: Option<i64>,
  #[serde(default)] pub metrics: Vec<ErrorMetric>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
  pub id: String,
  pub title: String,
  pub category: String,
  pub duration: String,
  pub difficulty: String,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
  #[serde(default)] pub learning_pulse: LearningPulse,
  #[serde(default)] pub error_metrics: ErrorMetrics,
  #[serde(default)] pub recommendations: Vec<Recommendation>,
}

// --- Analysis ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
  pub id: i64,
  pub question_id: i64,
  pub error_type: String,
  pub title: String,
  #[serde(default)] pub source: Option<String>,
  pub content: String,
  pub user_answer: String,
  pub correct_answer: String,
  #[serde(default)] pub ai_analysis: Option<String>,
  #[serde(default)] pub ai_correction: Option<String>,
  #[serde(default)] pub created_at: String,
}

fn default_full_mark() -> i64 { 150 }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScore {
  pub name: String,
  pub name_cn: String,
  pub score: i64,
  #[serde(default = "default_full_mark")] pub full_mark: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRadarData {
  #[serde(default)] pub skills: Vec<SkillScore>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeStat {
  pub category: String,
  pub hours: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyStat {
  pub category: String,
  pub accuracy: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningStats {
  #[serde(default)] pub time_stats: Vec<TimeStat>,
  #[serde(default)] pub accuracy_stats: Vec<AccuracyStat>,
  #[serde(default)] pub total_practice_count: i64,
  #[serde(default)] pub total_correct_count: i64,
  #[serde(default)] pub streak_days: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
  pub category: String,
  pub title: String,
  pub description: String,
  pub priority: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarQuestion {
  #[serde(default)] pub similar_question: Option<String>,
}

// --- Foundation ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCurvePoint {
  pub day: String,
  pub retention: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentWord {
  pub word: String,
  #[serde(default)] pub part_of_speech: Option<String>,
  #[serde(default)] pub days_ago: Option<i64>,
  #[serde(default)] pub mastery_level: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxEntry {
  pub tag: String,
  pub sentence: String,
  pub analysis_label: String,
  pub analysis_text: String,
  #[serde(default)] pub added_at: Option<String>,
  #[serde(default)] pub cta: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundationOverview {
  #[serde(default)] pub review_count: Option<i64>,
  #[serde(default)] pub memory_curve: Vec<MemoryCurvePoint>,
  #[serde(default)] pub recent_words: Vec<RecentWord>,
  #[serde(default)] pub syntax_entries: Vec<SyntaxEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWord {
  pub word: String,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub definition: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
  pub id: i64,
  pub word: String,
  #[serde(default)] pub definition: Option<String>,
  #[serde(default)] pub part_of_speech: Option<String>,
  #[serde(default)] pub mastery_level: i64,
  #[serde(default)] pub review_count: i64,
}

// --- Weakness ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaknessModule {
  pub id: String,
  pub name: String,
  pub score: f64,
  pub weak_point: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaknessStat {
  #[serde(rename = "type")] pub kind: String,
  pub accuracy: i64,
  pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaknessSuggestion {
  pub priority: String,
  pub issue: String,
  pub action1: String,
  pub action2: String,
}

pub type DetailedStats = BTreeMap<String, Vec<WeaknessStat>>;
pub type Suggestions = BTreeMap<String, WeaknessSuggestion>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaknessOverview {
  #[serde(default)] pub modules: Vec<WeaknessModule>,
  #[serde(default)] pub detailed_stats: Option<DetailedStats>,
  #[serde(default)] pub suggestions: Option<Suggestions>,
}

// --- Practice ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeModule {
  pub id: String,
  pub title: String,
  pub subtitle: String,
  pub tag: String,
  pub color: String,
  pub tag_color: String,
  pub gradient: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingExamQuestion {
  pub id: i64,
  pub text: String,
  pub options: Vec<String>,
  pub correct: String,
  pub analysis: String,
  #[serde(default)] pub keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingExam {
  pub title: String,
  pub passage: String,
  pub question: ReadingExamQuestion,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDrill {
  pub source: String,
  pub question: String,
  pub options: Vec<String>,
  pub context: String,
  pub logic: String,
  pub correct: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeOverview {
  #[serde(default)] pub modules: Vec<PracticeModule>,
  #[serde(default)] pub reading_exam: Option<ReadingExam>,
  #[serde(default)] pub ai_drills: Vec<AiDrill>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCount {
  #[serde(default)] pub category: Option<String>,
  pub count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
  pub category: String,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PracticeSession {
  pub id: i64,
  pub category: String,
  #[serde(default)] pub title: Option<String>,
  #[serde(default)] pub total_questions: i64,
  #[serde(default)] pub correct_count: i64,
  #[serde(default)] pub time_spent_seconds: i64,
  #[serde(default)] pub score: Option<f64>,
  #[serde(default)] pub started_at: String,
  #[serde(default)] pub completed_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerIn {
  pub question_id: i64,
  pub user_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerVerdict {
  pub is_correct: bool,
  pub correct_answer: String,
  #[serde(default)] pub ai_analysis: Option<String>,
  #[serde(default)] pub ai_correction: Option<String>,
  #[serde(default)] pub error_type: Option<String>,
}

// --- Chat ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatIn {
  pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOut {
  #[serde(default)] pub response: String,
}
