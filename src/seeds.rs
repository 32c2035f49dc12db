//! Built-in fallback content that keeps every page demonstrable even when
//! the backend is completely unavailable.

use std::collections::BTreeMap;

use crate::backend::types::*;

pub const TUTOR_GREETING: &str = "Lumina is online. I can see your IELTS preparation track; ask me anything whenever you are ready.";

// --- Dashboard ---

pub const PREDICTED_SCORE: f64 = 7.5;
pub const WEEKLY_DELTA: f64 = 0.3;
pub const PENDING_ERRORS: i64 = 12;

pub fn pulse_points() -> Vec<PulsePoint> {
  [("Mon", 6.5), ("Tue", 6.8), ("Wed", 6.7), ("Thu", 7.2), ("Fri", 7.0), ("Sat", 7.5), ("Sun", 7.8)]
    .into_iter()
    .map(|(day, score)| PulsePoint { day: day.into(), score })
    .collect()
}

pub fn error_metrics() -> Vec<ErrorMetric> {
  [("Complex grammar", 45, "#0071e3"), ("Vocabulary gaps", 30, "#5e5ce6"), ("Logic traps", 15, "#32ade6"), ("Formatting", 10, "#e5e5ea")]
    .into_iter()
    .map(|(name, value, color)| ErrorMetric { name: name.into(), value, color: color.into() })
    .collect()
}

pub fn recommendations() -> Vec<Recommendation> {
  [
    ("1", "Advanced relative clauses", "Writing", "15 min", "Hard"),
    ("2", "Part 2 monologue simulation", "Speaking", "10 min", "Medium"),
    ("3", "Rapid location in academic summaries", "Reading", "20 min", "Hard"),
  ]
  .into_iter()
  .map(|(id, title, category, duration, difficulty)| Recommendation {
    id: id.into(),
    title: title.into(),
    category: category.into(),
    duration: duration.into(),
    difficulty: difficulty.into(),
    reason: None,
  })
  .collect()
}

// --- Analysis ---

pub fn error_records() -> Vec<ErrorRecord> {
  vec![ErrorRecord {
    id: 1,
    question_id: 1,
    error_type: "grammar".into(),
    title: "Relativity Syntax Error".into(),
    source: Some("Cambridge 15 - Test 3 - Writing Task 2".into()),
    content: "The number of students who studies abroad has increased.".into(),
    user_answer: "studies".into(),
    correct_answer: "study".into(),
    ai_analysis: Some("In the relative clause introduced by \"who\", the verb must agree with the plural antecedent \"students\".".into()),
    ai_correction: Some("The number of students who study abroad has increased.".into()),
    created_at: "2025-01-01T00:00:00Z".into(),
  }]
}

pub fn skill_scores() -> Vec<SkillScore> {
  [
    ("Vocab", "词汇", 120),
    ("Grammar", "语法", 98),
    ("Logic", "逻辑", 86),
    ("Pron", "发音", 99),
    ("Fluency", "流利度", 85),
    ("Coherence", "连贯性", 65),
  ]
  .into_iter()
  .map(|(name, name_cn, score)| SkillScore { name: name.into(), name_cn: name_cn.into(), score, full_mark: 150 })
  .collect()
}

pub fn time_stats() -> Vec<TimeStat> {
  [("Listening", 12.5), ("Reading", 15.2), ("Writing", 8.4), ("Speaking", 5.1)]
    .into_iter()
    .map(|(category, hours)| TimeStat { category: category.into(), hours })
    .collect()
}

pub fn accuracy_stats() -> Vec<AccuracyStat> {
  [("Listening", 85), ("Reading", 78), ("Writing", 65), ("Speaking", 72)]
    .into_iter()
    .map(|(category, accuracy)| AccuracyStat { category: category.into(), accuracy })
    .collect()
}

pub fn improvements() -> Vec<Improvement> {
  [
    ("Reading", "Reading Velocity", "Reading speed is lagging. Focus on core signal words.", "high"),
    ("Listening", "Listening Precision", "Section 4 plural forms failure detected.", "medium"),
    ("Speaking", "Speaking Fluency", "Deploy filler words to maintain communication.", "low"),
  ]
  .into_iter()
  .map(|(category, title, description, priority)| Improvement {
    category: category.into(),
    title: title.into(),
    description: description.into(),
    priority: priority.into(),
  })
  .collect()
}

// --- Foundation ---

pub const REVIEW_COUNT: i64 = 42;

pub fn memory_curve() -> Vec<MemoryCurvePoint> {
  [("1m", 100), ("20m", 58), ("1h", 44), ("9h", 36), ("1d", 33), ("2d", 28), ("6d", 25), ("31d", 21)]
    .into_iter()
    .map(|(day, retention)| MemoryCurvePoint { day: day.into(), retention })
    .collect()
}

pub fn recent_words() -> Vec<RecentWord> {
  [("Ubiquitous", "Adj.", 3), ("Ephemeral", "Adj.", 2), ("Resilient", "Adj.", 5), ("Paradigm", "N.", 4), ("Alleviate", "V.", 1)]
    .into_iter()
    .map(|(word, pos, days)| RecentWord {
      word: word.into(),
      part_of_speech: Some(pos.into()),
      days_ago: Some(days),
      mastery_level: None,
    })
    .collect()
}

pub fn syntax_entries() -> Vec<SyntaxEntry> {
  vec![
    SyntaxEntry {
      tag: "Inversion".into(),
      sentence: "\"Never before had the concept of interstellar travel seemed so plausible yet so distant.\"".into(),
      analysis_label: "Structure".into(),
      analysis_text: "Negative Adverb + Auxiliary + Subject + Main Verb".into(),
      added_at: None,
      cta: Some("View Similar Sentences".into()),
    },
    SyntaxEntry {
      tag: "Participle Clause".into(),
      sentence: "\"Facing extreme gravitational forces, the crew had to rely on automated systems.\"".into(),
      analysis_label: "Logic".into(),
      analysis_text: "Cause and Effect. (Because they faced...)".into(),
      added_at: None,
      cta: Some("View Similar Sentences".into()),
    },
  ]
}

// --- Weakness ---

pub const DEFAULT_WEAK_MODULE: &str = "Reading";

pub fn weakness_modules() -> Vec<WeaknessModule> {
  [
    ("Listening", 6.5, "Multiple Choice"),
    ("Reading", 7.0, "True/False/NG"),
    ("Writing", 6.0, "Coherence"),
    ("Speaking", 6.5, "Fluency"),
  ]
  .into_iter()
  .map(|(id, score, weak_point)| WeaknessModule { id: id.into(), name: id.into(), score, weak_point: weak_point.into() })
  .collect()
}

fn stats(rows: &[(&str, i64, &str)]) -> Vec<WeaknessStat> {
  rows
    .iter()
    .map(|(kind, accuracy, color)| WeaknessStat { kind: (*kind).into(), accuracy: *accuracy, color: (*color).into() })
    .collect()
}

pub fn detailed_stats() -> DetailedStats {
  const RED: &str = "#ef4444";
  const AMBER: &str = "#f59e0b";
  const GREEN: &str = "#22c55e";
  BTreeMap::from([
    ("Listening".to_string(), stats(&[("Multiple Choice", 55, AMBER), ("Map Labeling", 65, AMBER), ("Form Completion", 92, GREEN), ("Matching", 70, GREEN)])),
    ("Reading".to_string(), stats(&[("True/False/NG", 45, RED), ("Heading Match", 62, AMBER), ("Summary Completion", 88, GREEN), ("Multiple Choice", 55, AMBER)])),
    ("Writing".to_string(), stats(&[("Task Response", 68, AMBER), ("Coherence", 48, RED), ("Lexical Resource", 72, GREEN), ("Grammar", 65, AMBER)])),
    ("Speaking".to_string(), stats(&[("Fluency", 58, RED), ("Pronunciation", 75, GREEN), ("Lexical Resource", 68, AMBER), ("Grammar", 65, AMBER)])),
  ])
}

pub fn suggestions() -> Suggestions {
  let s = |priority: &str, issue: &str, a1: &str, a2: &str| WeaknessSuggestion {
    priority: priority.into(),
    issue: issue.into(),
    action1: a1.into(),
    action2: a2.into(),
  };
  BTreeMap::from([
    ("Listening".to_string(), s("Attention Required", "Distractors in Multiple Choice questions are causing a 40% error rate.", "Drill 'Distractor Recognition'", "Practice 'Wait for the Turn'")),
    ("Reading".to_string(), s("High Priority", "True/False/Not Given logic keeps failing on 'Not Given' inference.", "Drill 20 T/F/NG Logic Gates", "Review Logic Failures Archive")),
    ("Writing".to_string(), s("Critical Alert", "Coherence suffers from missing topic sentences in body paragraphs.", "Structure 5 Body Paragraphs", "Review Linking Words")),
    ("Speaking".to_string(), s("Moderate Priority", "Fluency is interrupted by excessive self-correction in Part 2.", "Shadowing Practice (Speed)", "Learn 10 Filler Phrases")),
  ])
}

// --- Practice ---

pub const EXAM_MODULE: &str = "reading";

pub fn practice_modules() -> Vec<PracticeModule> {
  [
    ("listening", "Listening", "Cambridge 18 Test 4", "Section 4 Focus", "blue", "from-blue-400 to-indigo-500"),
    ("reading", "Reading", "C19 Test 3 Passage 1", "T/F/NG Special", "orange", "from-amber-400 to-orange-500"),
    ("writing", "Writing", "Task 2: Globalisation", "Argumentation", "purple", "from-purple-400 to-pink-500"),
    ("speaking", "Speaking", "Part 2: Technology", "Fluency Drill", "green", "from-emerald-400 to-teal-500"),
  ]
  .into_iter()
  .map(|(id, title, subtitle, tag, hue, gradient)| PracticeModule {
    id: id.into(),
    title: title.into(),
    subtitle: subtitle.into(),
    tag: tag.into(),
    color: format!("bg-{hue}-100 text-{hue}-600"),
    tag_color: format!("bg-{hue}-100 text-{hue}-700"),
    gradient: gradient.into(),
  })
  .collect()
}

pub fn reading_exam() -> ReadingExam {
  ReadingExam {
    title: "The Impact of Climate Change on Obi".into(),
    passage: "Roughly 11,700 years ago, as the most recent ice age ended, the climate became significantly warmer and wetter, no doubt making Obi's jungle much thicker. According to the researchers, it is no coincidence that around this time the first axes crafted from stone rather than sea shells appear, likely in response to their heavy-duty use for clearing and modification of the increasingly dense rainforest.".into(),
    question: ReadingExamQuestion {
      id: 4,
      text: "A change in the climate around 11,700 years ago had a greater impact on Obi than on the surrounding islands.".into(),
      options: vec!["TRUE".into(), "FALSE".into(), "NOT GIVEN".into()],
      correct: "NOT GIVEN".into(),
      analysis: "The passage says the warmer, wetter climate made Obi's jungle thicker but never compares Obi with the surrounding islands.".into(),
      keywords: vec!["11,700 years ago".into(), "Obi".into(), "surrounding islands".into()],
    },
  }
}

pub fn ai_drills() -> Vec<AiDrill> {
  vec![
    AiDrill {
      source: "C19T4P1 - Q4".into(),
      question: "Some species of butterfly have a reduced lifespan due to spring temperature increases.".into(),
      options: vec!["TRUE".into(), "FALSE".into(), "NOT GIVEN".into()],
      context: "In Britain, as the average spring temperature has increased by roughly 0.5 °C over the past 20 years, species have advanced by between three days and a week on average...".into(),
      logic: "The passage only says butterflies appear earlier; lifespan is never mentioned.".into(),
      correct: "NOT GIVEN".into(),
    },
    AiDrill {
      source: "C19T2P1 - Q10".into(),
      question: "Samuel Morse's communication system was more reliable than that developed by William Cooke and Charles Wheatstone.".into(),
      options: vec!["TRUE".into(), "FALSE".into(), "NOT GIVEN".into()],
      context: "In 1837, British inventors William Cooke and Charles Wheatstone patented the first commercial telegraphy system...".into(),
      logic: "Both systems are mentioned, but their reliability is never compared.".into(),
      correct: "NOT GIVEN".into(),
    },
  ]
}

/// Unknown until the backend answers.
pub const QUESTION_COUNT: i64 = 0;
