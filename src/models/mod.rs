// src/models/mod.rs

pub mod course;
pub mod lesson;
pub mod payment;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod user;

pub type UserId = i64;
pub type CourseId = i64;
pub type LessonId = i64;
pub type QuizId = i64;
pub type QuestionId = i64;
