// Data models for pose landmarks and pull-up repetition tracking

pub mod exercise;
pub mod pose;
