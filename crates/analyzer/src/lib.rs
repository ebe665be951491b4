#![doc = include_str!("../README.md")]
//!
//! # 아키텍처
//!
//! ```text
//! parsers -> HttpEvent/AuthEvent -> Detectors -> Merger -> Enricher -> reporting
//!                                       |
//!                              sliding window counter
//! ```

pub mod blacklist;
pub mod detector;
pub mod engine;
pub mod merge;
pub mod window;

// --- 주요 타입 re-export ---

// 엔진
pub use engine::AnalysisEngine;

// 윈도우 카운터
pub use window::{WindowCount, sliding_window_counts, sliding_window_counts_for};

// 탐지기
pub use detector::{
    EndpointScanDetector, FloodDetector, HttpBruteForceDetector, SshBruteForceDetector,
};

// 병합/보강
pub use blacklist::Blacklist;
pub use merge::merge_incidents;
