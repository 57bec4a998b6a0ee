//! Statistics helpers for summarizing self-play and training runs.
//!
//! # Examples
//!
//! ```
//! use dropwise_stats::descriptive::DescriptiveStats;
//!
//! let scores = [100.0, 300.0, 200.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.mean, 200.0);
//! assert_eq!(stats.median, 200.0);
//! ```

pub mod descriptive;
