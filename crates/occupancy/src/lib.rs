//! # sora-occupancy
//!
//! Two-state dynamic occupancy process model: survey designs, detection
//! histories, and data simulation.
//!
//! A site is occupied or unoccupied in each season; the state may change
//! between seasons through colonization (`gamma`) and extinction
//! (`epsilon`) but is fixed within a season. Repeat surveys record 0/1
//! detection symbols with per-survey detection probability `p` and no
//! false positives.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │   design      │────▶│   simulate     │────▶│  HistoryMatrix    │
//!  │ (K seasons,   │     │ (draw states + │     │ (validate, pool   │
//!  │  J surveys)   │     │  detections)   │     │  by history)      │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use sora_occupancy::{HistoryMatrix, OccupancyProbs, SurveyDesign};
//!
//! let design = SurveyDesign::new(2, 3).unwrap();
//! assert_eq!(design.n_occasions(), 6);
//!
//! let probs = OccupancyProbs::new(0.6, 0.7, 0.2, 0.3).unwrap();
//! assert_eq!(probs.gamma(), 0.2);
//!
//! let rows = vec![vec![0, 1, 0, 0, 0, 0], vec![0, 1, 0, 0, 0, 0]];
//! let pooled = HistoryMatrix::from_rows(&rows, &design).unwrap().pool();
//! assert_eq!(pooled.n_sites(), 1);
//! assert_eq!(pooled.weight(0), 2);
//! ```
//!
//! Likelihood evaluation and maximum-likelihood fitting live in the
//! `sora-mle` crate, which consumes the types defined here.

pub mod design;
pub mod error;
pub mod history;
pub mod probs;
pub mod simulate;
pub mod state;

pub use design::SurveyDesign;
pub use error::OccupancyError;
pub use history::HistoryMatrix;
pub use probs::OccupancyProbs;
pub use simulate::{simulate_histories, simulate_states};
pub use state::OccupancyState;
